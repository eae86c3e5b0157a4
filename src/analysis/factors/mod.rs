//! The standard rule modules, one per layer.
//!
//! Every evaluator is pure and follows the same resilience pattern:
//! magnitudes come from the constants repository with a literal fallback, the
//! dominant return path is a neutral result, and missing evidence never
//! raises.

pub(crate) mod adcom;
pub(crate) mod base;
pub(crate) mod caps;
pub(crate) mod citizen_petition;
pub(crate) mod clinical;
pub(crate) mod crl;
pub(crate) mod designation;
pub(crate) mod dispute;
pub(crate) mod earnings;
pub(crate) mod interaction;
pub(crate) mod manufacturing;
pub(crate) mod special;

use super::registry::FactorRegistry;
use crate::error::AnalysisError;

/// Register every standard factor. Called once at process start, before the
/// registry freezes.
pub(crate) fn register_all(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    base::register(registry)?;
    designation::register(registry)?;
    adcom::register(registry)?;
    crl::register(registry)?;
    clinical::register(registry)?;
    manufacturing::register(registry)?;
    dispute::register(registry)?;
    earnings::register(registry)?;
    citizen_petition::register(registry)?;
    special::register(registry)?;
    interaction::register(registry)?;
    caps::register(registry)?;
    Ok(())
}
