//! Catalog of registered scoring rules.
//!
//! Registration happens once at process start; the registry freezes on the
//! first analysis and rejects anything registered later. After the freeze the
//! registry is read-only shared state, safe for concurrent `analyze` calls
//! without locks.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use super::factor::{FactorDefinition, Layer};
use super::factors;
use crate::error::AnalysisError;

struct RegisteredFactor {
    definition: FactorDefinition,
    /// Insertion sequence; the tie-breaker behind equal `order` values.
    sequence: u64,
}

#[derive(Default)]
pub struct FactorRegistry {
    factors: Vec<RegisteredFactor>,
    names: HashSet<&'static str>,
    frozen: AtomicBool,
}

impl FactorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with every standard rule module registered, ready to
    /// hand to an [`Analyzer`](super::engine::Analyzer).
    pub fn with_standard_factors() -> Result<Self, AnalysisError> {
        let mut registry = Self::new();
        factors::register_all(&mut registry)?;
        Ok(registry)
    }

    pub fn register(&mut self, definition: FactorDefinition) -> Result<(), AnalysisError> {
        if self.is_frozen() {
            return Err(AnalysisError::RegistryFrozen {
                name: definition.name.to_string(),
            });
        }
        if !self.names.insert(definition.name) {
            return Err(AnalysisError::DuplicateFactor {
                name: definition.name.to_string(),
            });
        }

        let sequence = self.factors.len() as u64;
        self.factors.push(RegisteredFactor {
            definition,
            sequence,
        });
        Ok(())
    }

    /// Definitions for one layer, stably sorted by `(order, registration
    /// sequence)`. The explicit sort is the documented total order — group
    /// ties and audit ordering both depend on it.
    pub fn factors_for_layer(&self, layer: Layer) -> Vec<&FactorDefinition> {
        let mut selected: Vec<&RegisteredFactor> = self
            .factors
            .iter()
            .filter(|factor| factor.definition.layer == layer)
            .collect();
        selected.sort_by_key(|factor| (factor.definition.order, factor.sequence));
        selected.into_iter().map(|factor| &factor.definition).collect()
    }

    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
