//! Base layer: the single factor that sets the starting probability.
//!
//! This is the documented exception to the additive convention: the
//! evaluator returns `target − current`, i.e. it sets an absolute base rate
//! rather than incrementing. Every later layer is strictly additive.

use std::sync::Arc;

use crate::analysis::context::{AnalysisContext, ResubmissionClass};
use crate::analysis::factor::{FactorDefinition, FactorResult, Layer};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "base_rate",
        layer: Layer::Base,
        order: 0,
        version: "2",
        description: "Historical base rate for the application class",
        group: None,
        evaluator: Arc::new(base_rate),
    })
}

fn base_rate(context: &AnalysisContext, current: f64) -> FactorResult {
    let constants = ConstantsRepository::shared();
    let (key, fallback, label) = classify(context);
    let (target, fallback_used) = constants.score_or("base", key, fallback);

    FactorResult::applied(
        "base_rate",
        target - current,
        format!("{label}: base rate {target:.2}"),
        1.0,
    )
    .flag_fallback(fallback_used, "base", key)
}

/// Pick the base-rate bucket. Resubmission class wins over the product-type
/// flags; a Class 2 resubmission of a biosimilar prices like a Class 2
/// resubmission.
fn classify(context: &AnalysisContext) -> (&'static str, f64, &'static str) {
    match context.crl.resubmission_class {
        Some(ResubmissionClass::Class1) => {
            ("resubmission_class_1", 0.84, "class 1 resubmission")
        }
        Some(ResubmissionClass::Class2) => {
            ("resubmission_class_2", 0.68, "class 2 resubmission")
        }
        None if context.special.supplement => ("supplement", 0.88, "supplement"),
        None if context.special.biosimilar => ("biosimilar", 0.78, "biosimilar"),
        None => ("new_application", 0.82, "new application"),
    }
}
