//! Citizen petition layer.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{FactorDefinition, FactorResult, Layer};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "petition_pending",
        layer: Layer::CitizenPetition,
        order: 10,
        version: "1",
        description: "Citizen petition pending against the application",
        group: None,
        evaluator: Arc::new(pending),
    })?;
    registry.register(FactorDefinition {
        name: "petition_denied",
        layer: Layer::CitizenPetition,
        order: 20,
        version: "1",
        description: "Citizen petition recently denied",
        group: None,
        evaluator: Arc::new(denied),
    })
}

fn pending(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.citizen_petition.pending {
        return FactorResult::neutral("petition_pending", "no petition pending");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("citizen_petition", "pending", -0.03);
    FactorResult::applied(
        "petition_pending",
        penalty,
        "citizen petition pending against the application",
        0.75,
    )
    .flag_fallback(fallback_used, "citizen_petition", "pending")
}

fn denied(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.citizen_petition.recently_denied {
        return FactorResult::neutral("petition_denied", "no recent petition denial");
    }
    let (bonus, fallback_used) =
        ConstantsRepository::shared().score_or("citizen_petition", "denied", 0.01);
    FactorResult::applied(
        "petition_denied",
        bonus,
        "citizen petition against the application was denied",
        0.75,
    )
    .flag_fallback(fallback_used, "citizen_petition", "denied")
}
