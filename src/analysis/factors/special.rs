//! Special-flag layer: SPA status and first-in-class.
//!
//! `first_in_class` is deliberately excluded from every group so it stacks
//! with any designation or SPA signal. That exclusion is a contract, not an
//! oversight.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

const SPA_GROUP: FactorGroup = FactorGroup {
    name: "spa",
    policy: GroupPolicy::MaxOnly,
};

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "spa_agreed",
        layer: Layer::Special,
        order: 10,
        version: "1",
        description: "Special protocol assessment agreement in place",
        group: Some(SPA_GROUP),
        evaluator: Arc::new(spa_agreed),
    })?;
    registry.register(FactorDefinition {
        name: "spa_rescinded",
        layer: Layer::Special,
        order: 20,
        version: "1",
        description: "Special protocol assessment rescinded",
        group: Some(SPA_GROUP),
        evaluator: Arc::new(spa_rescinded),
    })?;
    registry.register(FactorDefinition {
        name: "first_in_class",
        layer: Layer::Special,
        order: 30,
        version: "1",
        description: "First-in-class mechanism, stacks independently",
        group: None,
        evaluator: Arc::new(first_in_class),
    })
}

fn spa_agreed(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.special.spa_agreed || context.special.spa_rescinded {
        return FactorResult::neutral("spa_agreed", "no standing SPA agreement");
    }
    let (bonus, fallback_used) =
        ConstantsRepository::shared().score_or("special", "spa_agreed", 0.03);
    FactorResult::applied(
        "spa_agreed",
        bonus,
        "special protocol assessment agreement in place",
        0.9,
    )
    .flag_fallback(fallback_used, "special", "spa_agreed")
}

fn spa_rescinded(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.special.spa_rescinded {
        return FactorResult::neutral("spa_rescinded", "SPA not rescinded");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("special", "spa_rescinded", -0.12);
    FactorResult::applied(
        "spa_rescinded",
        penalty,
        "special protocol assessment was rescinded",
        0.9,
    )
    .flag_fallback(fallback_used, "special", "spa_rescinded")
}

fn first_in_class(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.special.first_in_class {
        return FactorResult::neutral("first_in_class", "not a first-in-class mechanism");
    }
    let (bonus, fallback_used) =
        ConstantsRepository::shared().score_or("special", "first_in_class", 0.02);
    FactorResult::applied(
        "first_in_class",
        bonus,
        "first-in-class mechanism",
        0.8,
    )
    .flag_fallback(fallback_used, "special", "first_in_class")
}
