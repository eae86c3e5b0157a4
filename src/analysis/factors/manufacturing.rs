//! Manufacturing layer: inspection history and facility risk.
//!
//! Recency math runs against `context.analysis_date`, never a clock. A
//! warning letter without an issue date is treated as recent and reported as
//! a data-quality warning.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

const OBSERVATION_THRESHOLD: u8 = 5;

const PAI_GROUP: FactorGroup = FactorGroup {
    name: "pai",
    policy: GroupPolicy::MaxOnly,
};

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "pai_passed",
        layer: Layer::Manufacturing,
        order: 10,
        version: "1",
        description: "Pre-approval inspection completed successfully",
        group: Some(PAI_GROUP),
        evaluator: Arc::new(pai_passed),
    })?;
    registry.register(FactorDefinition {
        name: "pai_failed",
        layer: Layer::Manufacturing,
        order: 20,
        version: "1",
        description: "Pre-approval inspection failed or approval withheld",
        group: Some(PAI_GROUP),
        evaluator: Arc::new(pai_failed),
    })?;
    registry.register(FactorDefinition {
        name: "open_warning_letter",
        layer: Layer::Manufacturing,
        order: 30,
        version: "2",
        description: "Warning letter on a facility named in the application",
        group: None,
        evaluator: Arc::new(warning_letter),
    })?;
    registry.register(FactorDefinition {
        name: "inspection_observations",
        layer: Layer::Manufacturing,
        order: 40,
        version: "1",
        description: "Clustered inspection observations at a named facility",
        group: None,
        evaluator: Arc::new(observations),
    })?;
    registry.register(FactorDefinition {
        name: "high_risk_cmo",
        layer: Layer::Manufacturing,
        order: 50,
        version: "1",
        description: "High-risk contract manufacturer on the application",
        group: None,
        evaluator: Arc::new(high_risk_cmo),
    })
}

fn pai_passed(context: &AnalysisContext, _current: f64) -> FactorResult {
    match context.manufacturing.pai_passed {
        Some(true) => {
            let (bonus, fallback_used) =
                ConstantsRepository::shared().score_or("manufacturing", "pai_passed", 0.04);
            FactorResult::applied(
                "pai_passed",
                bonus,
                "pre-approval inspection passed",
                0.9,
            )
            .flag_fallback(fallback_used, "manufacturing", "pai_passed")
        }
        Some(false) => FactorResult::neutral("pai_passed", "inspection did not pass"),
        None => FactorResult::neutral("pai_passed", "no pre-approval inspection outcome yet"),
    }
}

fn pai_failed(context: &AnalysisContext, _current: f64) -> FactorResult {
    match context.manufacturing.pai_passed {
        Some(false) => {
            let (penalty, fallback_used) =
                ConstantsRepository::shared().score_or("manufacturing", "pai_failed", -0.15);
            FactorResult::applied(
                "pai_failed",
                penalty,
                "pre-approval inspection failed",
                0.9,
            )
            .flag_fallback(fallback_used, "manufacturing", "pai_failed")
        }
        _ => FactorResult::neutral("pai_failed", "no failed inspection on record"),
    }
}

fn warning_letter(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.manufacturing.warning_letter {
        return FactorResult::neutral("open_warning_letter", "no warning letter on record");
    }

    let constants = ConstantsRepository::shared();
    let recent = context.warning_letter_recent();
    let (key, fallback, reason) = if recent {
        (
            "warning_letter_recent",
            -0.08,
            "warning letter issued within the last two years",
        )
    } else {
        (
            "warning_letter_stale",
            -0.03,
            "warning letter older than two years",
        )
    };

    let (penalty, fallback_used) = constants.score_or("manufacturing", key, fallback);
    let result = FactorResult::applied("open_warning_letter", penalty, reason, 0.85)
        .flag_fallback(fallback_used, "manufacturing", key);

    if context.manufacturing.warning_letter_date.is_none() {
        result.with_warning("warning letter has no issue date; treated as recent")
    } else {
        result
    }
}

fn observations(context: &AnalysisContext, _current: f64) -> FactorResult {
    if context.manufacturing.observation_count < OBSERVATION_THRESHOLD {
        return FactorResult::neutral(
            "inspection_observations",
            "observation count below the reporting threshold",
        );
    }
    if !context.observations_recent() {
        return FactorResult::neutral(
            "inspection_observations",
            "observations predate the two-year window",
        );
    }

    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("manufacturing", "observation_cluster", -0.04);
    FactorResult::applied(
        "inspection_observations",
        penalty,
        format!(
            "{} observations at the most recent inspection",
            context.manufacturing.observation_count
        ),
        0.8,
    )
    .flag_fallback(fallback_used, "manufacturing", "observation_cluster")
}

fn high_risk_cmo(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.manufacturing.high_risk_cmo {
        return FactorResult::neutral("high_risk_cmo", "no high-risk contract manufacturer");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("manufacturing", "high_risk_cmo", -0.05);
    FactorResult::applied(
        "high_risk_cmo",
        penalty,
        "application relies on a high-risk contract manufacturer",
        0.8,
    )
    .flag_fallback(fallback_used, "manufacturing", "high_risk_cmo")
}
