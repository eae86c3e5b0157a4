//! Clinical-evidence layer: endpoint outcome, trial design, indication, and
//! hold history.

use std::sync::Arc;

use crate::analysis::context::{AnalysisContext, TrialRegion};
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

const ENDPOINT_GROUP: FactorGroup = FactorGroup {
    name: "endpoint",
    policy: GroupPolicy::MaxOnly,
};

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "primary_endpoint_met",
        layer: Layer::Clinical,
        order: 10,
        version: "1",
        description: "Primary endpoint met in the pivotal trial",
        group: Some(ENDPOINT_GROUP),
        evaluator: Arc::new(endpoint_met),
    })?;
    registry.register(FactorDefinition {
        name: "primary_endpoint_missed",
        layer: Layer::Clinical,
        order: 20,
        version: "1",
        description: "Primary endpoint missed in the pivotal trial",
        group: Some(ENDPOINT_GROUP),
        evaluator: Arc::new(endpoint_missed),
    })?;
    registry.register(FactorDefinition {
        name: "single_arm_design",
        layer: Layer::Clinical,
        order: 30,
        version: "1",
        description: "Single-arm pivotal trial",
        group: None,
        evaluator: Arc::new(single_arm),
    })?;
    registry.register(FactorDefinition {
        name: "ex_us_trial_data",
        layer: Layer::Clinical,
        order: 40,
        version: "1",
        description: "Pivotal data generated entirely outside the US",
        group: None,
        evaluator: Arc::new(ex_us_data),
    })?;
    registry.register(FactorDefinition {
        name: "mental_health_indication",
        layer: Layer::Clinical,
        order: 50,
        version: "1",
        description: "Psychiatric indication penalty",
        group: None,
        evaluator: Arc::new(mental_health),
    })?;
    registry.register(FactorDefinition {
        name: "clinical_hold_history",
        layer: Layer::Clinical,
        order: 60,
        version: "1",
        description: "Program has clinical hold history",
        group: None,
        evaluator: Arc::new(clinical_hold),
    })
}

fn endpoint_met(context: &AnalysisContext, _current: f64) -> FactorResult {
    match context.clinical.primary_endpoint_met {
        Some(true) => {
            let (bonus, fallback_used) =
                ConstantsRepository::shared().score_or("clinical", "endpoint_met", 0.05);
            FactorResult::applied(
                "primary_endpoint_met",
                bonus,
                "primary endpoint met in the pivotal trial",
                0.95,
            )
            .flag_fallback(fallback_used, "clinical", "endpoint_met")
        }
        Some(false) => FactorResult::neutral("primary_endpoint_met", "endpoint was missed"),
        None => FactorResult::neutral("primary_endpoint_met", "topline data not yet public")
            .with_warning("primary endpoint outcome unknown at analysis time"),
    }
}

fn endpoint_missed(context: &AnalysisContext, _current: f64) -> FactorResult {
    match context.clinical.primary_endpoint_met {
        Some(false) => {
            let (penalty, fallback_used) =
                ConstantsRepository::shared().score_or("clinical", "endpoint_missed", -0.25);
            FactorResult::applied(
                "primary_endpoint_missed",
                penalty,
                "primary endpoint missed in the pivotal trial",
                0.95,
            )
            .flag_fallback(fallback_used, "clinical", "endpoint_missed")
        }
        _ => FactorResult::neutral("primary_endpoint_missed", "endpoint not missed"),
    }
}

fn single_arm(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.clinical.single_arm {
        return FactorResult::neutral("single_arm_design", "controlled trial design");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("clinical", "single_arm", -0.05);
    FactorResult::applied(
        "single_arm_design",
        penalty,
        "single-arm pivotal trial design",
        0.9,
    )
    .flag_fallback(fallback_used, "clinical", "single_arm")
}

fn ex_us_data(context: &AnalysisContext, _current: f64) -> FactorResult {
    if context.clinical.trial_region != TrialRegion::ExUsOnly {
        return FactorResult::neutral("ex_us_trial_data", "trial includes US sites");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("clinical", "ex_us_data", -0.04);
    FactorResult::applied(
        "ex_us_trial_data",
        penalty,
        "pivotal data generated entirely outside the US",
        0.85,
    )
    .flag_fallback(fallback_used, "clinical", "ex_us_data")
}

fn mental_health(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.clinical.mental_health_category {
        return FactorResult::neutral("mental_health_indication", "not a psychiatric indication");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("clinical", "mental_health", -0.07);
    FactorResult::applied(
        "mental_health_indication",
        penalty,
        "psychiatric indications approve at historically lower rates",
        0.8,
    )
    .flag_fallback(fallback_used, "clinical", "mental_health")
}

fn clinical_hold(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.clinical.clinical_hold_history {
        return FactorResult::neutral("clinical_hold_history", "no clinical hold on record");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("clinical", "clinical_hold", -0.06);
    FactorResult::applied(
        "clinical_hold_history",
        penalty,
        "program was placed on clinical hold during development",
        0.85,
    )
    .flag_fallback(fallback_used, "clinical", "clinical_hold")
}
