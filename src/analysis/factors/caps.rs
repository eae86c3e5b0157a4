//! Cap layer: override-dominant hard ceilings, applied last.
//!
//! Each cap returns `(ceiling − current).min(0)`, pulling the running
//! probability down to its ceiling and never up. The caps share the
//! `hard_cap` MAX_ONLY group, so when several fire the most restrictive one
//! — the largest pull-down — wins. The final floor/ceiling clamp in the
//! engine runs after this layer.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

const GROUP: FactorGroup = FactorGroup {
    name: "hard_cap",
    policy: GroupPolicy::MaxOnly,
};

struct CapRule {
    name: &'static str,
    order: i32,
    description: &'static str,
    key: &'static str,
    fallback_ceiling: f64,
    reason: &'static str,
    condition: fn(&AnalysisContext) -> bool,
}

const RULES: &[CapRule] = &[
    CapRule {
        name: "failed_endpoint_cap",
        order: 10,
        description: "Missed primary endpoint dominates every bonus",
        key: "failed_endpoint",
        fallback_ceiling: 0.15,
        reason: "primary endpoint missed",
        condition: |context| context.clinical.primary_endpoint_met == Some(false),
    },
    CapRule {
        name: "negative_adcom_cap",
        order: 20,
        description: "Strongly negative committee vote caps the odds",
        key: "negative_adcom",
        fallback_ceiling: 0.30,
        reason: "committee voted below one third in favor",
        condition: |context| {
            context.adcom.held
                && context
                    .adcom
                    .vote_ratio
                    .is_some_and(|ratio| ratio < 1.0 / 3.0)
        },
    },
    CapRule {
        name: "open_warning_letter_cap",
        order: 30,
        description: "Recent warning letter caps the odds until resolved",
        key: "open_warning_letter",
        fallback_ceiling: 0.55,
        reason: "warning letter open within the last two years",
        condition: |context| context.warning_letter_recent(),
    },
];

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    for rule in RULES {
        registry.register(FactorDefinition {
            name: rule.name,
            layer: Layer::Cap,
            order: rule.order,
            version: "1",
            description: rule.description,
            group: Some(GROUP),
            evaluator: Arc::new(move |context, current| evaluate(rule, context, current)),
        })?;
    }
    Ok(())
}

fn evaluate(rule: &CapRule, context: &AnalysisContext, current: f64) -> FactorResult {
    if !(rule.condition)(context) {
        return FactorResult::neutral(rule.name, "cap condition absent");
    }

    let (ceiling, fallback_used) =
        ConstantsRepository::shared().score_or("caps", rule.key, rule.fallback_ceiling);
    let pull_down = (ceiling - current).min(0.0);

    if pull_down == 0.0 {
        // Condition holds but the running probability is already under the
        // ceiling; record the cap as applied with zero effect for the audit.
        return FactorResult::applied(
            rule.name,
            0.0,
            format!("{}; already at or below ceiling {ceiling:.2}", rule.reason),
            0.95,
        )
        .flag_fallback(fallback_used, "caps", rule.key);
    }

    FactorResult::applied(
        rule.name,
        pull_down,
        format!("{}; capped at {ceiling:.2}", rule.reason),
        0.95,
    )
    .flag_fallback(fallback_used, "caps", rule.key)
}
