//! Formal dispute resolution layer.

use std::sync::Arc;

use crate::analysis::context::{AnalysisContext, DisputeOutcome};
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

const GROUP: FactorGroup = FactorGroup {
    name: "dispute_outcome",
    policy: GroupPolicy::MaxOnly,
};

struct DisputeRule {
    name: &'static str,
    order: i32,
    key: &'static str,
    fallback: f64,
    description: &'static str,
    outcome: DisputeOutcome,
    reason: &'static str,
}

const RULES: &[DisputeRule] = &[
    DisputeRule {
        name: "dispute_overturned",
        order: 10,
        key: "overturned",
        fallback: 0.05,
        description: "Formal dispute resolved in the sponsor's favor",
        outcome: DisputeOutcome::Overturned,
        reason: "dispute resolved in the sponsor's favor",
    },
    DisputeRule {
        name: "dispute_upheld",
        order: 20,
        key: "upheld",
        fallback: -0.05,
        description: "Formal dispute resolved against the sponsor",
        outcome: DisputeOutcome::Upheld,
        reason: "dispute resolved against the sponsor",
    },
    DisputeRule {
        name: "dispute_pending",
        order: 30,
        key: "pending",
        fallback: -0.02,
        description: "Formal dispute still pending",
        outcome: DisputeOutcome::Pending,
        reason: "dispute still pending at analysis time",
    },
];

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    for rule in RULES {
        registry.register(FactorDefinition {
            name: rule.name,
            layer: Layer::Dispute,
            order: rule.order,
            version: "1",
            description: rule.description,
            group: Some(GROUP),
            evaluator: Arc::new(move |context, _current| evaluate(rule, context)),
        })?;
    }
    Ok(())
}

fn evaluate(rule: &DisputeRule, context: &AnalysisContext) -> FactorResult {
    if context.dispute.outcome != Some(rule.outcome) {
        return FactorResult::neutral(rule.name, "no matching dispute outcome");
    }

    let (adjustment, fallback_used) =
        ConstantsRepository::shared().score_or("dispute", rule.key, rule.fallback);
    FactorResult::applied(rule.name, adjustment, rule.reason, 0.85).flag_fallback(
        fallback_used,
        "dispute",
        rule.key,
    )
}
