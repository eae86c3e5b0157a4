//! Designation layer: expedited-program bonuses.
//!
//! The five designations are strongly correlated, so they share the
//! `expedited_program` MAX_ONLY group — at most one counts, the others stay
//! visible in the audit trail as superseded.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

const GROUP: FactorGroup = FactorGroup {
    name: "expedited_program",
    policy: GroupPolicy::MaxOnly,
};

struct DesignationRule {
    name: &'static str,
    order: i32,
    key: &'static str,
    fallback: f64,
    description: &'static str,
    flag: fn(&AnalysisContext) -> bool,
}

const RULES: &[DesignationRule] = &[
    DesignationRule {
        name: "breakthrough_therapy",
        order: 10,
        key: "breakthrough_therapy",
        fallback: 0.05,
        description: "Breakthrough therapy designation bonus",
        flag: |context| context.designations.breakthrough_therapy,
    },
    DesignationRule {
        name: "priority_review",
        order: 20,
        key: "priority_review",
        fallback: 0.03,
        description: "Priority review designation bonus",
        flag: |context| context.designations.priority_review,
    },
    DesignationRule {
        name: "accelerated_approval",
        order: 30,
        key: "accelerated_approval",
        fallback: 0.03,
        description: "Accelerated approval pathway bonus",
        flag: |context| context.designations.accelerated_approval,
    },
    DesignationRule {
        name: "fast_track",
        order: 40,
        key: "fast_track",
        fallback: 0.02,
        description: "Fast track designation bonus",
        flag: |context| context.designations.fast_track,
    },
    DesignationRule {
        name: "orphan_drug",
        order: 50,
        key: "orphan_drug",
        fallback: 0.02,
        description: "Orphan drug designation bonus",
        flag: |context| context.designations.orphan_drug,
    },
];

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    for rule in RULES {
        registry.register(FactorDefinition {
            name: rule.name,
            layer: Layer::Designation,
            order: rule.order,
            version: "1",
            description: rule.description,
            group: Some(GROUP),
            evaluator: Arc::new(move |context, _current| evaluate(rule, context)),
        })?;
    }
    Ok(())
}

fn evaluate(rule: &DesignationRule, context: &AnalysisContext) -> FactorResult {
    if !(rule.flag)(context) {
        return FactorResult::neutral(rule.name, "designation not granted");
    }

    let (bonus, fallback_used) =
        ConstantsRepository::shared().score_or("designation", rule.key, rule.fallback);
    FactorResult::applied(
        rule.name,
        bonus,
        format!("designation granted: +{bonus:.2}"),
        0.95,
    )
    .flag_fallback(fallback_used, "designation", rule.key)
}
