//! Context-interaction layer.
//!
//! Runs after every independent layer and before capping. Each rule is an
//! ordered list of named predicates, a minimum match count, and a flat
//! effect added on top of the per-factor adjustments already applied. Some
//! predicates re-read evidence an earlier layer already scored (the warning
//! letter, for instance); that stacking is preserved source behavior, pinned
//! by a property test rather than assumed intentional.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{FactorDefinition, FactorResult, Layer};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

type Predicate = fn(&AnalysisContext) -> bool;

struct InteractionRule {
    name: &'static str,
    order: i32,
    description: &'static str,
    predicates: &'static [(&'static str, Predicate)],
    min_matches: usize,
    key: &'static str,
    fallback: f64,
}

const RULES: &[InteractionRule] = &[
    InteractionRule {
        name: "expedited_synergy",
        order: 10,
        description: "Multiple expedited designations reinforce each other",
        predicates: &[
            ("breakthrough therapy", |context| {
                context.designations.breakthrough_therapy
            }),
            ("priority review", |context| {
                context.designations.priority_review
            }),
            ("fast track", |context| context.designations.fast_track),
            ("orphan drug", |context| context.designations.orphan_drug),
        ],
        min_matches: 3,
        key: "expedited_synergy",
        fallback: 0.03,
    },
    InteractionRule {
        name: "spa_adcom_alignment",
        order: 20,
        description: "Agreed trial design confirmed by a positive committee vote",
        predicates: &[
            ("SPA agreed", |context| {
                context.special.spa_agreed && !context.special.spa_rescinded
            }),
            ("positive committee vote", |context| {
                context.adcom.held
                    && context
                        .adcom
                        .vote_ratio
                        .is_some_and(|ratio| ratio >= 2.0 / 3.0)
            }),
        ],
        min_matches: 2,
        key: "spa_adcom_alignment",
        fallback: 0.02,
    },
    InteractionRule {
        name: "manufacturing_compound_risk",
        order: 30,
        description: "Warning letter combined with a high-risk manufacturer",
        predicates: &[
            ("warning letter", |context| {
                context.manufacturing.warning_letter
            }),
            ("high-risk manufacturer", |context| {
                context.manufacturing.high_risk_cmo
            }),
        ],
        min_matches: 2,
        key: "manufacturing_compound_risk",
        fallback: -0.05,
    },
];

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    for rule in RULES {
        registry.register(FactorDefinition {
            name: rule.name,
            layer: Layer::Context,
            order: rule.order,
            version: "1",
            description: rule.description,
            group: None,
            evaluator: Arc::new(move |context, _current| evaluate(rule, context)),
        })?;
    }
    Ok(())
}

fn evaluate(rule: &InteractionRule, context: &AnalysisContext) -> FactorResult {
    let matched: Vec<&'static str> = rule
        .predicates
        .iter()
        .filter(|(_, predicate)| predicate(context))
        .map(|(label, _)| *label)
        .collect();

    if matched.len() < rule.min_matches {
        return FactorResult::neutral(
            rule.name,
            format!(
                "{} of {} conditions met (needs {})",
                matched.len(),
                rule.predicates.len(),
                rule.min_matches
            ),
        );
    }

    let (effect, fallback_used) =
        ConstantsRepository::shared().score_or("interaction", rule.key, rule.fallback);
    FactorResult::applied(
        rule.name,
        effect,
        format!("conditions met: {}", matched.join(", ")),
        0.8,
    )
    .flag_fallback(fallback_used, "interaction", rule.key)
}
