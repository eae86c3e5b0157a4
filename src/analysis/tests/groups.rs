use std::sync::Arc;

use super::common::*;
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::analysis::Analyzer;

#[test]
fn two_designations_in_one_group_apply_only_the_larger() {
    let analyzer = analyzer();
    let mut context = baseline_context();
    context.designations.breakthrough_therapy = true;
    context.designations.fast_track = true;

    let result = analyzer.analyze(&context).expect("context analyzes");

    let breakthrough = constant("designation", "breakthrough_therapy", 0.05);
    let fast_track = constant("designation", "fast_track", 0.02);
    let larger = breakthrough.max(fast_track);

    let applied: Vec<&FactorResult> = result
        .factors
        .iter()
        .filter(|factor| {
            factor.applied
                && (factor.name == "breakthrough_therapy" || factor.name == "fast_track")
        })
        .collect();
    assert_eq!(applied.len(), 1, "exactly one designation may count");
    assert_close(applied[0].adjustment, larger);

    assert_close(
        result.probability,
        constant("base", "new_application", 0.82) + larger,
    );

    // The loser stays in the audit trail, marked superseded.
    let superseded = result
        .factors
        .iter()
        .find(|factor| factor.name == "fast_track")
        .expect("loser still present");
    assert!(!superseded.applied);
    assert_close(superseded.adjustment, 0.0);
    assert!(superseded.reason.contains("superseded by breakthrough_therapy"));
}

#[test]
fn group_ties_go_to_the_lower_order_member() {
    let group = FactorGroup {
        name: "tied",
        policy: GroupPolicy::MaxOnly,
    };
    let mut registry = FactorRegistry::new();
    for (name, order) in [("tied_late", 20), ("tied_early", 10)] {
        registry
            .register(FactorDefinition {
                name,
                layer: Layer::Special,
                order,
                version: "1",
                description: "tied test factor",
                group: Some(group),
                evaluator: Arc::new(move |_context, _current| {
                    FactorResult::applied(name, 0.04, "tied magnitude", 1.0)
                }),
            })
            .expect("registers");
    }

    let analyzer = Analyzer::new(registry);
    let result = analyzer
        .analyze(&baseline_context())
        .expect("context analyzes");

    let early = result
        .factors
        .iter()
        .find(|factor| factor.name == "tied_early")
        .expect("present");
    let late = result
        .factors
        .iter()
        .find(|factor| factor.name == "tied_late")
        .expect("present");
    assert!(early.applied, "lower order wins the tie");
    assert!(!late.applied);
}

#[test]
fn single_applied_member_is_untouched() {
    let analyzer = analyzer();
    let mut context = baseline_context();
    context.designations.orphan_drug = true;

    let result = analyzer.analyze(&context).expect("context analyzes");
    let orphan = result
        .applied_factor("orphan_drug")
        .expect("sole member applies");
    assert_close(orphan.adjustment, constant("designation", "orphan_drug", 0.02));
    assert!(!orphan.reason.contains("superseded"));
}

#[test]
fn ungrouped_factor_stacks_with_a_group_winner() {
    let analyzer = analyzer();
    let mut context = baseline_context();
    context.designations.breakthrough_therapy = true;
    context.designations.priority_review = true;
    context.special.first_in_class = true;

    let result = analyzer.analyze(&context).expect("context analyzes");

    // first_in_class is deliberately outside every group: it must apply even
    // though the designation group collapsed to a single winner.
    let first_in_class = result
        .applied_factor("first_in_class")
        .expect("stacks independently");
    assert_close(
        first_in_class.adjustment,
        constant("special", "first_in_class", 0.02),
    );

    let designations_applied = result
        .factors
        .iter()
        .filter(|factor| {
            factor.applied
                && matches!(
                    factor.name.as_str(),
                    "breakthrough_therapy" | "priority_review"
                )
        })
        .count();
    assert_eq!(designations_applied, 1);
}
