use approval_odds::{AnalysisContext, Analyzer, FactorRegistry, Layer};
use chrono::NaiveDate;

fn analyzer() -> Analyzer {
    let registry = FactorRegistry::with_standard_factors().expect("standard factors register");
    Analyzer::new(registry)
}

fn context() -> AnalysisContext {
    let mut context =
        AnalysisContext::baseline(NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"));
    context.designations.breakthrough_therapy = true;
    context.designations.priority_review = true;
    context.clinical.primary_endpoint_met = Some(true);
    context.special.spa_agreed = true;
    context
}

#[test]
fn layers_appear_in_the_fixed_order() {
    let result = analyzer().analyze(&context()).expect("context analyzes");

    let labels: Vec<&str> = result
        .layers
        .iter()
        .map(|layer| layer.layer.label())
        .collect();
    let expected: Vec<&str> = Layer::ordered().iter().map(|layer| layer.label()).collect();
    assert_eq!(labels, expected);
}

#[test]
fn every_evaluated_factor_appears_in_the_trail() {
    let result = analyzer().analyze(&context()).expect("context analyzes");

    // The flat factor list is the concatenation of the per-layer lists, in
    // order — nothing is dropped, including superseded group members.
    let from_layers: Vec<&String> = result
        .layers
        .iter()
        .flat_map(|layer| layer.factors_applied.iter())
        .map(|factor| &factor.name)
        .collect();
    let flat: Vec<&String> = result.factors.iter().map(|factor| &factor.name).collect();
    assert_eq!(from_layers, flat);
    assert_eq!(result.metadata.factors_evaluated, flat.len());
}

#[test]
fn superseded_members_keep_their_reason() {
    let result = analyzer().analyze(&context()).expect("context analyzes");

    let loser = result
        .factors
        .iter()
        .find(|factor| factor.name == "priority_review")
        .expect("priority review evaluated");
    assert!(!loser.applied);
    assert_eq!(loser.adjustment, 0.0);
    assert!(loser.reason.contains("designation granted"));
    assert!(loser.reason.contains("superseded by breakthrough_therapy"));
}

#[test]
fn neutral_results_always_carry_zero_adjustment() {
    let result = analyzer().analyze(&context()).expect("context analyzes");

    for factor in &result.factors {
        if !factor.applied {
            assert_eq!(
                factor.adjustment, 0.0,
                "non-applied factor '{}' carries an adjustment",
                factor.name
            );
        }
    }
}

#[test]
fn non_base_layers_are_strictly_additive() {
    let result = analyzer().analyze(&context()).expect("context analyzes");

    for layer in result.layers.iter().skip(1) {
        let applied_sum: f64 = layer
            .factors_applied
            .iter()
            .filter(|factor| factor.applied)
            .map(|factor| factor.adjustment)
            .sum();
        assert!(
            (layer.output_prob - layer.input_prob - applied_sum).abs() < 1e-9,
            "layer {} is not additive",
            layer.layer
        );
    }
}
