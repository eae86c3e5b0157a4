use approval_odds::{
    AdComState, AnalysisContext, AnalysisResult, Analyzer, ConstantsRepository, FactorRegistry,
};
use chrono::NaiveDate;

fn analyzer() -> Analyzer {
    let registry = FactorRegistry::with_standard_factors().expect("standard factors register");
    Analyzer::new(registry)
}

fn baseline() -> AnalysisContext {
    AnalysisContext::baseline(NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"))
}

fn constant(category: &str, key: &str, fallback: f64) -> f64 {
    ConstantsRepository::shared().score_or(category, key, fallback).0
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

// Scenario A: standard new application, no designations, no resubmission,
// no committee meeting, no manufacturing issues.
#[test]
fn standard_new_application_scores_the_default_base_rate() {
    let result = analyzer().analyze(&baseline()).expect("baseline analyzes");

    let base = constant("base", "new_application", 0.82);
    assert!(close(result.probability, base));
    assert!(close(result.base_probability, base));

    let applied: Vec<&str> = result
        .factors
        .iter()
        .filter(|factor| factor.applied)
        .map(|factor| factor.name.as_str())
        .collect();
    assert_eq!(applied, vec!["base_rate"]);
}

// Scenario B: same as A but two same-group designations both true.
#[test]
fn two_designations_add_only_the_larger_bonus() {
    let mut context = baseline();
    context.designations.breakthrough_therapy = true;
    context.designations.orphan_drug = true;

    let result = analyzer().analyze(&context).expect("context analyzes");

    let base = constant("base", "new_application", 0.82);
    let breakthrough = constant("designation", "breakthrough_therapy", 0.05);
    let orphan = constant("designation", "orphan_drug", 0.02);
    assert!(close(result.probability, base + breakthrough.max(orphan)));

    let designations_applied = result
        .factors
        .iter()
        .filter(|factor| {
            factor.applied
                && matches!(factor.name.as_str(), "breakthrough_therapy" | "orphan_drug")
        })
        .count();
    assert_eq!(designations_applied, 1);
}

#[test]
fn analyze_is_deterministic_across_runs() {
    let mut context = baseline();
    context.designations.fast_track = true;
    context.adcom = AdComState {
        held: true,
        waived: false,
        vote_ratio: Some(0.55),
    };
    context.manufacturing.warning_letter = true;
    context.manufacturing.warning_letter_date = NaiveDate::from_ymd_opt(2024, 7, 2);
    context.special.first_in_class = true;

    let analyzer = analyzer();
    let first = analyzer.analyze(&context).expect("first run");
    let second = analyzer.analyze(&context).expect("second run");

    assert_eq!(first.probability, second.probability);
    let first_names: Vec<&String> = first.factors.iter().map(|factor| &factor.name).collect();
    let second_names: Vec<&String> = second.factors.iter().map(|factor| &factor.name).collect();
    assert_eq!(first_names, second_names);
    assert_eq!(first, second);
}

#[test]
fn result_round_trips_through_serde() {
    let mut context = baseline();
    context.designations.priority_review = true;
    context.clinical.primary_endpoint_met = Some(true);

    let result = analyzer().analyze(&context).expect("context analyzes");

    let encoded = serde_json::to_string(&result).expect("result serializes");
    let decoded: AnalysisResult = serde_json::from_str(&encoded).expect("result parses back");

    assert_eq!(decoded.probability, result.probability);
    assert_eq!(decoded.base_probability, result.base_probability);
    assert_eq!(decoded.factors.len(), result.factors.len());
}

#[test]
fn report_mapping_exposes_the_contracted_keys() {
    let result = analyzer().analyze(&baseline()).expect("baseline analyzes");
    let report = result.to_report();

    for key in [
        "probability",
        "base_probability",
        "factors",
        "layers",
        "metadata",
    ] {
        assert!(report.get(key).is_some(), "report missing key '{key}'");
    }
    assert_eq!(
        report["metadata"]["engine_version"],
        env!("CARGO_PKG_VERSION")
    );
}

#[test]
fn monotonicity_holds_for_known_bonus_and_penalty_flags() {
    let analyzer = analyzer();

    // Bonus flag false → true never decreases the final probability.
    let mut context = baseline();
    context.clinical.primary_endpoint_met = Some(true);
    let without = analyzer.analyze(&context).expect("analyzes");
    context.designations.breakthrough_therapy = true;
    let with = analyzer.analyze(&context).expect("analyzes");
    assert!(with.probability >= without.probability);

    // Penalty flag false → true never increases it.
    let mut context = baseline();
    context.clinical.primary_endpoint_met = Some(true);
    let without = analyzer.analyze(&context).expect("analyzes");
    context.citizen_petition.pending = true;
    let with = analyzer.analyze(&context).expect("analyzes");
    assert!(with.probability <= without.probability);
}

#[test]
fn summary_view_tracks_the_full_result() {
    let mut context = baseline();
    context.designations.fast_track = true;
    let result = analyzer().analyze(&context).expect("context analyzes");

    let view = result.summary_view();
    assert_eq!(view.probability, result.probability);
    assert_eq!(view.base_probability, result.base_probability);
    assert_eq!(view.factors_applied, result.metadata.factors_applied);
    assert_eq!(view.warning_count, result.warnings.len());
}
