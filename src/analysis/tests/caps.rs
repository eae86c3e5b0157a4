use chrono::NaiveDate;

use super::common::*;
use crate::analysis::context::{AdComState, AnalysisContext, ManagementTone};

/// Every bonus flag at once, plus a missed endpoint.
fn every_bonus_with_failed_endpoint() -> AnalysisContext {
    let mut context = baseline_context();
    context.designations.breakthrough_therapy = true;
    context.designations.priority_review = true;
    context.designations.fast_track = true;
    context.designations.orphan_drug = true;
    context.designations.accelerated_approval = true;
    context.adcom = AdComState {
        held: true,
        waived: false,
        vote_ratio: Some(0.95),
    };
    context.manufacturing.pai_passed = Some(true);
    context.earnings.management_tone = Some(ManagementTone::Confident);
    context.earnings.pdufa_reaffirmed = true;
    context.citizen_petition.recently_denied = true;
    context.special.spa_agreed = true;
    context.special.first_in_class = true;
    context.clinical.primary_endpoint_met = Some(false);
    context
}

#[test]
fn failed_endpoint_cap_dominates_every_bonus() {
    let analyzer = analyzer();
    let result = analyzer
        .analyze(&every_bonus_with_failed_endpoint())
        .expect("context analyzes");

    let ceiling = constant("caps", "failed_endpoint", 0.15);
    assert!(
        result.probability <= ceiling + 1e-9,
        "probability {} exceeds cap {}",
        result.probability,
        ceiling
    );

    let cap = result
        .applied_factor("failed_endpoint_cap")
        .expect("cap recorded in the audit trail");
    assert!(cap.adjustment < 0.0);
}

#[test]
fn cap_layer_runs_last() {
    let analyzer = analyzer();
    let result = analyzer
        .analyze(&every_bonus_with_failed_endpoint())
        .expect("context analyzes");

    let last = result.layers.last().expect("layers recorded");
    assert_eq!(last.layer.label(), "cap");
    assert_close(last.output_prob, result.probability);
}

#[test]
fn most_restrictive_cap_wins_when_several_fire() {
    let analyzer = analyzer();
    let mut context = baseline_context();
    // Missed endpoint (ceiling 0.15) and a fresh warning letter (ceiling
    // 0.55) both fire; the deeper pull-down must win.
    context.clinical.primary_endpoint_met = Some(false);
    context.manufacturing.warning_letter = true;
    context.manufacturing.warning_letter_date = NaiveDate::from_ymd_opt(2026, 1, 5);

    let result = analyzer.analyze(&context).expect("context analyzes");

    let endpoint_ceiling = constant("caps", "failed_endpoint", 0.15);
    assert!(result.probability <= endpoint_ceiling + 1e-9);

    let letter_cap = result
        .factors
        .iter()
        .find(|factor| factor.name == "open_warning_letter_cap")
        .expect("present in audit trail");
    assert!(!letter_cap.applied);
    assert!(letter_cap.reason.contains("superseded by failed_endpoint_cap"));
}

#[test]
fn cap_under_ceiling_is_recorded_with_zero_effect() {
    let analyzer = analyzer();
    let mut context = baseline_context();
    // Class 2 resubmission starts low; pile on penalties until the running
    // probability sits under the warning-letter ceiling.
    context.crl.prior_crl = true;
    context.crl.resubmission_class = Some(crate::analysis::context::ResubmissionClass::Class2);
    context.manufacturing.warning_letter = true;
    context.manufacturing.warning_letter_date = NaiveDate::from_ymd_opt(2025, 11, 2);
    context.manufacturing.high_risk_cmo = true;
    context.clinical.single_arm = true;
    context.clinical.mental_health_category = true;

    let result = analyzer.analyze(&context).expect("context analyzes");

    let ceiling = constant("caps", "open_warning_letter", 0.55);
    assert!(result.probability <= ceiling + 1e-9);

    let cap = result
        .applied_factor("open_warning_letter_cap")
        .expect("cap stays visible");
    assert_close(cap.adjustment, 0.0);
    assert!(cap.reason.contains("already at or below"));
}

#[test]
fn final_probability_respects_the_configured_floor() {
    let analyzer = analyzer();
    let mut context = baseline_context();
    context.crl.prior_crl = true;
    context.crl.resubmission_class = Some(crate::analysis::context::ResubmissionClass::Class2);
    context.clinical.primary_endpoint_met = Some(false);
    context.clinical.single_arm = true;
    context.clinical.mental_health_category = true;
    context.clinical.clinical_hold_history = true;
    context.manufacturing.pai_passed = Some(false);
    context.manufacturing.warning_letter = true;
    context.manufacturing.high_risk_cmo = true;
    context.special.spa_agreed = true;
    context.special.spa_rescinded = true;
    context.earnings.guidance_withdrawn = true;
    context.citizen_petition.pending = true;

    let result = analyzer.analyze(&context).expect("context analyzes");
    assert!(result.probability >= 0.02 - 1e-9);
    assert!(result.probability <= 0.98 + 1e-9);
}
