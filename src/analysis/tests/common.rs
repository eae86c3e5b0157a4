use chrono::NaiveDate;

use crate::analysis::context::AnalysisContext;
use crate::analysis::engine::Analyzer;
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;

pub(super) fn analysis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
}

pub(super) fn baseline_context() -> AnalysisContext {
    AnalysisContext::baseline(analysis_date())
}

pub(super) fn analyzer() -> Analyzer {
    let registry = FactorRegistry::with_standard_factors().expect("standard factors register");
    Analyzer::new(registry)
}

/// Resolve a configured magnitude the same way the evaluators do, so the
/// assertions track the constants table instead of hardcoding copies.
pub(super) fn constant(category: &str, key: &str, fallback: f64) -> f64 {
    ConstantsRepository::shared().score_or(category, key, fallback).0
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
