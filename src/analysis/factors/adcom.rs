//! Advisory committee layer.
//!
//! The vote-outcome factors are exclusive by predicate (the ratio bands do
//! not overlap) and additionally share a MAX_ONLY group so a future band
//! change cannot silently double-count. The waiver factor stacks on its own.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{
    FactorDefinition, FactorGroup, FactorResult, GroupPolicy, Layer,
};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

const POSITIVE_THRESHOLD: f64 = 2.0 / 3.0;
const NEGATIVE_THRESHOLD: f64 = 1.0 / 3.0;

const GROUP: FactorGroup = FactorGroup {
    name: "adcom_outcome",
    policy: GroupPolicy::MaxOnly,
};

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "adcom_positive",
        layer: Layer::AdCom,
        order: 10,
        version: "1",
        description: "Committee voted at or above two thirds in favor",
        group: Some(GROUP),
        evaluator: Arc::new(positive),
    })?;
    registry.register(FactorDefinition {
        name: "adcom_mixed",
        layer: Layer::AdCom,
        order: 20,
        version: "1",
        description: "Committee vote split between the thirds",
        group: Some(GROUP),
        evaluator: Arc::new(mixed),
    })?;
    registry.register(FactorDefinition {
        name: "adcom_negative",
        layer: Layer::AdCom,
        order: 30,
        version: "1",
        description: "Committee voted below one third in favor",
        group: Some(GROUP),
        evaluator: Arc::new(negative),
    })?;
    registry.register(FactorDefinition {
        name: "adcom_waived",
        layer: Layer::AdCom,
        order: 40,
        version: "1",
        description: "Agency waived the committee meeting",
        group: None,
        evaluator: Arc::new(waived),
    })
}

fn vote_ratio(context: &AnalysisContext) -> Option<f64> {
    if context.adcom.held {
        context.adcom.vote_ratio
    } else {
        None
    }
}

fn positive(context: &AnalysisContext, _current: f64) -> FactorResult {
    match vote_ratio(context) {
        Some(ratio) if ratio >= POSITIVE_THRESHOLD => {
            let (bonus, fallback_used) =
                ConstantsRepository::shared().score_or("adcom", "positive", 0.08);
            FactorResult::applied(
                "adcom_positive",
                bonus,
                format!("committee voted {:.0}% in favor", ratio * 100.0),
                0.9,
            )
            .flag_fallback(fallback_used, "adcom", "positive")
        }
        Some(_) => FactorResult::neutral("adcom_positive", "vote below the positive band"),
        None => FactorResult::neutral("adcom_positive", "no committee meeting held"),
    }
}

fn mixed(context: &AnalysisContext, _current: f64) -> FactorResult {
    match vote_ratio(context) {
        Some(ratio) if (NEGATIVE_THRESHOLD..POSITIVE_THRESHOLD).contains(&ratio) => {
            let (penalty, fallback_used) =
                ConstantsRepository::shared().score_or("adcom", "mixed", -0.05);
            FactorResult::applied(
                "adcom_mixed",
                penalty,
                format!("split committee vote at {:.0}% in favor", ratio * 100.0),
                0.8,
            )
            .flag_fallback(fallback_used, "adcom", "mixed")
        }
        Some(_) => FactorResult::neutral("adcom_mixed", "vote outside the mixed band"),
        None => FactorResult::neutral("adcom_mixed", "no committee meeting held"),
    }
}

fn negative(context: &AnalysisContext, _current: f64) -> FactorResult {
    match vote_ratio(context) {
        Some(ratio) if ratio < NEGATIVE_THRESHOLD => {
            let (penalty, fallback_used) =
                ConstantsRepository::shared().score_or("adcom", "negative", -0.20);
            FactorResult::applied(
                "adcom_negative",
                penalty,
                format!("committee voted {:.0}% in favor", ratio * 100.0),
                0.9,
            )
            .flag_fallback(fallback_used, "adcom", "negative")
        }
        Some(_) => FactorResult::neutral("adcom_negative", "vote above the negative band"),
        None => FactorResult::neutral("adcom_negative", "no committee meeting held"),
    }
}

fn waived(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.adcom.waived {
        return FactorResult::neutral("adcom_waived", "meeting not waived");
    }
    let (bonus, fallback_used) = ConstantsRepository::shared().score_or("adcom", "waived", 0.02);
    FactorResult::applied(
        "adcom_waived",
        bonus,
        "agency waived the advisory committee meeting",
        0.7,
    )
    .flag_fallback(fallback_used, "adcom", "waived")
}
