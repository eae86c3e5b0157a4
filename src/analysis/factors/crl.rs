//! CRL and resubmission layer.
//!
//! The resubmission base rates already price a prior CRL into the current
//! cycle, so the history penalty only fires when the application is not
//! itself a resubmission.

use std::sync::Arc;

use crate::analysis::context::AnalysisContext;
use crate::analysis::factor::{FactorDefinition, FactorResult, Layer};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "prior_crl_history",
        layer: Layer::Crl,
        order: 10,
        version: "1",
        description: "Prior CRL outside the current review cycle",
        group: None,
        evaluator: Arc::new(prior_crl_history),
    })?;
    registry.register(FactorDefinition {
        name: "cmc_only_resubmission",
        layer: Layer::Crl,
        order: 20,
        version: "1",
        description: "Resubmission limited to chemistry and manufacturing fixes",
        group: None,
        evaluator: Arc::new(cmc_only_resubmission),
    })
}

fn prior_crl_history(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.crl.prior_crl {
        return FactorResult::neutral("prior_crl_history", "no prior CRL on record");
    }
    if context.crl.resubmission_class.is_some() {
        return FactorResult::neutral(
            "prior_crl_history",
            "prior CRL already priced into the resubmission base rate",
        );
    }

    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("crl", "prior_crl_history", -0.08);
    FactorResult::applied(
        "prior_crl_history",
        penalty,
        "prior CRL on record for the program",
        0.85,
    )
    .flag_fallback(fallback_used, "crl", "prior_crl_history")
}

fn cmc_only_resubmission(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.crl.cmc_only {
        return FactorResult::neutral("cmc_only_resubmission", "deficiencies not CMC-only");
    }

    let (bonus, fallback_used) =
        ConstantsRepository::shared().score_or("crl", "cmc_only_resubmission", 0.06);
    FactorResult::applied(
        "cmc_only_resubmission",
        bonus,
        "resubmission addresses manufacturing deficiencies only",
        0.85,
    )
    .flag_fallback(fallback_used, "crl", "cmc_only_resubmission")
}
