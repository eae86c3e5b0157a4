//! Earnings-call layer: management commentary signals.
//!
//! Soft evidence — every factor here carries reduced confidence.

use std::sync::Arc;

use crate::analysis::context::{AnalysisContext, ManagementTone};
use crate::analysis::factor::{FactorDefinition, FactorResult, Layer};
use crate::analysis::registry::FactorRegistry;
use crate::constants::ConstantsRepository;
use crate::error::AnalysisError;

pub(crate) fn register(registry: &mut FactorRegistry) -> Result<(), AnalysisError> {
    registry.register(FactorDefinition {
        name: "management_confident",
        layer: Layer::EarningsCall,
        order: 10,
        version: "1",
        description: "Confident management tone on the latest call",
        group: None,
        evaluator: Arc::new(confident),
    })?;
    registry.register(FactorDefinition {
        name: "management_cautious",
        layer: Layer::EarningsCall,
        order: 20,
        version: "1",
        description: "Cautious management tone on the latest call",
        group: None,
        evaluator: Arc::new(cautious),
    })?;
    registry.register(FactorDefinition {
        name: "guidance_withdrawn",
        layer: Layer::EarningsCall,
        order: 30,
        version: "1",
        description: "Product revenue guidance withdrawn",
        group: None,
        evaluator: Arc::new(guidance_withdrawn),
    })?;
    registry.register(FactorDefinition {
        name: "pdufa_reaffirmed",
        layer: Layer::EarningsCall,
        order: 40,
        version: "1",
        description: "Management reaffirmed the action date",
        group: None,
        evaluator: Arc::new(pdufa_reaffirmed),
    })
}

fn confident(context: &AnalysisContext, _current: f64) -> FactorResult {
    if context.earnings.management_tone != Some(ManagementTone::Confident) {
        return FactorResult::neutral("management_confident", "tone not confident");
    }
    let (bonus, fallback_used) =
        ConstantsRepository::shared().score_or("earnings", "confident_tone", 0.02);
    FactorResult::applied(
        "management_confident",
        bonus,
        "management conveyed confidence on the latest call",
        0.6,
    )
    .flag_fallback(fallback_used, "earnings", "confident_tone")
}

fn cautious(context: &AnalysisContext, _current: f64) -> FactorResult {
    if context.earnings.management_tone != Some(ManagementTone::Cautious) {
        return FactorResult::neutral("management_cautious", "tone not cautious");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("earnings", "cautious_tone", -0.03);
    FactorResult::applied(
        "management_cautious",
        penalty,
        "management conveyed caution on the latest call",
        0.6,
    )
    .flag_fallback(fallback_used, "earnings", "cautious_tone")
}

fn guidance_withdrawn(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.earnings.guidance_withdrawn {
        return FactorResult::neutral("guidance_withdrawn", "guidance unchanged");
    }
    let (penalty, fallback_used) =
        ConstantsRepository::shared().score_or("earnings", "guidance_withdrawn", -0.04);
    FactorResult::applied(
        "guidance_withdrawn",
        penalty,
        "revenue guidance tied to the product was withdrawn",
        0.65,
    )
    .flag_fallback(fallback_used, "earnings", "guidance_withdrawn")
}

fn pdufa_reaffirmed(context: &AnalysisContext, _current: f64) -> FactorResult {
    if !context.earnings.pdufa_reaffirmed {
        return FactorResult::neutral("pdufa_reaffirmed", "action date not discussed");
    }
    let (bonus, fallback_used) =
        ConstantsRepository::shared().score_or("earnings", "pdufa_reaffirmed", 0.01);
    FactorResult::applied(
        "pdufa_reaffirmed",
        bonus,
        "management reaffirmed the action date",
        0.6,
    )
    .flag_fallback(fallback_used, "earnings", "pdufa_reaffirmed")
}
