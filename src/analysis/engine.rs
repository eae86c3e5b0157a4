//! Layer execution engine.
//!
//! Walks the fixed layer sequence, evaluates each layer's factors against the
//! running probability, resolves mutually-exclusive groups, accumulates, and
//! clamps the final value. Identical context and registry state always
//! produce a byte-identical ordered result — downstream decisions and
//! regression baselines depend on it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::context::AnalysisContext;
use super::factor::{FactorDefinition, FactorResult, GroupPolicy, Layer};
use super::registry::FactorRegistry;
use super::result::{AnalysisResult, LayerSummary, RunMetadata};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;

pub struct Analyzer {
    registry: Arc<FactorRegistry>,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(registry: FactorRegistry) -> Self {
        Self::with_config(registry, AnalyzerConfig::default())
    }

    pub fn with_config(registry: FactorRegistry, config: AnalyzerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    pub fn registry(&self) -> &FactorRegistry {
        &self.registry
    }

    /// Run the full layer sequence over one evidence snapshot.
    ///
    /// Returns a complete result with embedded warnings, or a typed error;
    /// there is no partial result. The registry freezes on the first call.
    pub fn analyze(&self, context: &AnalysisContext) -> Result<AnalysisResult, AnalysisError> {
        context.validate()?;
        self.registry.freeze();

        let mut probability = 0.0_f64;
        let mut base_probability = 0.0_f64;
        let mut factors = Vec::new();
        let mut layers = Vec::new();
        let mut warnings = Vec::new();

        for layer in Layer::ordered() {
            let input_prob = probability;
            let definitions = self.registry.factors_for_layer(layer);

            let mut results: Vec<FactorResult> = definitions
                .iter()
                .map(|&definition| evaluate_one(definition, context, input_prob))
                .collect();

            resolve_groups(&definitions, &mut results);

            let total_adjustment: f64 = results
                .iter()
                .filter(|result| result.applied)
                .map(|result| result.adjustment)
                .sum();
            probability = input_prob + total_adjustment;

            for result in &results {
                if let Some(warning) = &result.warning {
                    warn!(factor = %result.name, %warning, "data-quality warning");
                    warnings.push(format!("{}: {warning}", result.name));
                }
            }

            debug!(
                layer = %layer,
                input = input_prob,
                output = probability,
                evaluated = results.len(),
                "layer complete"
            );

            if layer == Layer::Base {
                base_probability = probability;
            }

            layers.push(LayerSummary {
                layer,
                input_prob,
                output_prob: probability,
                total_adjustment,
                factors_applied: results.clone(),
            });
            factors.extend(results);
        }

        let final_probability =
            probability.clamp(self.config.probability_floor, self.config.probability_ceiling);

        let factors_evaluated = factors.len();
        let factors_applied = factors.iter().filter(|factor| factor.applied).count();
        let confidence = aggregate_confidence(&factors, warnings.len());

        info!(
            probability = final_probability,
            base = base_probability,
            applied = factors_applied,
            warnings = warnings.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            probability: final_probability,
            base_probability,
            factors,
            layers,
            confidence,
            warnings,
            metadata: RunMetadata {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                analysis_date: context.analysis_date,
                factors_evaluated,
                factors_applied,
            },
        })
    }
}

/// Evaluate a single factor and enforce the neutral invariant: a non-applied
/// result never carries an adjustment.
fn evaluate_one(
    definition: &FactorDefinition,
    context: &AnalysisContext,
    probability: f64,
) -> FactorResult {
    let mut result = (definition.evaluator)(context, probability);
    result.name = definition.name.to_string();
    if !result.applied && result.adjustment != 0.0 {
        result.adjustment = 0.0;
    }
    result
}

/// Resolve MAX_ONLY groups within one layer.
///
/// Among applied members of a group, keep the one with the maximal absolute
/// adjustment; ties go to the member that comes first in the already-sorted
/// `(order, registration sequence)` ordering. Everything else is forced
/// neutral but keeps its reason, annotated as superseded. SUM groups stack
/// and are left untouched.
fn resolve_groups(definitions: &[&FactorDefinition], results: &mut [FactorResult]) {
    let mut seen_groups: Vec<&'static str> = Vec::new();

    for index in 0..definitions.len() {
        let group = match definitions[index].group {
            Some(group) if group.policy == GroupPolicy::MaxOnly => group,
            _ => continue,
        };
        if seen_groups.contains(&group.name) {
            continue;
        }
        seen_groups.push(group.name);

        let members: Vec<usize> = definitions
            .iter()
            .enumerate()
            .filter(|(_, definition)| {
                definition
                    .group
                    .is_some_and(|candidate| candidate.name == group.name)
            })
            .map(|(member, _)| member)
            .collect();

        let mut winner: Option<usize> = None;
        for &member in &members {
            if !results[member].applied {
                continue;
            }
            match winner {
                // Strict comparison keeps the earlier member on ties.
                Some(best) if results[member].adjustment.abs() <= results[best].adjustment.abs() => {}
                _ => winner = Some(member),
            }
        }

        let Some(winner) = winner else { continue };
        let winner_name = results[winner].name.clone();
        for &member in &members {
            if member != winner && results[member].applied {
                results[member].supersede(&winner_name);
            }
        }
    }
}

/// Mean confidence over applied factors, nudged down per data-quality
/// warning. A run with nothing applied reports full confidence.
fn aggregate_confidence(factors: &[FactorResult], warning_count: usize) -> f64 {
    let applied: Vec<&FactorResult> = factors.iter().filter(|factor| factor.applied).collect();
    let mean = if applied.is_empty() {
        1.0
    } else {
        applied.iter().map(|factor| factor.confidence).sum::<f64>() / applied.len() as f64
    };
    (mean - 0.02 * warning_count as f64).clamp(0.0, 1.0)
}
