//! Analysis output: final probability plus the complete ordered audit trail.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::factor::{FactorResult, Layer};

/// One layer's contribution. `factors_applied` keeps every evaluated result
/// in order, including members discarded by group resolution, so an auditor
/// can see why a signal did not count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub layer: Layer,
    pub input_prob: f64,
    pub output_prob: f64,
    pub total_adjustment: f64,
    pub factors_applied: Vec<FactorResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub engine_version: String,
    pub analysis_date: NaiveDate,
    pub factors_evaluated: usize,
    pub factors_applied: usize,
}

/// Complete result for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Final probability after clamping to the configured floor/ceiling.
    pub probability: f64,
    /// Probability right after the base layer, before any adjustments.
    pub base_probability: f64,
    pub factors: Vec<FactorResult>,
    pub layers: Vec<LayerSummary>,
    pub confidence: f64,
    pub warnings: Vec<String>,
    pub metadata: RunMetadata,
}

impl AnalysisResult {
    /// Structured mapping for downstream reporting tools.
    pub fn to_report(&self) -> Value {
        json!({
            "probability": self.probability,
            "base_probability": self.base_probability,
            "factors": self.factors,
            "layers": self.layers,
            "metadata": self.metadata,
        })
    }

    /// Compact view for status endpoints and logs.
    pub fn summary_view(&self) -> AnalysisSummaryView {
        AnalysisSummaryView {
            probability: self.probability,
            base_probability: self.base_probability,
            factors_applied: self.metadata.factors_applied,
            confidence: self.confidence,
            warning_count: self.warnings.len(),
        }
    }

    pub fn applied_factor(&self, name: &str) -> Option<&FactorResult> {
        self.factors
            .iter()
            .find(|factor| factor.name == name && factor.applied)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummaryView {
    pub probability: f64,
    pub base_probability: f64,
    pub factors_applied: usize,
    pub confidence: f64,
    pub warning_count: usize,
}
