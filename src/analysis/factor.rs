//! Factor metadata and the per-factor outcome value object.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::context::AnalysisContext;

/// The fixed layer sequence. Never reordered at runtime; `ordered()` is the
/// single source of truth for execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Base,
    Designation,
    #[serde(rename = "adcom")]
    AdCom,
    Crl,
    Clinical,
    Manufacturing,
    Dispute,
    EarningsCall,
    CitizenPetition,
    Special,
    Context,
    Cap,
}

impl Layer {
    pub const fn ordered() -> [Layer; 12] {
        [
            Layer::Base,
            Layer::Designation,
            Layer::AdCom,
            Layer::Crl,
            Layer::Clinical,
            Layer::Manufacturing,
            Layer::Dispute,
            Layer::EarningsCall,
            Layer::CitizenPetition,
            Layer::Special,
            Layer::Context,
            Layer::Cap,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Layer::Base => "base",
            Layer::Designation => "designation",
            Layer::AdCom => "adcom",
            Layer::Crl => "crl",
            Layer::Clinical => "clinical",
            Layer::Manufacturing => "manufacturing",
            Layer::Dispute => "dispute",
            Layer::EarningsCall => "earnings_call",
            Layer::CitizenPetition => "citizen_petition",
            Layer::Special => "special",
            Layer::Context => "context",
            Layer::Cap => "cap",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How members of a group interact once evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupPolicy {
    /// Keep only the member with the largest absolute adjustment; ties go to
    /// the earlier `(order, registration sequence)` member.
    MaxOnly,
    /// Members stack additively; the group exists for reporting only.
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorGroup {
    pub name: &'static str,
    pub policy: GroupPolicy,
}

/// Pure evaluation handler: `(context, current probability) → result`.
/// Deterministic, no I/O, never panics on missing evidence.
pub type FactorEvaluator = Arc<dyn Fn(&AnalysisContext, f64) -> FactorResult + Send + Sync>;

/// Registered scoring rule: metadata plus a handler reference.
#[derive(Clone)]
pub struct FactorDefinition {
    pub name: &'static str,
    pub layer: Layer,
    /// Ascending within the layer; ties broken by registration sequence.
    pub order: i32,
    /// Audit-only label, surfaced in reasons and reports.
    pub version: &'static str,
    pub description: &'static str,
    pub group: Option<FactorGroup>,
    pub evaluator: FactorEvaluator,
}

impl fmt::Debug for FactorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactorDefinition")
            .field("name", &self.name)
            .field("layer", &self.layer)
            .field("order", &self.order)
            .field("version", &self.version)
            .field("group", &self.group)
            .finish()
    }
}

/// Outcome of one factor evaluation. Invariant: a non-applied result always
/// carries a zero adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorResult {
    pub name: String,
    /// Signed fraction; 0.05 reads as +5 points of probability.
    pub adjustment: f64,
    pub reason: String,
    pub applied: bool,
    pub confidence: f64,
    /// Data-quality diagnostic (constant fallback, missing date), collected
    /// into the analysis-level warning list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl FactorResult {
    /// The dominant return path: the triggering condition is absent.
    pub fn neutral(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            adjustment: 0.0,
            reason: reason.into(),
            applied: false,
            confidence: 1.0,
            warning: None,
        }
    }

    pub fn applied(
        name: &str,
        adjustment: f64,
        reason: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            adjustment,
            reason: reason.into(),
            applied: true,
            confidence,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    /// Annotate the fallback flag from a constants lookup.
    pub fn flag_fallback(self, fallback_used: bool, category: &str, key: &str) -> Self {
        if fallback_used {
            self.with_warning(format!(
                "constant {category}/{key} undefined; literal fallback used"
            ))
        } else {
            self
        }
    }

    /// Mark this result as discarded by group resolution, keeping the
    /// original reason visible for the audit trail.
    pub(crate) fn supersede(&mut self, winner: &str) {
        self.applied = false;
        self.adjustment = 0.0;
        self.reason = format!("{} (superseded by {winner})", self.reason);
    }
}
