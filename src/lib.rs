//! Layered probability analyzer for pending regulatory drug-approval
//! decisions.
//!
//! Evidence arrives as an immutable [`AnalysisContext`] snapshot. A frozen
//! [`FactorRegistry`] holds the scoring rules, organized into twelve fixed
//! layers; the [`Analyzer`] walks the layers in order, resolves
//! mutually-exclusive groups, accumulates adjustments, and applies hard caps
//! last. The output is an [`AnalysisResult`] carrying the final probability
//! together with a complete, ordered audit trail.
//!
//! ```no_run
//! use approval_odds::{AnalysisContext, Analyzer, FactorRegistry};
//! use chrono::NaiveDate;
//!
//! # fn main() -> Result<(), approval_odds::AnalysisError> {
//! let registry = FactorRegistry::with_standard_factors()?;
//! let analyzer = Analyzer::new(registry);
//!
//! let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
//! let context = AnalysisContext::baseline(date);
//! let result = analyzer.analyze(&context)?;
//! println!("approval odds: {:.2}", result.probability);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;

pub use analysis::context::{
    AdComState, AnalysisContext, CitizenPetitionState, ClinicalState, CrlState, DesignationFlags,
    DisputeOutcome, DisputeState, EarningsCallSignals, ManagementTone, ManufacturingState,
    ResubmissionClass, SpecialFlags, TrialRegion,
};
pub use analysis::engine::Analyzer;
pub use analysis::factor::{
    FactorDefinition, FactorEvaluator, FactorGroup, FactorResult, GroupPolicy, Layer,
};
pub use analysis::registry::FactorRegistry;
pub use analysis::result::{AnalysisResult, AnalysisSummaryView, LayerSummary, RunMetadata};
pub use config::{AnalyzerConfig, ConfigError};
pub use constants::{ConstantEntry, ConstantStatus, ConstantsRepository};
pub use error::AnalysisError;
