//! Factor registry, layer execution engine, and the value objects they
//! exchange.

pub mod context;
pub mod engine;
pub mod factor;
pub(crate) mod factors;
pub mod registry;
pub mod result;

#[cfg(test)]
mod tests;

pub use context::AnalysisContext;
pub use engine::Analyzer;
pub use factor::{FactorDefinition, FactorResult, GroupPolicy, Layer};
pub use registry::FactorRegistry;
pub use result::{AnalysisResult, LayerSummary};
