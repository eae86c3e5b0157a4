/// Error raised by registry construction or an `analyze` call.
///
/// Missing evidentiary data is never represented here: a factor whose
/// triggering condition is absent returns a neutral result, and a missing
/// constant resolves to a literal fallback plus a data-quality warning on the
/// result.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("factor '{name}' is already registered")]
    DuplicateFactor { name: String },
    #[error("registry is frozen; cannot register factor '{name}' after the first analysis")]
    RegistryFrozen { name: String },
    #[error("invalid analysis context: {field}: {reason}")]
    InvalidContext { field: &'static str, reason: String },
}
