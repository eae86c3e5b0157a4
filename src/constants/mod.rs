//! Read-only repository of adjustment magnitudes and base rates.
//!
//! The table is keyed by `(category, key)` and loaded exactly once per
//! process: either from the file named by `ODDS_CONSTANTS_PATH` or from the
//! embedded default table. A missing entry is never an error — evaluators
//! fall back to their literal defaults and flag the result with a
//! data-quality warning.

use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

const EMBEDDED_DEFAULTS: &str = include_str!("defaults.csv");

/// Lifecycle marker for a constant row. `Retired` rows stay in the file for
/// history but are reported as absent by lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstantStatus {
    Active,
    Provisional,
    Retired,
}

impl ConstantStatus {
    fn parse(value: &str) -> Result<Self, ConstantsError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "provisional" => Ok(Self::Provisional),
            "retired" => Ok(Self::Retired),
            _ => Err(ConstantsError::UnknownStatus {
                value: value.to_string(),
            }),
        }
    }
}

/// One configured magnitude plus its provenance notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantEntry {
    pub score: f64,
    pub status: ConstantStatus,
    pub notes: String,
}

#[derive(Debug, Deserialize)]
struct ConstantRow {
    category: String,
    key: String,
    score: f64,
    status: String,
    notes: String,
}

/// Immutable `(category, key) → entry` snapshot.
#[derive(Debug, Clone, Default)]
pub struct ConstantsRepository {
    entries: BTreeMap<(String, String), ConstantEntry>,
}

impl ConstantsRepository {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConstantsError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = BTreeMap::new();
        for record in csv_reader.deserialize::<ConstantRow>() {
            let row = record?;
            let status = ConstantStatus::parse(&row.status)?;
            let key = (row.category, row.key);
            if entries.contains_key(&key) {
                return Err(ConstantsError::Duplicate {
                    category: key.0,
                    key: key.1,
                });
            }
            entries.insert(
                key,
                ConstantEntry {
                    score: row.score,
                    status,
                    notes: row.notes,
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConstantsError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// The table shipped with the crate. An unparsable embedded table is a
    /// build defect, so this degrades to an empty repository rather than
    /// panicking; every evaluator still works through its literal fallback.
    pub fn embedded_defaults() -> Self {
        match Self::from_reader(EMBEDDED_DEFAULTS.as_bytes()) {
            Ok(repository) => repository,
            Err(err) => {
                warn!(error = %err, "embedded constants table failed to parse");
                Self::default()
            }
        }
    }

    /// Process-wide snapshot, loaded lazily on first use and never mutated
    /// afterward. Concurrent `analyze` calls read it without locking.
    pub fn shared() -> &'static ConstantsRepository {
        static SHARED: OnceLock<ConstantsRepository> = OnceLock::new();
        SHARED.get_or_init(|| match env::var("ODDS_CONSTANTS_PATH") {
            Ok(path) => match Self::from_path(Path::new(&path)) {
                Ok(repository) => repository,
                Err(err) => {
                    warn!(
                        path = %path,
                        error = %err,
                        "constants file rejected; using embedded defaults"
                    );
                    Self::embedded_defaults()
                }
            },
            Err(_) => Self::embedded_defaults(),
        })
    }

    pub fn lookup(&self, category: &str, key: &str) -> Option<&ConstantEntry> {
        self.entries
            .get(&(category.to_string(), key.to_string()))
            .filter(|entry| entry.status != ConstantStatus::Retired)
    }

    /// Resolve a magnitude, falling back to the literal default when the
    /// entry is absent or retired. The flag reports whether the fallback was
    /// used so the caller can record a warning.
    pub fn score_or(&self, category: &str, key: &str, fallback: f64) -> (f64, bool) {
        match self.lookup(category, key) {
            Some(entry) => (entry.score, false),
            None => (fallback, true),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConstantsError {
    #[error("constants file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("constants table malformed: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate constant {category}/{key}")]
    Duplicate { category: String, key: String },
    #[error("unknown constant status '{value}'")]
    UnknownStatus { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse_and_resolve() {
        let repository = ConstantsRepository::embedded_defaults();
        assert!(!repository.is_empty());

        let entry = repository
            .lookup("base", "new_application")
            .expect("default base rate present");
        assert_eq!(entry.status, ConstantStatus::Active);
        assert!(entry.score > 0.0 && entry.score < 1.0);
    }

    #[test]
    fn retired_entries_report_as_absent() {
        let repository = ConstantsRepository::embedded_defaults();
        assert!(repository.lookup("caps", "crl_same_cycle").is_none());

        let (score, fallback_used) = repository.score_or("caps", "crl_same_cycle", 0.45);
        assert_eq!(score, 0.45);
        assert!(fallback_used);
    }

    #[test]
    fn missing_entry_uses_fallback_with_flag() {
        let repository = ConstantsRepository::embedded_defaults();
        let (score, fallback_used) = repository.score_or("base", "no_such_key", 0.5);
        assert_eq!(score, 0.5);
        assert!(fallback_used);
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let data = "category,key,score,status,notes\n\
                    base,new_application,0.8,active,first\n\
                    base,new_application,0.9,active,second\n";
        let err = ConstantsRepository::from_reader(data.as_bytes())
            .expect_err("duplicate rows must fail");
        assert!(matches!(err, ConstantsError::Duplicate { .. }));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let data = "category,key,score,status,notes\n\
                    base,new_application,0.8,experimental,typo\n";
        let err = ConstantsRepository::from_reader(data.as_bytes())
            .expect_err("unknown status must fail");
        assert!(matches!(err, ConstantsError::UnknownStatus { .. }));
    }
}
