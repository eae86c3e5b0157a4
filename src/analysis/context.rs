//! Immutable evidence snapshot consumed by the analyzer.
//!
//! The enrichment pipeline that populates these fields from external sources
//! lives outside this crate; the analyzer treats the snapshot as frozen and
//! performs no further queries. Absence of evidence (all-false flags, `None`
//! outcomes) is the neutral path, never an error — `validate` only rejects
//! combinations that signal an upstream contract violation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Expedited-program statuses. Correlated signals: the designation layer
/// allows at most one of them to count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationFlags {
    pub breakthrough_therapy: bool,
    pub priority_review: bool,
    pub fast_track: bool,
    pub orphan_drug: bool,
    pub accelerated_approval: bool,
}

/// Advisory committee state. `vote_ratio` is the fraction of yes votes and
/// must be present whenever a meeting was held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdComState {
    pub held: bool,
    pub waived: bool,
    pub vote_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResubmissionClass {
    Class1,
    Class2,
}

/// Complete-response-letter history for the program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrlState {
    pub prior_crl: bool,
    pub resubmission_class: Option<ResubmissionClass>,
    /// Resubmission addresses chemistry/manufacturing deficiencies only.
    pub cmc_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialRegion {
    #[default]
    Global,
    UsOnly,
    ExUsOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalState {
    /// `None` when topline data is not yet public.
    pub primary_endpoint_met: Option<bool>,
    pub single_arm: bool,
    pub trial_region: TrialRegion,
    pub mental_health_category: bool,
    pub clinical_hold_history: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturingState {
    pub pai_passed: Option<bool>,
    pub warning_letter: bool,
    pub warning_letter_date: Option<NaiveDate>,
    /// Form-483 observation count from the most recent inspection.
    pub observation_count: u8,
    pub last_inspection_date: Option<NaiveDate>,
    pub high_risk_cmo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeOutcome {
    Overturned,
    Upheld,
    Pending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeState {
    pub outcome: Option<DisputeOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagementTone {
    Confident,
    Neutral,
    Cautious,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsCallSignals {
    pub management_tone: Option<ManagementTone>,
    pub guidance_withdrawn: bool,
    pub pdufa_reaffirmed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitizenPetitionState {
    pub pending: bool,
    pub recently_denied: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialFlags {
    pub biosimilar: bool,
    pub supplement: bool,
    pub spa_agreed: bool,
    pub spa_rescinded: bool,
    /// Deliberately excluded from every group so it stacks with everything.
    pub first_in_class: bool,
}

/// Evidence snapshot for one pending decision, built once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub designations: DesignationFlags,
    pub adcom: AdComState,
    pub crl: CrlState,
    pub clinical: ClinicalState,
    pub manufacturing: ManufacturingState,
    pub dispute: DisputeState,
    pub earnings: EarningsCallSignals,
    pub citizen_petition: CitizenPetitionState,
    pub special: SpecialFlags,
    /// Reference date for all recency math; the analyzer never reads a clock.
    pub analysis_date: NaiveDate,
}

impl AnalysisContext {
    /// All-neutral snapshot: no designations, no history, no signals.
    pub fn baseline(analysis_date: NaiveDate) -> Self {
        Self {
            designations: DesignationFlags::default(),
            adcom: AdComState::default(),
            crl: CrlState::default(),
            clinical: ClinicalState::default(),
            manufacturing: ManufacturingState::default(),
            dispute: DisputeState::default(),
            earnings: EarningsCallSignals::default(),
            citizen_petition: CitizenPetitionState::default(),
            special: SpecialFlags::default(),
            analysis_date,
        }
    }

    /// Reject combinations that violate the upstream contract. Fatal for the
    /// call; missing business evidence never lands here.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.adcom.held && self.adcom.waived {
            return Err(AnalysisError::InvalidContext {
                field: "adcom",
                reason: "meeting cannot be both held and waived".to_string(),
            });
        }

        if self.adcom.held {
            match self.adcom.vote_ratio {
                None => {
                    return Err(AnalysisError::InvalidContext {
                        field: "adcom.vote_ratio",
                        reason: "vote ratio required when a meeting was held".to_string(),
                    });
                }
                Some(ratio) if !(0.0..=1.0).contains(&ratio) => {
                    return Err(AnalysisError::InvalidContext {
                        field: "adcom.vote_ratio",
                        reason: format!("vote ratio {ratio} outside [0, 1]"),
                    });
                }
                Some(_) => {}
            }
        }

        if self.crl.resubmission_class.is_some() && !self.crl.prior_crl {
            return Err(AnalysisError::InvalidContext {
                field: "crl.resubmission_class",
                reason: "resubmission class present without a prior CRL".to_string(),
            });
        }

        if self.crl.cmc_only && self.crl.resubmission_class.is_none() {
            return Err(AnalysisError::InvalidContext {
                field: "crl.cmc_only",
                reason: "CMC-only flag requires a resubmission class".to_string(),
            });
        }

        if self.special.spa_rescinded && !self.special.spa_agreed {
            return Err(AnalysisError::InvalidContext {
                field: "special.spa_rescinded",
                reason: "SPA cannot be rescinded without ever being agreed".to_string(),
            });
        }

        Ok(())
    }

    /// Whether the warning letter counts as recent (within two years of the
    /// analysis date). A letter without a date is treated as recent; the
    /// manufacturing factor reports the gap as a data-quality warning.
    pub fn warning_letter_recent(&self) -> bool {
        if !self.manufacturing.warning_letter {
            return false;
        }
        match self.manufacturing.warning_letter_date {
            Some(issued) => within_two_years(issued, self.analysis_date),
            None => true,
        }
    }

    /// Whether the latest inspection observations count as recent.
    pub fn observations_recent(&self) -> bool {
        match self.manufacturing.last_inspection_date {
            Some(inspected) => within_two_years(inspected, self.analysis_date),
            None => true,
        }
    }
}

fn within_two_years(event: NaiveDate, reference: NaiveDate) -> bool {
    (reference - event).num_days() <= 730
}
