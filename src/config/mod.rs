use std::env;
use std::fmt;
use std::path::PathBuf;

/// Hard bounds applied after the final layer.
pub const DEFAULT_PROBABILITY_FLOOR: f64 = 0.02;
pub const DEFAULT_PROBABILITY_CEILING: f64 = 0.98;

/// Top-level configuration for the analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub probability_floor: f64,
    pub probability_ceiling: f64,
    /// Optional replacement for the embedded constants table.
    pub constants_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            probability_floor: DEFAULT_PROBABILITY_FLOOR,
            probability_ceiling: DEFAULT_PROBABILITY_CEILING,
            constants_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let probability_floor = parse_bound("ODDS_PROB_FLOOR", DEFAULT_PROBABILITY_FLOOR)
            .map_err(|value| ConfigError::InvalidFloor { value })?;
        let probability_ceiling = parse_bound("ODDS_PROB_CEILING", DEFAULT_PROBABILITY_CEILING)
            .map_err(|value| ConfigError::InvalidCeiling { value })?;

        if probability_floor >= probability_ceiling {
            return Err(ConfigError::InvertedBounds {
                floor: probability_floor,
                ceiling: probability_ceiling,
            });
        }

        let constants_path = env::var("ODDS_CONSTANTS_PATH").ok().map(PathBuf::from);
        let log_level = env::var("ODDS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            probability_floor,
            probability_ceiling,
            constants_path,
            log_level,
        })
    }
}

fn parse_bound(var: &str, default: f64) -> Result<f64, String> {
    match env::var(var) {
        Ok(raw) => {
            let parsed = raw.trim().parse::<f64>().map_err(|_| raw.clone())?;
            if (0.0..=1.0).contains(&parsed) {
                Ok(parsed)
            } else {
                Err(raw)
            }
        }
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFloor { value: String },
    InvalidCeiling { value: String },
    InvertedBounds { floor: f64, ceiling: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFloor { value } => {
                write!(f, "ODDS_PROB_FLOOR '{value}' must be a fraction in [0, 1]")
            }
            ConfigError::InvalidCeiling { value } => {
                write!(
                    f,
                    "ODDS_PROB_CEILING '{value}' must be a fraction in [0, 1]"
                )
            }
            ConfigError::InvertedBounds { floor, ceiling } => {
                write!(
                    f,
                    "probability floor {floor} must be below ceiling {ceiling}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
