use serde::{Deserialize, Serialize};

use crate::ranking::skills::{SkillMatchMode, SkillVocabulary};

/// Lower bounds of the qualitative bands. Each bound is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub strong: f64,
    pub moderate: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            strong: 80.0,
            moderate: 60.0,
        }
    }
}

/// Every tunable constant of the scoring pipeline. There is exactly one of these
/// per process, built from `Default` plus environment overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub vocabulary: SkillVocabulary,
    pub skill_match: SkillMatchMode,
    pub experience_bonus_per_year: u32,
    /// Ceiling on the experience bonus.
    pub experience_bonus_cap: u32,
    /// Decimal places kept on semantic and final scores.
    pub score_precision: u32,
    pub bands: BandThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vocabulary: SkillVocabulary::default(),
            skill_match: SkillMatchMode::Substring,
            experience_bonus_per_year: 2,
            experience_bonus_cap: 15,
            score_precision: 2,
            bands: BandThresholds::default(),
        }
    }
}

/// Highest supported `score_precision`; beyond it f64 rounding stops being meaningful
/// on a 0–100 scale.
pub const MAX_SCORE_PRECISION: u32 = 6;

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("skill vocabulary must contain at least one skill".to_string());
        }
        if self.experience_bonus_cap > 100 {
            return Err(format!(
                "experience bonus cap must be within 0..=100, got {}",
                self.experience_bonus_cap
            ));
        }
        if self.score_precision > MAX_SCORE_PRECISION {
            return Err(format!(
                "score precision must be at most {MAX_SCORE_PRECISION}, got {}",
                self.score_precision
            ));
        }
        let BandThresholds { strong, moderate } = self.bands;
        if !(0.0..=100.0).contains(&moderate) || !(0.0..=100.0).contains(&strong) || moderate > strong {
            return Err(format!(
                "band thresholds must satisfy 0 <= moderate <= strong <= 100, got moderate={moderate} strong={strong}"
            ));
        }
        Ok(())
    }
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_cap_is_fifteen() {
        assert_eq!(ScoringConfig::default().experience_bonus_cap, 15);
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let config = ScoringConfig {
            vocabulary: SkillVocabulary::new(Vec::<String>::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let config = ScoringConfig {
            bands: BandThresholds {
                strong: 50.0,
                moderate: 70.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_precision_limit() {
        let config = ScoringConfig {
            score_precision: 9,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(76.456, 2), 76.46);
        assert_eq!(round_to(0.0, 2), 0.0);
        assert_eq!(round_to(12.5, 0), 13.0);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = ScoringConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ScoringConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
