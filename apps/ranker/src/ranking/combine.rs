use crate::ranking::settings::{round_to, ScoringConfig};

/// Experience bonus: `years × per_year`, capped at the configured ceiling.
pub fn experience_bonus(experience_years: u32, config: &ScoringConfig) -> u32 {
    experience_years
        .saturating_mul(config.experience_bonus_per_year)
        .min(config.experience_bonus_cap)
}

/// Final score = min(semantic + bonus, 100), rounded to the configured precision.
///
/// The bonus is never negative, so the result is never below `semantic_score`
/// (for a semantic score already inside 0–100).
pub fn combine(semantic_score: f64, experience_years: u32, config: &ScoringConfig) -> f64 {
    let bonus = experience_bonus(experience_years, config) as f64;
    let semantic = semantic_score.clamp(0.0, 100.0);
    round_to((semantic + bonus).min(100.0), config.score_precision)
}
