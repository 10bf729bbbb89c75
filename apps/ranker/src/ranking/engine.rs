//! Ranking engine — gap computation, ordering, and qualitative bands.
//!
//! Ordering is by final score, highest first. Equal scores keep the order in
//! which the resumes were supplied (stable sort), so a run is reproducible.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::job::JobDescriptionRecord;
use crate::models::resume::ResumeRecord;
use crate::ranking::settings::BandThresholds;

/// Qualitative label shown next to a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchBand {
    #[serde(rename = "strong match")]
    Strong,
    #[serde(rename = "moderate match")]
    Moderate,
    #[serde(rename = "low match")]
    Low,
}

impl MatchBand {
    /// Lower bounds are inclusive: with the default thresholds 80.0 is strong
    /// and 60.0 is moderate.
    pub fn for_score(final_score: f64, thresholds: &BandThresholds) -> Self {
        if final_score >= thresholds.strong {
            MatchBand::Strong
        } else if final_score >= thresholds.moderate {
            MatchBand::Moderate
        } else {
            MatchBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchBand::Strong => "strong match",
            MatchBand::Moderate => "moderate match",
            MatchBand::Low => "low match",
        }
    }
}

impl fmt::Display for MatchBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fills `missing_skills` (required − detected) on every resume and returns them
/// sorted by final score, descending, ties in input order.
pub fn rank(mut resumes: Vec<ResumeRecord>, job: &JobDescriptionRecord) -> Vec<ResumeRecord> {
    for resume in &mut resumes {
        resume.missing_skills = job
            .required_skills
            .difference(&resume.detected_skills)
            .cloned()
            .collect();
    }

    resumes.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    resumes
}
