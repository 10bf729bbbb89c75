use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ranking::engine::MatchBand;

/// One scored resume as presented to callers, in rank order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResume {
    /// 1-based position.
    pub rank: usize,
    pub identifier: String,
    pub semantic_score: f64,
    pub final_score: f64,
    pub experience_years: u32,
    pub detected_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub band: MatchBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscoredReason {
    DocumentParse,
    Timeout,
    /// The scoring task itself failed.
    Internal,
}

/// A resume that could not be scored. Listed separately so it is never
/// confused with a low score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnscoredResume {
    pub identifier: String,
    pub reason: UnscoredReason,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub required_skills: BTreeSet<String>,
    pub word_count: usize,
}

/// One bar of the final-score comparison chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBar {
    pub identifier: String,
    pub final_score: f64,
}

/// Everything a ranking run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub run_id: Uuid,
    pub ranked_at: DateTime<Utc>,
    pub job: JobSummary,
    pub ranked: Vec<RankedResume>,
    pub unscored: Vec<UnscoredResume>,
    /// Final scores in rank order, for the horizontal bar chart.
    pub chart: Vec<ChartBar>,
}
