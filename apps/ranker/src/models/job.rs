use std::collections::BTreeSet;

use crate::embedder::Embedding;
use crate::ranking::normalize::NormalizedText;

/// The job description every resume of a run is scored against.
/// Built once per run and never changed afterwards.
#[derive(Debug, Clone)]
pub struct JobDescriptionRecord {
    pub normalized_text: NormalizedText,
    pub embedding: Embedding,
    pub required_skills: BTreeSet<String>,
}
