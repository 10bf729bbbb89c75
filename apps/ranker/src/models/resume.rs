#![allow(dead_code)]

use std::collections::BTreeSet;

use bytes::Bytes;

use crate::embedder::Embedding;
use crate::ranking::normalize::NormalizedText;

/// Where a resume's text comes from.
#[derive(Debug, Clone)]
pub enum ResumeSource {
    /// Raw text already extracted by the caller.
    Text(String),
    /// An uploaded document; goes through the text extractor first.
    Document(Bytes),
}

/// One resume handed to the pipeline. `identifier` is usually the upload's file name.
#[derive(Debug, Clone)]
pub struct ResumeInput {
    pub identifier: String,
    pub source: ResumeSource,
}

impl ResumeInput {
    pub fn text(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source: ResumeSource::Text(text.into()),
        }
    }

    pub fn document(identifier: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            identifier: identifier.into(),
            source: ResumeSource::Document(bytes.into()),
        }
    }
}

/// A scored resume. Filled stage by stage inside its own task; `missing_skills`
/// is filled by the ranking engine, after which the record is not touched again.
#[derive(Debug, Clone)]
pub struct ResumeRecord {
    pub identifier: String,
    pub raw_text: String,
    pub normalized_text: NormalizedText,
    pub embedding: Embedding,
    pub detected_skills: BTreeSet<String>,
    pub experience_years: u32,
    /// 0 – 100
    pub semantic_score: f64,
    /// 0 – 100, never below `semantic_score`
    pub final_score: f64,
    pub missing_skills: BTreeSet<String>,
}
