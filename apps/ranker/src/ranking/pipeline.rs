//! Ranking pipeline — (resumes, job description) → `RankingOutcome`.
//!
//! The job description is normalized and embedded once. Each resume then runs in its
//! own task (extract → normalize → skills/experience → embed → score → combine) under
//! a timeout, and the ranking engine orders whatever succeeded.
//!
//! Failure policy:
//! - unreadable document or timeout → that resume is listed as unscored
//! - embedder failure anywhere → the whole run fails
//! - empty job description or no resumes → rejected before any work
//!
//! Resume tasks live in a `JoinSet`, so dropping the `run` future (client gone)
//! aborts them. A PDF extraction already running on the blocking pool cannot be
//! aborted and runs to completion; its result is discarded.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::documents::{extract_text, DocumentParseError};
use crate::embedder::{embed_one, Embedder};
use crate::errors::PipelineError;
use crate::models::job::JobDescriptionRecord;
use crate::models::outcome::{
    ChartBar, JobSummary, RankedResume, RankingOutcome, UnscoredReason, UnscoredResume,
};
use crate::models::resume::{ResumeInput, ResumeRecord, ResumeSource};
use crate::ranking::combine::combine;
use crate::ranking::engine::{rank, MatchBand};
use crate::ranking::experience::extract_experience;
use crate::ranking::normalize::normalize;
use crate::ranking::semantic::semantic_score;
use crate::ranking::settings::ScoringConfig;
use crate::ranking::skills::extract_skills;

/// Runs a full ranking of `inputs` against `job_description`.
pub async fn run(
    inputs: Vec<ResumeInput>,
    job_description: &str,
    embedder: Arc<dyn Embedder>,
    config: Arc<ScoringConfig>,
    resume_timeout: Duration,
) -> Result<RankingOutcome, PipelineError> {
    if inputs.is_empty() {
        return Err(PipelineError::InvalidInput(
            "at least one resume is required".to_string(),
        ));
    }

    let run_id = Uuid::new_v4();
    info!("Ranking run {run_id}: {} resume(s)", inputs.len());

    let job = Arc::new(build_job_description(job_description, embedder.as_ref(), &config).await?);

    let identifiers: Vec<String> = inputs.iter().map(|i| i.identifier.clone()).collect();
    let mut tasks = JoinSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let embedder = embedder.clone();
        let job = job.clone();
        let config = config.clone();
        tasks.spawn(async move {
            let identifier = input.identifier.clone();
            let result =
                tokio::time::timeout(resume_timeout, score_resume(input, embedder, job, config))
                    .await
                    .unwrap_or_else(|_| {
                        Err(PipelineError::Timeout {
                            identifier,
                            limit: resume_timeout,
                        })
                    });
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<ResumeRecord, PipelineError>>> =
        identifiers.iter().map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Err(e @ PipelineError::EmbeddingUnavailable(_))))
            | Ok((_, Err(e @ PipelineError::InvalidInput(_)))) => {
                // returning drops the set, which aborts the tasks still running
                error!("Ranking run {run_id} aborted: {e}");
                return Err(e);
            }
            Ok((index, result)) => results[index] = Some(result),
            // the slot stays empty and is reported below
            Err(e) => error!("Scoring task in run {run_id} failed: {e}"),
        }
    }

    // Walking the slots in submission order keeps upload order for the stable sort.
    let mut scored = Vec::with_capacity(results.len());
    let mut unscored = Vec::new();

    for (identifier, result) in identifiers.into_iter().zip(results) {
        match result {
            Some(Ok(record)) => scored.push(record),
            Some(Err(e @ PipelineError::Timeout { .. })) => {
                warn!("Resume '{identifier}' not scored: {e}");
                unscored.push(UnscoredResume {
                    identifier,
                    reason: UnscoredReason::Timeout,
                    message: e.to_string(),
                });
            }
            Some(Err(e)) => {
                warn!("Resume '{identifier}' not scored: {e}");
                unscored.push(UnscoredResume {
                    identifier,
                    reason: UnscoredReason::DocumentParse,
                    message: e.to_string(),
                });
            }
            None => unscored.push(UnscoredResume {
                identifier,
                reason: UnscoredReason::Internal,
                message: "processing task failed".to_string(),
            }),
        }
    }

    let ranked = rank(scored, &job);

    info!(
        "Ranking run {run_id} finished: {} ranked, {} unscored",
        ranked.len(),
        unscored.len()
    );

    Ok(build_outcome(run_id, &job, ranked, unscored, &config))
}

/// Normalizes, extracts required skills from, and embeds the job description.
pub async fn build_job_description(
    text: &str,
    embedder: &dyn Embedder,
    config: &ScoringConfig,
) -> Result<JobDescriptionRecord, PipelineError> {
    if text.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "job description cannot be empty".to_string(),
        ));
    }

    let normalized_text = normalize(text);
    if normalized_text.as_str().trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "job description contains no letters or digits".to_string(),
        ));
    }

    let required_skills = extract_skills(&normalized_text, &config.vocabulary, config.skill_match);
    let embedding = embed_one(embedder, normalized_text.as_str()).await?;

    debug!(
        "Job description: {} required skill(s), {}-dim embedding",
        required_skills.len(),
        embedding.len()
    );

    Ok(JobDescriptionRecord {
        normalized_text,
        embedding,
        required_skills,
    })
}

/// Scores one resume. Everything except the embedding call is local and cheap;
/// document extraction runs on the blocking pool.
async fn score_resume(
    input: ResumeInput,
    embedder: Arc<dyn Embedder>,
    job: Arc<JobDescriptionRecord>,
    config: Arc<ScoringConfig>,
) -> Result<ResumeRecord, PipelineError> {
    let ResumeInput { identifier, source } = input;

    let raw_text = match source {
        ResumeSource::Text(text) => text,
        ResumeSource::Document(bytes) => {
            let id = identifier.clone();
            tokio::task::spawn_blocking(move || extract_text(&id, &bytes))
                .await
                .map_err(|e| {
                    DocumentParseError::new(&identifier, format!("text extractor crashed: {e}"))
                })??
        }
    };

    let normalized_text = normalize(&raw_text);
    let detected_skills = extract_skills(&normalized_text, &config.vocabulary, config.skill_match);
    let experience_years = extract_experience(&normalized_text);

    // Remote endpoints reject empty input. No text means no embedding, and the
    // empty vector scores 0 against any job description.
    let embedding = if normalized_text.as_str().trim().is_empty() {
        debug!("Resume '{identifier}' has no text; skipping embedding");
        Vec::new()
    } else {
        embed_one(embedder.as_ref(), normalized_text.as_str()).await?
    };
    let semantic = semantic_score(&embedding, &job.embedding, config.score_precision);
    let final_score = combine(semantic, experience_years, &config);

    debug!(
        "Scored '{identifier}': semantic={semantic} experience={experience_years}y final={final_score}"
    );

    Ok(ResumeRecord {
        identifier,
        raw_text,
        normalized_text,
        embedding,
        detected_skills,
        experience_years,
        semantic_score: semantic,
        final_score,
        missing_skills: BTreeSet::new(),
    })
}

fn build_outcome(
    run_id: Uuid,
    job: &JobDescriptionRecord,
    ranked: Vec<ResumeRecord>,
    unscored: Vec<UnscoredResume>,
    config: &ScoringConfig,
) -> RankingOutcome {
    let chart = ranked
        .iter()
        .map(|r| ChartBar {
            identifier: r.identifier.clone(),
            final_score: r.final_score,
        })
        .collect();

    let ranked = ranked
        .into_iter()
        .enumerate()
        .map(|(i, r)| RankedResume {
            rank: i + 1,
            band: MatchBand::for_score(r.final_score, &config.bands),
            identifier: r.identifier,
            semantic_score: r.semantic_score,
            final_score: r.final_score,
            experience_years: r.experience_years,
            detected_skills: r.detected_skills,
            missing_skills: r.missing_skills,
        })
        .collect();

    RankingOutcome {
        run_id,
        ranked_at: Utc::now(),
        job: JobSummary {
            required_skills: job.required_skills.clone(),
            word_count: job.normalized_text.as_str().split_whitespace().count(),
        },
        ranked,
        unscored,
        chart,
    }
}
