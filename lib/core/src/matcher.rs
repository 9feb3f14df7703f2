//! Match aggregation
//!
//! Drives the similarity engine over every (input, owner, file) triple,
//! assembles per-input results under a [`MatchPolicy`], then applies the
//! degenerate-score scan, the threshold filter and the emptiness check.

use crate::config::{ConfigEcho, MatchConfig, MatchPolicy};
use crate::similarity::Score;
use crate::{Error, InputBatch, ReferenceCatalog, Result, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Scores of one owner, keyed by file name
pub type FileScores = BTreeMap<String, f32>;

/// Per-input result: owner → file → score
pub type MatchResult = BTreeMap<String, FileScores>;

/// Successful output of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutput {
    /// One result per input vector, in input order
    pub payload: Vec<MatchResult>,
    #[serde(rename = "cosineConfig")]
    pub config: ConfigEcho,
}

#[derive(Debug, Clone)]
struct Location {
    input: usize,
    owner: String,
    file: String,
}

/// First occurrence of each degenerate score across a batch
#[derive(Debug, Default)]
struct DegenerateScan {
    zero_length: Option<Location>,
    not_a_number: Option<Location>,
}

impl DegenerateScan {
    fn record(&mut self, score: Score, input: usize, owner: &str, file: &str) {
        if !score.is_degenerate() {
            return;
        }
        let slot = match score {
            Score::VectorLengthZero => &mut self.zero_length,
            _ => &mut self.not_a_number,
        };
        if slot.is_none() {
            *slot = Some(Location {
                input,
                owner: owner.to_string(),
                file: file.to_string(),
            });
        }
    }

    /// Zero-length vectors take precedence over NaN results
    fn into_result(self) -> Result<()> {
        if let Some(Location { input, owner, file }) = self.zero_length {
            return Err(Error::DegenerateVector { input, owner, file });
        }
        if let Some(Location { input, owner, file }) = self.not_a_number {
            return Err(Error::NonNumericSimilarity { input, owner, file });
        }
        Ok(())
    }
}

fn best_match(
    index: usize,
    input: &Vector,
    catalog: &ReferenceCatalog,
    scan: &mut DegenerateScan,
) -> Result<MatchResult> {
    let mut best: Option<(&str, &str, f32)> = None;

    for (owner, file, reference) in catalog.entries() {
        let score = input.cosine_similarity(reference)?;
        match score {
            // Strict comparison keeps the first of equal scores
            Score::Similarity(s) if best.map_or(true, |(_, _, top)| s > top) => {
                best = Some((owner, file, s));
            }
            Score::Similarity(_) => {}
            degenerate => scan.record(degenerate, index, owner, file),
        }
    }

    let mut result = MatchResult::new();
    if let Some((owner, file, score)) = best {
        result
            .entry(owner.to_string())
            .or_default()
            .insert(file.to_string(), score);
    }
    Ok(result)
}

fn all_matches(
    index: usize,
    input: &Vector,
    catalog: &ReferenceCatalog,
    scan: &mut DegenerateScan,
) -> Result<MatchResult> {
    let mut result = MatchResult::new();

    for (owner, files) in catalog.owners() {
        let mut scores = FileScores::new();
        for (file, reference) in files {
            match input.cosine_similarity(reference)? {
                Score::Similarity(s) => {
                    scores.insert(file.clone(), s);
                }
                degenerate => scan.record(degenerate, index, owner, file),
            }
        }
        result.insert(owner.to_string(), scores);
    }

    Ok(result)
}

/// Score every input against the catalog, without threshold filtering.
///
/// # Errors
/// - [`Error::VectorLengthMismatch`] as soon as a pair differs in length
/// - [`Error::DegenerateVector`] if any pair involved a zero-magnitude vector
/// - [`Error::NonNumericSimilarity`] if any pair produced NaN
///
/// The degenerate checks run after every comparison has completed; no
/// partial result is returned.
pub fn score_batch(
    inputs: &InputBatch,
    catalog: &ReferenceCatalog,
    policy: MatchPolicy,
) -> Result<Vec<MatchResult>> {
    let mut scan = DegenerateScan::default();

    let results = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| match policy {
            MatchPolicy::Best => best_match(index, input, catalog, &mut scan),
            MatchPolicy::All => all_matches(index, input, catalog, &mut scan),
        })
        .collect::<Result<Vec<_>>>()?;

    scan.into_result()?;
    Ok(results)
}

/// Drop entries scoring below `threshold` and owners left without files
pub fn filter_by_threshold(results: Vec<MatchResult>, threshold: f32) -> Vec<MatchResult> {
    results
        .into_iter()
        .map(|mut result| {
            result.retain(|_, files| {
                files.retain(|_, score| *score >= threshold);
                !files.is_empty()
            });
            result
        })
        .collect()
}

/// Score, filter and check for emptiness.
pub fn match_batch(
    inputs: &InputBatch,
    catalog: &ReferenceCatalog,
    threshold: f32,
    policy: MatchPolicy,
) -> Result<Vec<MatchResult>> {
    let scored = score_batch(inputs, catalog, policy)?;
    let filtered = filter_by_threshold(scored, threshold);

    if filtered.iter().all(BTreeMap::is_empty) {
        return Err(Error::NoResultsAboveThreshold { threshold });
    }

    debug!(
        inputs = inputs.len(),
        references = catalog.len(),
        matched = filtered.iter().filter(|r| !r.is_empty()).count(),
        %policy,
        threshold,
        "batch matched"
    );

    Ok(filtered)
}

/// Run a full match with a resolved configuration and echo it back.
pub fn run(
    inputs: &InputBatch,
    catalog: &ReferenceCatalog,
    config: &MatchConfig,
) -> Result<MatchOutput> {
    config.validate()?;
    let payload = match_batch(inputs, catalog, config.threshold, config.policy)?;
    Ok(MatchOutput {
        payload,
        config: config.echo(),
    })
}
