//! Core types for composite candidate scoring.
//!
//! `ScoreLayer` is the trait each factor of the composite score implements.
//! `ScoreEntry` records one weighted term; `CompositeScore` accumulates them
//! for a single candidate.

use crate::config::ScoreWeights;
use crate::coverage::SiteCoverage;
use crate::pipeline::analysis::CandidateSite;
use serde::{Deserialize, Serialize};

/// A weighted term pushed by a layer while scoring a candidate.
/// `score` is in people-equivalents, so terms are directly summable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

/// Everything a layer may look at when scoring one candidate.
pub struct CandidateContext<'a> {
    pub site: &'a CandidateSite,
    pub coverage: &'a SiteCoverage,
    /// Population of the covered points already served by a selected facility.
    pub overlap_population: u64,
    /// Risk of the settlement the candidate sits in.
    pub site_risk: f64,
    pub max_drive_time: f64,
    pub enable_redundancy: bool,
}

impl CandidateContext<'_> {
    /// Share of this candidate's covered population that is already served.
    pub fn overlap_fraction(&self) -> f64 {
        if self.coverage.total_population_covered > 0 {
            self.overlap_population as f64 / self.coverage.total_population_covered as f64
        } else {
            0.0
        }
    }
}

/// One factor of the composite score.
///
/// Layers are stateless; everything they need arrives in the context.
pub trait ScoreLayer {
    /// Human-readable name, also used as the `ScoreEntry` name.
    fn name(&self) -> &str;

    /// This layer's weight in the given weighting scheme.
    fn weight(&self, weights: &ScoreWeights) -> f64;

    /// The unweighted term for this candidate.
    fn score(&self, context: &CandidateContext) -> f64;
}

/// Accumulated weighted score of one candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub entries: Vec<ScoreEntry>,
    /// Multiplier from the capacity-utilization bonus (1.0 when outside the band).
    pub bonus: f64,
}

impl Default for CompositeScore {
    fn default() -> Self {
        CompositeScore {
            entries: Vec::new(),
            bonus: 1.0,
        }
    }
}

impl CompositeScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_score(&mut self, name: impl Into<String>, score: f64, weight: f64) {
        self.entries.push(ScoreEntry {
            name: name.into(),
            score,
            weight,
        });
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.score * e.weight).sum::<f64>() * self.bonus
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }
}

/// Run every layer over the context and collect their weighted terms.
pub fn score_candidate(
    layers: &[Box<dyn ScoreLayer>],
    weights: &ScoreWeights,
    context: &CandidateContext,
) -> CompositeScore {
    let mut composite = CompositeScore::new();
    for layer in layers {
        composite.push_score(layer.name(), layer.score(context), layer.weight(weights));
    }
    composite
}
