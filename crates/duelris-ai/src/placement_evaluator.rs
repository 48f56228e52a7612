//! Scoring of single placements.
//!
//! The [`HeuristicEvaluator`] is a linear combination of four board metrics
//! taken after the placement:
//!
//! ```text
//! score = -0.510066 · aggregate_height
//!         -0.35663  · holes
//!         -0.184483 · bumpiness
//!         +0.760666 · cleared_lines
//! ```
//!
//! Higher is better. These default weights reward clearing lines and
//! penalize tall, holey and jagged stacks. A battle config may override them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::placement_analysis::PlacementAnalysis;

/// Assigns a score to a placement (higher is better).
pub trait PlacementEvaluator: fmt::Debug {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

/// Weights of the four metrics used by [`HeuristicEvaluator`].
///
/// Missing fields keep their default weight when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicWeights {
    pub aggregate_height: f32,
    pub holes: f32,
    pub bumpiness: f32,
    pub cleared_lines: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            aggregate_height: -0.510_066,
            holes: -0.356_63,
            bumpiness: -0.184_483,
            cleared_lines: 0.760_666,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }
}

impl PlacementEvaluator for HeuristicEvaluator {
    #[inline]
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        let board = analysis.board_analysis();
        let w = &self.weights;
        w.aggregate_height * board.total_height() as f32
            + w.holes * board.num_holes() as f32
            + w.bumpiness * board.surface_bumpiness() as f32
            + w.cleared_lines * analysis.cleared_lines() as f32
    }
}
