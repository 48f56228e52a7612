//! Selecting the placement for the falling block.
//!
//! Candidates are every resting position reachable by rotating in place and
//! dropping straight down: for each distinct rotation state and each column
//! where the rotated block fits at its current row, the block is dropped
//! until it rests. Each candidate is scored by a [`PlacementEvaluator`].
//!
//! With lookahead enabled, a candidate also gains half of the best score the
//! next block can reach on the board it leaves behind, or a fixed penalty if
//! the next block has nowhere to go.
//!
//! Ties prefer fewer clockwise rotations, then the leftmost column.

use std::cmp::Ordering;

use duelris_engine::{Block, Board, Rotation};

use crate::{
    HeuristicEvaluator, difficulty::Difficulty, placement_analysis::PlacementAnalysis,
    placement_evaluator::PlacementEvaluator,
};

/// Weight of the next block's best score in the lookahead.
pub const LOOKAHEAD_FACTOR: f32 = 0.5;

/// Lookahead term for a placement that leaves the next block no position.
pub const NO_FOLLOW_UP_PENALTY: f32 = -1000.0;

/// The chosen target for the falling block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnPlan {
    placement: Block,
    rotations: u8,
    score: f32,
}

impl TurnPlan {
    /// Final resting position and rotation.
    #[must_use]
    pub fn placement(&self) -> Block {
        self.placement
    }

    /// Clockwise rotations needed from the block's rotation when planned.
    #[must_use]
    pub fn rotations(&self) -> u8 {
        self.rotations
    }

    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    fn is_better_than(&self, other: &Self) -> bool {
        match self.score.total_cmp(&other.score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => {
                (self.rotations, self.placement.x()) < (other.rotations, other.placement.x())
            }
        }
    }
}

#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
}

impl Default for TurnEvaluator<'_> {
    fn default() -> Self {
        Self::new(Box::new(HeuristicEvaluator::default()))
    }
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Picks the best placement for `current`, or `None` if it has none.
    ///
    /// `next` is only consulted when `difficulty` uses lookahead.
    #[must_use]
    pub fn select_best_turn(
        &self,
        board: &Board,
        current: &Block,
        next: &Block,
        difficulty: Difficulty,
    ) -> Option<TurnPlan> {
        let mut best: Option<TurnPlan> = None;

        for placement in available_placements(board, current) {
            let analysis = PlacementAnalysis::from_board(board, placement);
            let mut score = self.placement_evaluator.evaluate_placement(&analysis);
            if difficulty.uses_lookahead() {
                score += self
                    .best_score(analysis.board(), next)
                    .map_or(NO_FOLLOW_UP_PENALTY, |s| LOOKAHEAD_FACTOR * s);
            }

            let candidate = TurnPlan {
                placement,
                rotations: current.rotation().steps_to(placement.rotation()),
                score,
            };
            if best.is_none_or(|best| candidate.is_better_than(&best)) {
                best = Some(candidate);
            }
        }

        best
    }

    fn best_score(&self, board: &Board, block: &Block) -> Option<f32> {
        available_placements(board, block)
            .map(|placement| {
                let analysis = PlacementAnalysis::from_board(board, placement);
                self.placement_evaluator.evaluate_placement(&analysis)
            })
            .max_by(f32::total_cmp)
    }
}

/// Every resting position of `block` reachable by rotating in place and dropping.
///
/// Rotation states with identical shapes are visited once, using the state
/// that needs the fewest clockwise turns from the block's own rotation.
pub fn available_placements<'a>(
    board: &'a Board,
    block: &Block,
) -> impl Iterator<Item = Block> + use<'a> {
    let kind = block.kind();
    let y = block.y();
    let current = block.rotation();

    kind.distinct_rotations()
        .into_iter()
        .map(move |shape| {
            let reference = Block::at(kind, shape, 0, 0);
            Rotation::ALL
                .into_iter()
                .filter(|r| Block::at(kind, *r, 0, 0).has_same_shape(&reference))
                .min_by_key(|r| current.steps_to(*r))
                .unwrap_or(shape)
        })
        .flat_map(move |rotation| {
            let width = Block::at(kind, rotation, 0, y).width();
            (0..=Board::WIDTH - width).filter_map(move |x| {
                let candidate = Block::at(kind, rotation, i32::try_from(x).ok()?, y);
                board.fits(&candidate).then(|| candidate.dropped(board))
            })
        })
}

#[cfg(test)]
mod tests {
    use duelris_engine::BlockKind;

    use super::*;

    fn spawn(kind: BlockKind) -> Block {
        Block::spawn(kind)
    }

    #[test]
    fn test_available_placement_counts() {
        // Distinct rotations × columns that fit the width.
        let cases = [
            (BlockKind::O, 9),
            (BlockKind::I, 7 + 10),
            (BlockKind::T, 8 + 9 + 8 + 9),
            (BlockKind::S, 8 + 9),
        ];
        for (kind, expected) in cases {
            let count = available_placements(&Board::EMPTY, &spawn(kind)).count();
            assert_eq!(count, expected, "{kind:?}");
        }
    }

    #[test]
    fn test_placements_rest_on_stack() {
        let board = Board::from_ascii("##########\n##########");
        for placement in available_placements(&board, &spawn(BlockKind::O)) {
            assert_eq!(placement.y(), 16);
        }
    }

    #[test]
    fn test_prefers_completing_a_line() {
        let board = Board::from_ascii(
            "
            #########.
            #########.
            #########.
            #########.
            ",
        );
        let evaluator = TurnEvaluator::default();
        let plan = evaluator
            .select_best_turn(
                &board,
                &spawn(BlockKind::I),
                &spawn(BlockKind::O),
                Difficulty::Normal,
            )
            .unwrap();
        assert_eq!(plan.placement().x(), 9);
        assert_eq!(plan.placement().width(), 1);
        assert_eq!(plan.rotations(), 1);
    }

    #[test]
    fn test_tie_prefers_fewer_rotations_then_left() {
        // Both edge columns score the same on an empty board; the leftmost wins.
        let evaluator = TurnEvaluator::default();
        let plan = evaluator
            .select_best_turn(
                &Board::EMPTY,
                &spawn(BlockKind::O),
                &spawn(BlockKind::O),
                Difficulty::Normal,
            )
            .unwrap();
        assert_eq!(plan.rotations(), 0);
        assert_eq!(plan.placement().x(), 0);
    }

    #[test]
    fn test_rotation_representative_is_nearest() {
        // A vertical I (rotation 3) only needs one turn to be horizontal again.
        let block = Block::at(BlockKind::I, Rotation::ALL[3], 4, 0);
        let rotations: Vec<_> = available_placements(&Board::EMPTY, &block)
            .map(|p| block.rotation().steps_to(p.rotation()))
            .collect();
        assert!(rotations.iter().all(|&r| r <= 1));
        assert!(rotations.contains(&0));
        assert!(rotations.contains(&1));
    }

    #[test]
    fn test_no_placement_when_row_blocked() {
        let art = "##########\n".repeat(Board::HEIGHT);
        let board = Board::from_ascii(&art);
        let evaluator = TurnEvaluator::default();
        let plan = evaluator.select_best_turn(
            &board,
            &spawn(BlockKind::T),
            &spawn(BlockKind::T),
            Difficulty::Hard,
        );
        assert!(plan.is_none());
    }

    /// Rewards multi-line clears and nothing else.
    #[derive(Debug)]
    struct ClearedLinesSquared;

    impl PlacementEvaluator for ClearedLinesSquared {
        #[expect(clippy::cast_precision_loss)]
        fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
            let lines = analysis.cleared_lines() as f32;
            lines * lines
        }
    }

    #[test]
    fn test_lookahead_changes_choice() {
        // No O placement clears a line, but filling the notch lets the next I
        // clear four rows at once.
        let board = Board::from_ascii(
            "
            ####..###.
            ####..###.
            #########.
            #########.
            ",
        );
        let evaluator = TurnEvaluator::new(Box::new(ClearedLinesSquared));
        let current = spawn(BlockKind::O);
        let next = spawn(BlockKind::I);

        let normal = evaluator
            .select_best_turn(&board, &current, &next, Difficulty::Normal)
            .unwrap();
        assert_eq!(normal.placement().x(), 0);
        assert!(normal.score().abs() < 1e-3);

        let hard = evaluator
            .select_best_turn(&board, &current, &next, Difficulty::Hard)
            .unwrap();
        assert_eq!(hard.placement().x(), 4);
        assert_eq!(hard.placement().y(), 16);
        assert!((hard.score() - LOOKAHEAD_FACTOR * 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_lookahead_penalizes_dead_ends() {
        // Only the top row is free, so the next O never fits.
        let art = "##########\n".repeat(Board::HEIGHT - 1);
        let board = Board::from_ascii(&art);
        let evaluator = TurnEvaluator::default();
        let normal = evaluator
            .select_best_turn(
                &board,
                &spawn(BlockKind::I),
                &spawn(BlockKind::O),
                Difficulty::Normal,
            )
            .unwrap();
        let hard = evaluator
            .select_best_turn(
                &board,
                &spawn(BlockKind::I),
                &spawn(BlockKind::O),
                Difficulty::Hard,
            )
            .unwrap();
        assert_eq!(hard.placement(), normal.placement());
        assert_eq!(normal.placement().x(), 0);
        assert!((hard.score() - (normal.score() + NO_FOLLOW_UP_PENALTY)).abs() < 1e-3);
    }
}
