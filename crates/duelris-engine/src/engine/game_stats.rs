/// Points for clearing 0 to 4 rows at once.
///
/// Clears of more than four rows (impossible with tetrominoes) use the last entry.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Points per cell for a soft drop step.
pub const SOFT_DROP_POINTS: usize = 1;

/// Points per cell travelled by a hard drop.
pub const HARD_DROP_POINTS: usize = 2;

/// Score and line counters of one engine.
///
/// # Example
///
/// ```
/// use duelris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_block_drop(4, 1);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_blocks: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_blocks: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Number of blocks locked so far.
    #[must_use]
    pub const fn completed_blocks(&self) -> usize {
        self.completed_blocks
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by rows cleared: `[0]` counts locks that cleared nothing.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a lock that cleared `cleared_lines` rows, scoring them at `multiplier`.
    pub fn complete_block_drop(&mut self, cleared_lines: usize, multiplier: usize) {
        let bucket = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_blocks += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[bucket] += 1;
        self.score += SCORE_TABLE[bucket] * multiplier;
    }

    /// Awards drop points for `cells` cells at `points_per_cell`.
    pub fn add_drop_points(&mut self, cells: usize, points_per_cell: usize, multiplier: usize) {
        self.score += cells * points_per_cell * multiplier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_scores() {
        let mut stats = GameStats::new();
        for lines in 0..=4 {
            stats.complete_block_drop(lines, 1);
        }
        assert_eq!(stats.score(), 1700);
        assert_eq!(stats.completed_blocks(), 5);
        assert_eq!(stats.total_cleared_lines(), 10);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_multiplier_doubles_points() {
        let mut stats = GameStats::new();
        stats.complete_block_drop(2, 2);
        stats.add_drop_points(3, HARD_DROP_POINTS, 2);
        assert_eq!(stats.score(), 600 + 12);
    }

    #[test]
    fn test_oversized_clear_uses_last_entry() {
        let mut stats = GameStats::new();
        stats.complete_block_drop(6, 1);
        assert_eq!(stats.score(), 800);
        assert_eq!(stats.line_cleared_counter()[4], 1);
        assert_eq!(stats.total_cleared_lines(), 6);
    }
}
