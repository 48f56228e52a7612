use super::board::Board;

/// Rows of garbage to push into a board from below.
///
/// Each entry is the gap column of one row, listed top to bottom. An empty
/// batch is valid and inserts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GarbageBatch {
    gaps: Vec<usize>,
}

impl GarbageBatch {
    /// # Panics
    ///
    /// Panics if any gap column lies outside the board.
    #[must_use]
    pub fn new(gaps: Vec<usize>) -> Self {
        assert!(
            gaps.iter().all(|&gap| gap < Board::WIDTH),
            "garbage gap column out of range: {gaps:?}"
        );
        Self { gaps }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    #[must_use]
    pub fn gaps(&self) -> &[usize] {
        &self.gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_accessors() {
        let batch = GarbageBatch::new(vec![0, 9]);
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.gaps(), &[0, 9]);
        assert!(GarbageBatch::default().is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_gap_outside_board_panics() {
        let _ = GarbageBatch::new(vec![Board::WIDTH]);
    }
}
