/// Rows removed by a single lock, reported to the battle coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// Cleared row indices, top to bottom, numbered before the collapse.
    pub rows: Vec<usize>,
    /// For each entry of `rows`, the leftmost column the locked block filled.
    pub gap_columns: Vec<usize>,
}

impl LineClear {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
