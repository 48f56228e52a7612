use std::{mem, rc::Rc, time::Duration};

use crate::{
    BlockCollisionError,
    core::{Block, Board, GarbageBatch},
};

use super::{
    Clock, Command, GameMode, GameStats, LineClear,
    block_bag::{BlockBag, BlockSeed},
    game_stats::{HARD_DROP_POINTS, SOFT_DROP_POINTS},
};

/// Cleared lines between two item blocks in [`GameMode::Item`].
const LINES_PER_ITEM: usize = 10;

/// Default length of the double-score effect granted by an item.
pub const DEFAULT_ITEM_EFFECT: Duration = Duration::from_secs(10);

/// Phase of the per-player state machine.
///
/// Only `Falling` and `GameOver` are visible between calls; the other phases
/// are passed through within a single lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    Spawning,
    Falling,
    Locking,
    LineClearing,
    GameOver,
}

/// Single-player simulation: board, falling block, scoring and effects.
///
/// Commands return `false` when rejected (collision, pause, game over) and
/// never fail otherwise. Locks are reported twice: as row indices through
/// [`consume_last_cleared_rows`](Self::consume_last_cleared_rows) for
/// presentation, and as [`LineClear`] events through
/// [`take_line_clears`](Self::take_line_clears) for the battle coordinator.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use duelris_engine::{BlockSeed, GameEngine, GameMode, ManualClock};
///
/// let clock = Rc::new(ManualClock::new());
/// let seed = BlockSeed::from_bytes([0; 16]);
/// let mut engine = GameEngine::new(GameMode::Normal, seed, clock);
///
/// engine.move_left();
/// assert!(engine.hard_drop());
/// assert_eq!(engine.stats().completed_blocks(), 1);
/// ```
#[derive(Debug)]
pub struct GameEngine {
    mode: GameMode,
    clock: Rc<dyn Clock>,
    seed: BlockSeed,
    bag: BlockBag,
    board: Board,
    current: Block,
    next: Block,
    state: EngineState,
    paused: bool,
    stats: GameStats,
    next_item_at: usize,
    item_effect: Duration,
    double_score_until: Option<Duration>,
    pending_cleared_rows: Vec<usize>,
    line_clears: Vec<LineClear>,
}

impl GameEngine {
    #[must_use]
    pub fn new(mode: GameMode, seed: BlockSeed, clock: Rc<dyn Clock>) -> Self {
        Self::with_board(mode, seed, clock, Board::EMPTY)
    }

    /// Like [`Self::new`], but starting from a prepared board.
    ///
    /// If the first block cannot spawn on `board` the engine starts in
    /// [`EngineState::GameOver`].
    #[must_use]
    pub fn with_board(mode: GameMode, seed: BlockSeed, clock: Rc<dyn Clock>, board: Board) -> Self {
        let mut bag = BlockBag::with_seed(seed);
        let current = Block::spawn(bag.pop_next());
        let next = Block::spawn(bag.pop_next());
        let mut this = Self {
            mode,
            clock,
            seed,
            bag,
            board,
            current,
            next,
            state: EngineState::Falling,
            paused: false,
            stats: GameStats::new(),
            next_item_at: LINES_PER_ITEM,
            item_effect: DEFAULT_ITEM_EFFECT,
            double_score_until: None,
            pending_cleared_rows: vec![],
            line_clears: vec![],
        };
        if !this.board.fits(&this.current) {
            this.enter_game_over();
        }
        this
    }

    /// Sets how long clearing an item row doubles the score.
    #[must_use]
    pub fn with_item_effect(mut self, duration: Duration) -> Self {
        self.item_effect = duration;
        self
    }

    #[must_use]
    pub fn game_mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_block(&self) -> &Block {
        &self.current
    }

    #[must_use]
    pub fn next_block(&self) -> &Block {
        &self.next
    }

    /// Replaces the falling block, e.g. to set up a position in tests or tools.
    pub fn set_current_block(&mut self, block: Block) -> Result<(), BlockCollisionError> {
        if !self.board.fits(&block) {
            return Err(BlockCollisionError);
        }
        self.current = block;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    fn accepts_input(&self) -> bool {
        !self.paused && !self.is_game_over()
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let moved = self.current.moved(dx, dy);
        if !self.board.fits(&moved) {
            return false;
        }
        self.current = moved;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Soft drop: one row down, scoring a point on success.
    pub fn move_down(&mut self) -> bool {
        if !self.try_move(0, 1) {
            return false;
        }
        let multiplier = self.multiplier();
        self.stats.add_drop_points(1, SOFT_DROP_POINTS, multiplier);
        true
    }

    pub fn rotate_block(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.current.rotated_with_kicks(&self.board) {
            Some(rotated) => {
                self.current = rotated;
                true
            }
            None => false,
        }
    }

    /// Drops the block to its resting row and locks it immediately.
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let dropped = self.current.dropped(&self.board);
        let cells = usize::try_from(dropped.y() - self.current.y()).unwrap_or(0);
        let multiplier = self.multiplier();
        self.stats.add_drop_points(cells, HARD_DROP_POINTS, multiplier);
        self.current = dropped;
        self.lock_current();
        true
    }

    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::MoveDown => self.move_down(),
            Command::Rotate => self.rotate_block(),
            Command::HardDrop => self.hard_drop(),
        }
    }

    /// Gravity step: moves the block down one row, or locks it if it rests.
    ///
    /// Gravity never scores. Returns `false` while paused or after game over.
    pub fn tick(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let moved = self.current.moved(0, 1);
        if self.board.fits(&moved) {
            self.current = moved;
        } else {
            self.lock_current();
        }
        true
    }

    fn lock_current(&mut self) {
        self.state = EngineState::Locking;
        let block = self.current;
        self.board.lock(&block, block.x(), block.y());

        self.state = EngineState::LineClearing;
        let full_rows: Vec<usize> = (0..Board::HEIGHT)
            .filter(|&y| self.board.row(y).is_filled())
            .collect();
        let item_cleared = full_rows.iter().any(|&y| self.board.row(y).contains_item());
        let gap_columns = full_rows
            .iter()
            .map(|&y| leftmost_column_in_row(&block, y))
            .collect();

        let rows = self.board.clear_full_rows();
        debug_assert_eq!(rows, full_rows);
        let multiplier = self.multiplier();
        self.stats.complete_block_drop(rows.len(), multiplier);

        if !rows.is_empty() {
            if item_cleared {
                tracing::debug!(duration = ?self.item_effect, "item cleared, double score active");
                self.activate_double_score(self.item_effect);
            }
            self.pending_cleared_rows.extend_from_slice(&rows);
            self.line_clears.push(LineClear { rows, gap_columns });
        }

        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        self.state = EngineState::Spawning;
        let kind = self.bag.pop_next();
        let mut drawn = Block::spawn(kind);
        if self.mode.has_items() && self.stats.total_cleared_lines() >= self.next_item_at {
            drawn = drawn.with_item_cell(self.bag.pick_item_cell());
            self.next_item_at =
                (self.stats.total_cleared_lines() / LINES_PER_ITEM + 1) * LINES_PER_ITEM;
        }
        self.current = mem::replace(&mut self.next, drawn);

        if self.board.fits(&self.current) {
            self.state = EngineState::Falling;
        } else {
            self.enter_game_over();
        }
    }

    fn enter_game_over(&mut self) {
        self.state = EngineState::GameOver;
        tracing::debug!(
            mode = %self.mode,
            score = self.stats.score(),
            lines = self.stats.total_cleared_lines(),
            "game over"
        );
    }

    /// Pushes garbage rows in from below.
    ///
    /// A falling block that now overlaps the stack is lifted by at most the
    /// batch height; if no such position fits the engine is over.
    pub fn receive_garbage(&mut self, batch: &GarbageBatch) {
        if self.is_game_over() || batch.is_empty() {
            return;
        }
        self.board.insert_garbage_rows(batch);
        if self.board.fits(&self.current) {
            return;
        }
        let lifted = (1..=batch.len())
            .filter_map(|dy| i32::try_from(dy).ok())
            .map(|dy| self.current.moved(0, -dy))
            .find(|block| self.board.fits(block));
        match lifted {
            Some(block) => self.current = block,
            None => self.enter_game_over(),
        }
    }

    /// Returns and forgets the rows cleared since the previous call.
    pub fn consume_last_cleared_rows(&mut self) -> Vec<usize> {
        mem::take(&mut self.pending_cleared_rows)
    }

    /// Drains the line clears not yet seen by the coordinator.
    pub fn take_line_clears(&mut self) -> Vec<LineClear> {
        mem::take(&mut self.line_clears)
    }

    /// Doubles line-clear and drop points until `duration` from now.
    ///
    /// A second activation replaces the first expiry rather than extending it.
    pub fn activate_double_score(&mut self, duration: Duration) {
        self.double_score_until = Some(self.clock.now() + duration);
    }

    #[must_use]
    pub fn is_double_score_active(&self) -> bool {
        self.double_score_until
            .is_some_and(|until| self.clock.now() < until)
    }

    #[must_use]
    pub fn double_score_remaining_millis(&self) -> u64 {
        self.double_score_until.map_or(0, |until| {
            let remaining = until.saturating_sub(self.clock.now());
            u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)
        })
    }

    fn multiplier(&self) -> usize {
        if self.is_double_score_active() { 2 } else { 1 }
    }

    /// Restarts with an empty board and the original block sequence.
    ///
    /// This is the only operation honoured after game over.
    pub fn reset(&mut self) {
        let clock = Rc::clone(&self.clock);
        let item_effect = self.item_effect;
        *self = Self::new(self.mode, self.seed, clock).with_item_effect(item_effect);
    }
}

fn leftmost_column_in_row(block: &Block, row: usize) -> usize {
    block
        .board_cells()
        .filter(|&(_, y)| usize::try_from(y).is_ok_and(|y| y == row))
        .filter_map(|(x, _)| usize::try_from(x).ok())
        .min()
        .unwrap_or(0)
}
