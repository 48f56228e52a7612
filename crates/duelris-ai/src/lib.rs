//! AI player for duelris.
//!
//! The AI works in three layers:
//!
//! 1. **Placement Evaluation** ([`placement_evaluator`]) - scores the board a
//!    single placement leaves behind, using [`board_analysis`] metrics.
//! 2. **Turn Evaluation** ([`turn_evaluator`]) - enumerates the resting
//!    positions of the falling block and picks the best, optionally looking
//!    one block ahead.
//! 3. **Control** ([`controller`]) - turns the chosen placement into engine
//!    [`Command`](duelris_engine::Command)s, one per think delay.
//!
//! [`Difficulty`] selects the think delay and whether lookahead is used.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use duelris_ai::{AiController, Difficulty};
//! use duelris_engine::{BlockSeed, GameEngine, GameMode, ManualClock};
//!
//! let clock = Rc::new(ManualClock::new());
//! let mut engine = GameEngine::new(GameMode::AiVsAi, BlockSeed::from_bytes([1; 16]), clock);
//! let mut controller = AiController::new(Difficulty::Hard);
//!
//! while engine.stats().completed_blocks() == 0 {
//!     let command = controller.next_command(&engine).unwrap();
//!     let accepted = engine.apply(command);
//!     controller.command_result(command, accepted);
//! }
//! ```

pub use self::{
    board_analysis::*, controller::*, difficulty::*, placement_analysis::*,
    placement_evaluator::*, turn_evaluator::*,
};

pub mod board_analysis;
pub mod controller;
pub mod difficulty;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod turn_evaluator;
