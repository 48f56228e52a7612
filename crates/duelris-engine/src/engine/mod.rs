//! Per-player game logic built on the [`core`](crate::core) primitives.
//!
//! - [`GameEngine`] - state machine for one player (spawn, fall, lock, clear)
//! - [`GameStats`] - score and line counters
//! - [`BlockBag`] / [`BlockSeed`] - seeded 7-bag block generation
//! - [`Clock`] - injected time source for effects and battle timers
//! - [`Command`] - discrete inputs shared by humans and the AI
//!
//! # Game Flow
//!
//! 1. Create a [`GameEngine`] for a [`GameMode`] with a seed and a clock
//! 2. Feed it [`Command`]s and gravity [`tick`](GameEngine::tick)s
//! 3. Each lock clears full rows, scores them and spawns the next block
//! 4. Drain [`LineClear`] events to forward attacks to the opponent
//! 5. Repeat until a block cannot spawn (game over)

pub use self::{
    block_bag::*, clock::*, command::*, game_engine::*, game_mode::*, game_stats::*,
    line_clear::*,
};

mod block_bag;
mod clock;
mod command;
mod game_engine;
mod game_mode;
mod game_stats;
mod line_clear;
