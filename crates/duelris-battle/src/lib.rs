//! Two-player battles between duelris engines.
//!
//! - [`BattleCoordinator`] - owns both engines and AI seats, fires timers,
//!   forwards attacks and decides the winner
//! - [`BattleConfig`] - mode, AI difficulty, seed and timings of a battle
//! - [`IntervalTimer`] - clock-driven repeating deadline
//! - [`attack_for`] - garbage sent for a line clear

pub use self::{attack::*, config::*, coordinator::*, player::*, timer::*};

mod attack;
mod config;
mod coordinator;
mod player;
mod timer;
