//! Board and block primitives shared by the engine and the AI.

pub use self::{block::*, board::*, garbage::*};

mod block;
mod board;
mod garbage;
