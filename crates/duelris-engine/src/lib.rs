pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("block colliding when setting falling block")]
pub struct BlockCollisionError;
