//! Core data models for the tournament engine.

mod format;
mod ids;
mod match_record;
mod player;
mod summary;

pub use format::*;
pub use ids::*;
pub use match_record::*;
pub use player::*;
pub use summary::*;
