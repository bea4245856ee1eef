//! Core data models for Swiss pairing.

mod ids;
mod match_record;
mod pairing;
mod player;
mod tournament;

pub use ids::*;
pub use match_record::*;
pub use pairing::*;
pub use player::*;
pub use tournament::*;
