//! Core identity types shared across the pipeline.
//!
//! The pipeline refers to game objects (players, units, cards, zones,
//! board cells) by identity only. Ownership of the actual models stays
//! with the game layer.

pub mod id;

pub use id::{CardId, CellId, PlayerId, UnitId, ZoneId};
