//! Dungeon Combat - deterministic turn-based encounter engine

pub mod combat;
pub mod core;
