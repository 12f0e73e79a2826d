//! Skirmish Unit - battle unit controller for turn-based scenes

pub mod battle;
pub mod core;
pub mod renderer;
