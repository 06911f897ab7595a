//! Domain Services - Rules that operate on the board and the game
//!
//! Services hold no state; everything they need is passed in.

pub mod chooser;
pub mod endgame;
pub mod orchestrator;
pub mod resolver;
