//! Domain Models - The vocabulary of the game
//!
//! Every name here should match how we talk about a game of tic-tac-toe.

pub mod board;
pub mod game;
pub mod slot;
pub mod symbol;
