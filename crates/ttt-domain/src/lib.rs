//! # Tic-Tac-Toe Domain Layer
//!
//! The game state machine with zero external dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Slot, Symbol, Board, Move, Game               ││
//! │  │  repository/- GameRepository port (not implementations)     ││
//! │  │  service/   - Resolver, Endgame, TurnOrchestrator           ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The orchestrator is a pure function of `(spec, status)`. Fetching,
//! persisting, retrying and scheduling belong to the outer layers.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::{
    board::{Board, BoardParseError},
    game::{Game, GameId, GameSpec, GameStatus, Turn, Winner},
    slot::{Column, Row, Slot, SlotParseError},
    symbol::{Move, Symbol},
};

pub use repository::game_repository::{GameRepository, RepositoryError};

pub use service::chooser::SlotChooser;
pub use service::endgame::{evaluate, Endgame};
pub use service::orchestrator::{
    IdleReason, OrchestratorError, Phase, Transition, TurnEvent, TurnOrchestrator,
};
pub use service::resolver::{
    perform_computer_move, perform_player_move, resolve_player_slot, ResolveError,
};
