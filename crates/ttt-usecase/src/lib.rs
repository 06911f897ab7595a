//! # Tic-Tac-Toe Use Case Layer
//!
//! Application-specific business rules.
//! This layer moves data between the store port and the turn orchestrator:
//! fetch a snapshot, run one step, write the result back.

pub use ttt_domain;

pub mod reconcile;

pub use reconcile::{ReconcileError, ReconcileGame, ReconcileOutcome};
