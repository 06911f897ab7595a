//! # Tic-Tac-Toe Adapter Layer
//!
//! External system integrations (Hexagonal Architecture adapters).
//!
//! ## Structure
//!
//! - `controller/` - Inbound adapter: the work queue that triggers reconciliation
//! - `random` - Outbound adapter: the computer's random source
//! - `repository/` - Store implementations

pub mod controller;
pub mod random;
pub mod repository;
