//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define HOW the domain wants games stored,
//! but NOT how it's actually done. That's the adapter's job.
//!
//! ```text
//! Domain Layer          │  Adapter Layer
//! ──────────────────────┼────────────────────────
//! trait GameRepository  │  InMemoryGameRepository
//!   fn find_by_id()     │  FileGameRepository
//!   fn persist_status() │
//! ```

pub mod game_repository;
