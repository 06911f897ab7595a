//! Game Repository - Abstract storage for Games
//!
//! `find_by_id` is the fetch side of reconciliation and `persist_status`
//! the write side. Writes are conditional on the version the caller read,
//! so a writer holding a stale snapshot gets `ConcurrencyError` instead of
//! overwriting a newer status.

use crate::model::game::{Game, GameId, GameSpec, GameStatus};

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Game not found
    NotFound { id: String },
    /// A game with this id already exists
    AlreadyExists { id: String },
    /// Stored version differs from the one the writer read
    ConcurrencyError {
        id: String,
        expected: u64,
        actual: u64,
    },
    /// Failed to read or persist
    PersistenceError { message: String },
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RepositoryError::NotFound { id } => {
                write!(f, "Game not found: {}", id)
            }
            RepositoryError::AlreadyExists { id } => {
                write!(f, "Game already exists: {}", id)
            }
            RepositoryError::ConcurrencyError {
                id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Concurrent modification for game {}: expected version {}, found {}",
                    id, expected, actual
                )
            }
            RepositoryError::PersistenceError { message } => {
                write!(f, "Persistence error: {}", message)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Game Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// Every successful write of spec or status bumps the game's version.
pub trait GameRepository {
    /// Store a new game; its version becomes 1
    fn create(&mut self, game: &Game) -> Result<u64, RepositoryError>;

    /// Find a game by ID
    fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, RepositoryError>;

    /// Replace the desired state; returns the new version
    fn update_spec(&mut self, id: &GameId, spec: &GameSpec) -> Result<u64, RepositoryError>;

    /// Write the observed state if the stored version still equals `expected_version`
    fn persist_status(
        &mut self,
        id: &GameId,
        status: &GameStatus,
        expected_version: u64,
    ) -> Result<u64, RepositoryError>;

    /// Delete a game
    fn delete(&mut self, id: &GameId) -> Result<(), RepositoryError>;

    /// All game ids, sorted
    fn list_ids(&self) -> Result<Vec<GameId>, RepositoryError>;

    /// Check if a game exists
    fn exists(&self, id: &GameId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Count all games
    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.list_ids()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory implementation for testing
    struct InMemoryGameRepo {
        games: BTreeMap<GameId, Game>,
    }

    impl InMemoryGameRepo {
        fn new() -> Self {
            Self {
                games: BTreeMap::new(),
            }
        }

        fn get_mut(&mut self, id: &GameId) -> Result<&mut Game, RepositoryError> {
            self.games.get_mut(id).ok_or(RepositoryError::NotFound {
                id: id.as_str().to_string(),
            })
        }
    }

    impl GameRepository for InMemoryGameRepo {
        fn create(&mut self, game: &Game) -> Result<u64, RepositoryError> {
            if self.games.contains_key(game.id()) {
                return Err(RepositoryError::AlreadyExists {
                    id: game.id().as_str().to_string(),
                });
            }
            let mut stored = game.clone();
            stored.set_version(1);
            self.games.insert(game.id().clone(), stored);
            Ok(1)
        }

        fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, RepositoryError> {
            Ok(self.games.get(id).cloned())
        }

        fn update_spec(&mut self, id: &GameId, spec: &GameSpec) -> Result<u64, RepositoryError> {
            let game = self.get_mut(id)?;
            game.set_spec(spec.clone());
            game.set_version(game.version() + 1);
            Ok(game.version())
        }

        fn persist_status(
            &mut self,
            id: &GameId,
            status: &GameStatus,
            expected_version: u64,
        ) -> Result<u64, RepositoryError> {
            let game = self.get_mut(id)?;
            if game.version() != expected_version {
                return Err(RepositoryError::ConcurrencyError {
                    id: id.as_str().to_string(),
                    expected: expected_version,
                    actual: game.version(),
                });
            }
            game.set_status(status.clone());
            game.set_version(expected_version + 1);
            Ok(game.version())
        }

        fn delete(&mut self, id: &GameId) -> Result<(), RepositoryError> {
            self.games.remove(id);
            Ok(())
        }

        fn list_ids(&self) -> Result<Vec<GameId>, RepositoryError> {
            Ok(self.games.keys().cloned().collect())
        }
    }

    #[test]
    fn test_in_memory_repo() {
        let mut repo = InMemoryGameRepo::new();
        let id = GameId::new("g-001");

        repo.create(&Game::new(id.clone(), GameSpec::default()))
            .unwrap();
        assert!(repo.exists(&id).unwrap());
        assert_eq!(repo.count().unwrap(), 1);

        let version = repo.update_spec(&id, &GameSpec::new("a1")).unwrap();
        assert_eq!(version, 2);

        let status = GameStatus {
            table: "x".to_string(),
            ..GameStatus::default()
        };
        // Stale writer loses
        assert!(matches!(
            repo.persist_status(&id, &status, 1),
            Err(RepositoryError::ConcurrencyError { actual: 2, .. })
        ));
        assert_eq!(repo.persist_status(&id, &status, 2).unwrap(), 3);
    }
}
