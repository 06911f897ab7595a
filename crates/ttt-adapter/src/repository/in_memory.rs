//! In-Memory Repository Implementation
//!
//! Useful for tests and for running the controller without a store file.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ttt_domain::model::game::{Game, GameId, GameSpec, GameStatus};
use ttt_domain::repository::game_repository::{GameRepository, RepositoryError};

/// In-memory Game Repository
///
/// Thread-safe implementation using RwLock. Clones share the same games.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameRepository {
    games: Arc<RwLock<BTreeMap<GameId, Game>>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<GameId, Game>>, RepositoryError> {
        self.games.read().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire read lock".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<GameId, Game>>, RepositoryError> {
        self.games.write().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire write lock".to_string(),
        })
    }
}

fn not_found(id: &GameId) -> RepositoryError {
    RepositoryError::NotFound {
        id: id.as_str().to_string(),
    }
}

impl GameRepository for InMemoryGameRepository {
    fn create(&mut self, game: &Game) -> Result<u64, RepositoryError> {
        let mut games = self.write()?;
        if games.contains_key(game.id()) {
            return Err(RepositoryError::AlreadyExists {
                id: game.id().as_str().to_string(),
            });
        }
        let mut stored = game.clone();
        stored.set_version(1);
        games.insert(game.id().clone(), stored);
        Ok(1)
    }

    fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, RepositoryError> {
        Ok(self.read()?.get(id).cloned())
    }

    fn update_spec(&mut self, id: &GameId, spec: &GameSpec) -> Result<u64, RepositoryError> {
        let mut games = self.write()?;
        let game = games.get_mut(id).ok_or_else(|| not_found(id))?;
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
        let mut games = self.write()?;
        let game = games.get_mut(id).ok_or_else(|| not_found(id))?;
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
        self.write()?.remove(id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<GameId>, RepositoryError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_repository() {
        let mut repo = InMemoryGameRepository::new();
        let id = GameId::new("g-001");

        assert_eq!(repo.create(&Game::new(id.clone(), GameSpec::default())).unwrap(), 1);
        assert!(matches!(
            repo.create(&Game::new(id.clone(), GameSpec::default())),
            Err(RepositoryError::AlreadyExists { .. })
        ));

        assert_eq!(repo.update_spec(&id, &GameSpec::new("a1")).unwrap(), 2);
        let found = repo.find_by_id(&id).unwrap().unwrap();
        assert_eq!(found.spec().mv, "a1");
        assert_eq!(found.version(), 2);

        assert_eq!(repo.count().unwrap(), 1);
        repo.delete(&id).unwrap();
        assert!(repo.find_by_id(&id).unwrap().is_none());
    }

    #[test]
    fn test_stale_status_write_conflicts() {
        let mut repo = InMemoryGameRepository::new();
        let id = GameId::new("g-001");
        repo.create(&Game::new(id.clone(), GameSpec::default())).unwrap();

        // A second handle sees the same games
        let mut other = repo.clone();
        other.update_spec(&id, &GameSpec::new("b2")).unwrap();

        let status = GameStatus::default();
        assert!(matches!(
            repo.persist_status(&id, &status, 1),
            Err(RepositoryError::ConcurrencyError {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        assert_eq!(repo.persist_status(&id, &status, 2).unwrap(), 3);
    }

    #[test]
    fn test_missing_game() {
        let mut repo = InMemoryGameRepository::new();
        let id = GameId::new("nope");
        assert!(matches!(
            repo.update_spec(&id, &GameSpec::default()),
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.persist_status(&id, &GameStatus::default(), 1),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
