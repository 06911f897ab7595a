//! File System Repository Implementation
//!
//! All games live in one JSON document. Every write replaces the file
//! atomically (temp file in the same directory, then rename). Handles
//! cloned from one repository share a lock; separate processes writing
//! the same file are not coordinated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use ttt_domain::model::game::{Game, GameId, GameSpec, GameStatus};
use ttt_domain::repository::game_repository::{GameRepository, RepositoryError};

use super::record::{GameRecord, StatusRecord, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    games: BTreeMap<String, GameRecord>,
}

/// JSON file Game Repository
#[derive(Debug, Clone)]
pub struct FileGameRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileGameRepository {
    /// The file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, document)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), games = document.games.len(), "store written");
        Ok(())
    }

    fn read<T>(
        &self,
        f: impl FnOnce(&StoreDocument) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| lock_error())?;
        let document = self.load()?;
        f(&document)
    }

    /// Load, modify and write back under the lock
    fn modify<T>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| lock_error())?;
        let mut document = self.load()?;
        let value = f(&mut document)?;
        self.save(&document)?;
        Ok(value)
    }
}

fn lock_error() -> RepositoryError {
    RepositoryError::PersistenceError {
        message: "Failed to acquire store lock".to_string(),
    }
}

fn record_mut<'a>(
    document: &'a mut StoreDocument,
    id: &GameId,
) -> Result<&'a mut GameRecord, RepositoryError> {
    document
        .games
        .get_mut(id.as_str())
        .ok_or_else(|| RepositoryError::NotFound {
            id: id.as_str().to_string(),
        })
}

impl GameRepository for FileGameRepository {
    fn create(&mut self, game: &Game) -> Result<u64, RepositoryError> {
        self.modify(|document| {
            if document.games.contains_key(game.id().as_str()) {
                return Err(RepositoryError::AlreadyExists {
                    id: game.id().as_str().to_string(),
                });
            }
            document
                .games
                .insert(game.id().as_str().to_string(), GameRecord::new(game, 1));
            Ok(1)
        })
    }

    fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, RepositoryError> {
        self.read(|document| match document.games.get(id.as_str()) {
            Some(record) => Ok(Some(record.to_game()?)),
            None => Ok(None),
        })
    }

    fn update_spec(&mut self, id: &GameId, spec: &GameSpec) -> Result<u64, RepositoryError> {
        self.modify(|document| {
            let record = record_mut(document, id)?;
            record.spec = spec.into();
            record.touch();
            Ok(record.version)
        })
    }

    fn persist_status(
        &mut self,
        id: &GameId,
        status: &GameStatus,
        expected_version: u64,
    ) -> Result<u64, RepositoryError> {
        self.modify(|document| {
            let record = record_mut(document, id)?;
            if record.version != expected_version {
                return Err(RepositoryError::ConcurrencyError {
                    id: id.as_str().to_string(),
                    expected: expected_version,
                    actual: record.version,
                });
            }
            record.status = StatusRecord::from(status);
            record.touch();
            Ok(record.version)
        })
    }

    fn delete(&mut self, id: &GameId) -> Result<(), RepositoryError> {
        self.modify(|document| {
            document.games.remove(id.as_str());
            Ok(())
        })
    }

    fn list_ids(&self) -> Result<Vec<GameId>, RepositoryError> {
        self.read(|document| Ok(document.games.keys().map(GameId::new).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttt_domain::model::game::{Turn, Winner};

    fn temp_repo() -> (tempfile::TempDir, FileGameRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileGameRepository::new(dir.path().join("state").join("games.json"));
        (dir, repo)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let (_dir, repo) = temp_repo();
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.find_by_id(&GameId::new("g-001")).unwrap().is_none());
    }

    #[test]
    fn test_games_survive_reopen() {
        let (_dir, mut repo) = temp_repo();
        let id = GameId::new("g-001");
        repo.create(&Game::new(id.clone(), GameSpec::new("a1"))).unwrap();

        let status = GameStatus {
            turn: Some(Turn::Computer),
            table: "table".to_string(),
            winner: Winner::None,
            move_history: vec!["A1 - X".to_string()],
        };
        assert_eq!(repo.persist_status(&id, &status, 1).unwrap(), 2);

        let reopened = FileGameRepository::new(repo.path());
        let game = reopened.find_by_id(&id).unwrap().unwrap();
        assert_eq!(game.version(), 2);
        assert_eq!(game.spec().mv, "a1");
        assert_eq!(game.status(), &status);
        assert_eq!(reopened.list_ids().unwrap(), vec![id]);
    }

    #[test]
    fn test_version_checks() {
        let (_dir, mut repo) = temp_repo();
        let id = GameId::new("g-001");
        repo.create(&Game::new(id.clone(), GameSpec::default())).unwrap();
        assert_eq!(repo.update_spec(&id, &GameSpec::new("c2")).unwrap(), 2);

        assert!(matches!(
            repo.persist_status(&id, &GameStatus::default(), 1),
            Err(RepositoryError::ConcurrencyError { actual: 2, .. })
        ));
        assert!(matches!(
            repo.create(&Game::new(id.clone(), GameSpec::default())),
            Err(RepositoryError::AlreadyExists { .. })
        ));

        repo.delete(&id).unwrap();
        assert!(matches!(
            repo.update_spec(&id, &GameSpec::default()),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let (_dir, repo) = temp_repo();
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(repo.path(), "{ not json").unwrap();

        assert!(matches!(
            repo.list_ids(),
            Err(RepositoryError::PersistenceError { .. })
        ));
    }
}
