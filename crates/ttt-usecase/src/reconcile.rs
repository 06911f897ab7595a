//! Reconcile Game - Fetch, step, persist
//!
//! One call runs exactly one orchestrator step against a fresh snapshot.
//! There is no retry loop here: a conflicting write comes back as
//! `ReconcileError::Conflict` and the caller re-runs the whole pass,
//! which re-fetches. A computed status is never re-applied.

use thiserror::Error;
use tracing::{debug, info, warn};

use ttt_domain::{
    GameId, GameRepository, IdleReason, OrchestratorError, RepositoryError, SlotChooser,
    Transition, TurnEvent, TurnOrchestrator,
};

/// What a successful pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Unknown id; nothing to do
    NotFound,
    /// No move applied and nothing written
    Idle { reason: IdleReason },
    /// One move applied and persisted at `version`
    Advanced { event: TurnEvent, version: u64 },
}

impl ReconcileOutcome {
    pub fn is_advanced(&self) -> bool {
        matches!(self, ReconcileOutcome::Advanced { .. })
    }
}

/// Errors surfaced to the trigger layer
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Someone else wrote the game between fetch and persist
    #[error("conflicting update for game {id}: {source}")]
    Conflict {
        id: String,
        #[source]
        source: RepositoryError,
    },

    /// Store failed to read or write
    #[error("store error for game {id}: {source}")]
    Store {
        id: String,
        #[source]
        source: RepositoryError,
    },

    /// Stored status cannot be stepped
    #[error("game {id} cannot be reconciled: {source}")]
    Inconsistent {
        id: String,
        #[source]
        source: OrchestratorError,
    },
}

impl ReconcileError {
    /// Whether re-running the pass may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ReconcileError::Conflict { .. } | ReconcileError::Store { .. } => true,
            ReconcileError::Inconsistent { .. } => false,
        }
    }

    fn from_repository(id: &GameId, source: RepositoryError) -> Self {
        match source {
            RepositoryError::ConcurrencyError { .. } => ReconcileError::Conflict {
                id: id.to_string(),
                source,
            },
            _ => ReconcileError::Store {
                id: id.to_string(),
                source,
            },
        }
    }
}

/// The reconcile use case
///
/// Owns a store handle and a random source; both are usually cheap
/// clones of shared adapters, one per worker.
#[derive(Debug, Clone)]
pub struct ReconcileGame<R, C> {
    repository: R,
    chooser: C,
    orchestrator: TurnOrchestrator,
}

impl<R, C> ReconcileGame<R, C>
where
    R: GameRepository,
    C: SlotChooser,
{
    pub fn new(repository: R, chooser: C) -> Self {
        Self {
            repository,
            chooser,
            orchestrator: TurnOrchestrator::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Run one reconciliation pass for `id`
    pub fn execute(&mut self, id: &GameId) -> Result<ReconcileOutcome, ReconcileError> {
        let Some(game) = self
            .repository
            .find_by_id(id)
            .map_err(|e| ReconcileError::from_repository(id, e))?
        else {
            debug!(game_id = %id, "game not found, nothing to do");
            return Ok(ReconcileOutcome::NotFound);
        };

        let transition = self
            .orchestrator
            .step(game.spec(), game.status(), &mut self.chooser)
            .map_err(|source| ReconcileError::Inconsistent {
                id: id.to_string(),
                source,
            })?;

        match transition {
            Transition::Unchanged(reason) => {
                debug!(game_id = %id, version = game.version(), %reason, "no move applied");
                Ok(ReconcileOutcome::Idle { reason })
            }
            Transition::Advanced { status, event } => {
                match self.repository.persist_status(id, &status, game.version()) {
                    Ok(version) => {
                        info!(
                            game_id = %id,
                            version,
                            turn = %event.turn(),
                            mv = %event.mv(),
                            winner = %status.winner,
                            "move applied"
                        );
                        Ok(ReconcileOutcome::Advanced { event, version })
                    }
                    Err(RepositoryError::NotFound { .. }) => {
                        debug!(game_id = %id, "game deleted before status was written");
                        Ok(ReconcileOutcome::NotFound)
                    }
                    Err(e) => {
                        warn!(
                            game_id = %id,
                            version = game.version(),
                            error = %e,
                            "status not persisted"
                        );
                        Err(ReconcileError::from_repository(id, e))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use ttt_domain::{Board, Game, GameSpec, GameStatus, Symbol, Turn, Winner};

    /// In-memory store that can inject failures on the next write
    #[derive(Default)]
    struct TestRepo {
        games: BTreeMap<GameId, Game>,
        fail_next_persist: Option<RepositoryError>,
        persist_calls: usize,
    }

    impl GameRepository for TestRepo {
        fn create(&mut self, game: &Game) -> Result<u64, RepositoryError> {
            let mut stored = game.clone();
            stored.set_version(1);
            self.games.insert(game.id().clone(), stored);
            Ok(1)
        }

        fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, RepositoryError> {
            Ok(self.games.get(id).cloned())
        }

        fn update_spec(&mut self, id: &GameId, spec: &GameSpec) -> Result<u64, RepositoryError> {
            let game = self.games.get_mut(id).ok_or(RepositoryError::NotFound {
                id: id.to_string(),
            })?;
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
            self.persist_calls += 1;
            if let Some(e) = self.fail_next_persist.take() {
                return Err(e);
            }
            let game = self.games.get_mut(id).ok_or(RepositoryError::NotFound {
                id: id.to_string(),
            })?;
            if game.version() != expected_version {
                return Err(RepositoryError::ConcurrencyError {
                    id: id.to_string(),
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

    struct FirstSlot;

    impl SlotChooser for FirstSlot {
        fn choose_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    fn use_case_with(spec: GameSpec) -> (ReconcileGame<TestRepo, FirstSlot>, GameId) {
        let id = GameId::new("g-001");
        let mut repo = TestRepo::default();
        repo.create(&Game::new(id.clone(), spec)).unwrap();
        (ReconcileGame::new(repo, FirstSlot), id)
    }

    fn stored(use_case: &ReconcileGame<TestRepo, FirstSlot>, id: &GameId) -> Game {
        use_case.repository().find_by_id(id).unwrap().unwrap()
    }

    #[test]
    fn test_unknown_game_is_benign() {
        let mut use_case = ReconcileGame::new(TestRepo::default(), FirstSlot);
        let outcome = use_case.execute(&GameId::new("missing")).unwrap();
        assert_eq!(outcome, ReconcileOutcome::NotFound);
    }

    #[test]
    fn test_player_then_computer() {
        let (mut use_case, id) = use_case_with(GameSpec::new("a1"));

        let outcome = use_case.execute(&id).unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Advanced { version: 2, .. }));
        let game = stored(&use_case, &id);
        assert_eq!(game.status().turn, Some(Turn::Computer));
        assert_eq!(game.status().move_history, vec!["A1 - X".to_string()]);

        // Status change triggers the next pass; computer takes A2
        let outcome = use_case.execute(&id).unwrap();
        assert!(outcome.is_advanced());
        let game = stored(&use_case, &id);
        assert_eq!(game.status().turn, Some(Turn::Player));
        assert_eq!(game.status().move_history[1], "A2 - O");
        let board = Board::from_table(&game.status().table).unwrap();
        assert_eq!(board.get("A2".parse().unwrap()), Symbol::O);

        // Spec still names A1, which is taken
        let outcome = use_case.execute(&id).unwrap();
        assert!(matches!(
            outcome,
            ReconcileOutcome::Idle {
                reason: IdleReason::SlotOccupied { .. }
            }
        ));
        assert_eq!(stored(&use_case, &id).version(), 3);
    }

    #[test]
    fn test_idle_pass_writes_nothing() {
        let (mut use_case, id) = use_case_with(GameSpec::default());
        use_case.execute(&id).unwrap(); // computer opens
        let before = stored(&use_case, &id);
        let calls = use_case.repository().persist_calls;

        let outcome = use_case.execute(&id).unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::Idle {
                reason: IdleReason::AwaitingMove
            }
        );
        assert_eq!(use_case.repository().persist_calls, calls);
        assert_eq!(stored(&use_case, &id), before);
    }

    #[test]
    fn test_conflict_is_retryable_and_rerun_succeeds() {
        let (mut use_case, id) = use_case_with(GameSpec::new("b2"));
        use_case.repository.fail_next_persist = Some(RepositoryError::ConcurrencyError {
            id: id.to_string(),
            expected: 1,
            actual: 2,
        });

        let err = use_case.execute(&id).unwrap_err();
        assert!(matches!(err, ReconcileError::Conflict { .. }));
        assert!(err.is_retryable());
        assert!(stored(&use_case, &id).status().is_new());

        let outcome = use_case.execute(&id).unwrap();
        assert!(outcome.is_advanced());
        assert_eq!(stored(&use_case, &id).status().move_history.len(), 1);
    }

    #[test]
    fn test_store_failure_is_retryable() {
        let (mut use_case, id) = use_case_with(GameSpec::new("b2"));
        use_case.repository.fail_next_persist = Some(RepositoryError::PersistenceError {
            message: "disk full".to_string(),
        });

        let err = use_case.execute(&id).unwrap_err();
        assert!(matches!(err, ReconcileError::Store { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_deleted_before_write_is_not_found() {
        let (mut use_case, id) = use_case_with(GameSpec::new("b2"));
        use_case.repository.fail_next_persist = Some(RepositoryError::NotFound {
            id: id.to_string(),
        });
        assert_eq!(use_case.execute(&id).unwrap(), ReconcileOutcome::NotFound);
    }

    #[test]
    fn test_corrupt_status_is_permanent() {
        let (mut use_case, id) = use_case_with(GameSpec::default());
        let corrupt = GameStatus {
            turn: Some(Turn::Computer),
            table: "garbage".to_string(),
            ..GameStatus::default()
        };
        use_case.repository.persist_status(&id, &corrupt, 1).unwrap();

        let err = use_case.execute(&id).unwrap_err();
        assert!(matches!(err, ReconcileError::Inconsistent { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_terminal_game_is_left_alone() {
        let (mut use_case, id) = use_case_with(GameSpec::new("c3"));
        let mut board = Board::new();
        for s in ["A1", "A2", "A3"] {
            board.set(s.parse().unwrap(), Symbol::X);
        }
        let done = GameStatus {
            turn: Some(Turn::Player),
            table: board.serialize(),
            winner: Winner::X,
            move_history: vec![],
        };
        use_case.repository.persist_status(&id, &done, 1).unwrap();

        for _ in 0..3 {
            assert_eq!(
                use_case.execute(&id).unwrap(),
                ReconcileOutcome::Idle {
                    reason: IdleReason::Terminal
                }
            );
        }
        assert_eq!(stored(&use_case, &id).status(), &done);
    }
}
