//! Wiring shared by every command
//!
//! Each command opens the store, runs a controller for as long as it
//! needs one, and stops it before returning. The controller is what moves
//! games forward; commands only write the desired move.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use shared::ControllerConfig;
use ttt_adapter::controller::{Controller, PassOutcome, ReconcileReport};
use ttt_adapter::random::RandomChooser;
use ttt_adapter::repository::FileGameRepository;
use ttt_domain::{Game, GameId, GameRepository};
use ttt_usecase::ReconcileGame;

/// Store file used when neither `--store` nor the config names one
pub const DEFAULT_STORE: &str = "ttt-games.json";

pub struct AppContext {
    pub config: ControllerConfig,
    pub repository: FileGameRepository,
    pub json: bool,
    chooser: RandomChooser,
}

impl AppContext {
    /// Flags override values from the config file
    pub fn load(config_path: Option<&Path>, store: Option<PathBuf>, json: bool) -> Result<Self> {
        let mut config = ControllerConfig::load(config_path).with_context(|| match config_path {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Failed to load default config".to_string(),
        })?;
        if let Some(store) = store {
            config.store_path = Some(store);
        }
        let path = config
            .store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        debug!(store = %path.display(), workers = config.workers, "context loaded");

        Ok(Self {
            chooser: RandomChooser::from_config(config.seed),
            repository: FileGameRepository::new(path),
            config,
            json,
        })
    }

    pub fn fetch(&self, id: &GameId) -> Result<Game> {
        self.repository
            .find_by_id(id)
            .with_context(|| format!("Failed to read game {id}"))?
            .with_context(|| format!("Game {id} not found"))
    }

    /// Reconcile `id` until a pass changes nothing
    ///
    /// Returns every report in completion order.
    pub async fn converge(&self, id: &GameId) -> Result<Vec<ReconcileReport>> {
        let reconciler = ReconcileGame::new(self.repository.clone(), self.chooser.clone());
        let handle = Controller::spawn(reconciler, &self.config);
        let mut receiver = handle.subscribe();

        handle.enqueue(id.clone());
        handle.wait_idle().await;
        handle.shutdown().await;

        let mut reports = Vec::new();
        while let Ok(report) = receiver.try_recv() {
            reports.push(report);
        }

        if let Some(ReconcileReport {
            attempts,
            outcome: PassOutcome::Failed { error, .. },
            ..
        }) = reports.last()
        {
            bail!("Reconciling game {id} failed after {attempts} attempt(s): {error}");
        }
        Ok(reports)
    }
}
