//! Stored game records
//!
//! The JSON shape of a game as the file store writes it. Field names
//! follow the resource schema (`move`, `turn`, `table`, `winner`,
//! `moveHistory`); empty status fields are omitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ttt_domain::model::game::{Game, GameId, GameSpec, GameStatus, Turn, Winner};
use ttt_domain::repository::game_repository::RepositoryError;

/// Errors from reading or writing the store file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} '{value}' in game {id}")]
    InvalidRecord {
        id: String,
        field: &'static str,
        value: String,
    },
}

impl From<StoreError> for RepositoryError {
    fn from(e: StoreError) -> Self {
        RepositoryError::PersistenceError {
            message: e.to_string(),
        }
    }
}

/// Desired state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRecord {
    #[serde(rename = "move", default)]
    pub mv: String,
}

/// Observed state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub turn: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub table: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub winner: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub move_history: Vec<String>,
}

/// One game in the store file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub spec: SpecRecord,
    #[serde(default)]
    pub status: StatusRecord,
}

impl From<&GameSpec> for SpecRecord {
    fn from(spec: &GameSpec) -> Self {
        Self {
            mv: spec.mv.clone(),
        }
    }
}

impl From<&GameStatus> for StatusRecord {
    fn from(status: &GameStatus) -> Self {
        Self {
            turn: status.turn.map(|t| t.as_str().to_string()).unwrap_or_default(),
            table: status.table.clone(),
            winner: status.winner.as_str().to_string(),
            move_history: status.move_history.clone(),
        }
    }
}

impl GameRecord {
    /// Record for a game being created now
    pub fn new(game: &Game, version: u64) -> Self {
        let now = Utc::now();
        Self {
            id: game.id().as_str().to_string(),
            version,
            created_at: now,
            updated_at: now,
            spec: game.spec().into(),
            status: game.status().into(),
        }
    }

    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Rebuild the domain entity
    pub fn to_game(&self) -> Result<Game, StoreError> {
        let turn = match self.status.turn.as_str() {
            "" => None,
            other => Some(Turn::parse(other).ok_or_else(|| self.invalid("turn", other))?),
        };
        let winner = Winner::parse(&self.status.winner)
            .ok_or_else(|| self.invalid("winner", &self.status.winner))?;

        let status = GameStatus {
            turn,
            table: self.status.table.clone(),
            winner,
            move_history: self.status.move_history.clone(),
        };
        Ok(Game::from_parts(
            GameId::new(self.id.clone()),
            GameSpec::new(self.spec.mv.clone()),
            status,
            self.version,
        ))
    }

    fn invalid(&self, field: &'static str, value: &str) -> StoreError {
        StoreError::InvalidRecord {
            id: self.id.clone(),
            field,
            value: value.to_string(),
        }
    }
}
