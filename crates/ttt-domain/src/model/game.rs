//! Game - The declarative resource
//!
//! A Game is an Entity: the consumer writes its `GameSpec` (the desired
//! move) and the controller converges its `GameStatus` toward it.
//! `version` is the store's optimistic-concurrency token.

use super::symbol::Symbol;

/// Unique identifier for a Game
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for GameId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(&self.0)
    }
}

/// Whose action is expected next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Player,
    Computer,
}

impl Turn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Turn::Player => "Player",
            Turn::Computer => "Computer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Player" => Some(Turn::Player),
            "Computer" => Some(Turn::Computer),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Turn::Player => Turn::Computer,
            Turn::Computer => Turn::Player,
        }
    }
}

impl core::fmt::Display for Turn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recorded game result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Winner {
    /// Game not decided yet
    #[default]
    None,
    X,
    O,
    Draw,
}

impl Winner {
    /// Persisted form: `""`, `"X"`, `"O"` or `"Draw"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::None => "",
            Winner::X => "X",
            Winner::O => "O",
            Winner::Draw => "Draw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => Some(Winner::None),
            "X" => Some(Winner::X),
            "O" => Some(Winner::O),
            "Draw" => Some(Winner::Draw),
            _ => None,
        }
    }

    /// Winner for a symbol that completed a line
    pub fn from_symbol(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Winner::X,
            Symbol::O => Winner::O,
            Symbol::Empty => Winner::None,
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, Winner::None)
    }
}

impl core::fmt::Display for Winner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Desired state written by the consumer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSpec {
    /// Requested slot, e.g. `"a1"`; empty means no move requested yet
    pub mv: String,
}

impl GameSpec {
    pub fn new(mv: impl Into<String>) -> Self {
        Self { mv: mv.into() }
    }

    pub fn has_move(&self) -> bool {
        !self.mv.is_empty()
    }
}

/// Observed state, round-tripped through the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStatus {
    /// Unset until the first step of a new game
    pub turn: Option<Turn>,
    /// Canonical board text, empty for a new game
    pub table: String,
    pub winner: Winner,
    /// Move text forms in chronological order
    pub move_history: Vec<String>,
}

impl GameStatus {
    pub fn is_new(&self) -> bool {
        self.table.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_decided()
    }
}

/// Game entity as held by a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: GameId,
    spec: GameSpec,
    status: GameStatus,
    version: u64,
}

impl Game {
    /// A fresh game with no status
    pub fn new(id: GameId, spec: GameSpec) -> Self {
        Self {
            id,
            spec,
            status: GameStatus::default(),
            version: 0,
        }
    }

    /// Rebuild a game from stored parts
    pub fn from_parts(id: GameId, spec: GameSpec, status: GameStatus, version: u64) -> Self {
        Self {
            id,
            spec,
            status,
            version,
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn spec(&self) -> &GameSpec {
        &self.spec
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    // ========== Mutations ==========

    pub fn set_spec(&mut self, spec: GameSpec) {
        self.spec = spec;
    }

    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}
