//! Turn Orchestrator - One reconciliation step
//!
//! The orchestrator looks at a `(spec, status)` snapshot and either
//! applies exactly one move or reports why nothing happened:
//! 1. Observe: Terminal games are left alone
//! 2. Decide: A new game picks who opens from whether a move is requested
//! 3. Resolve: The player's requested slot, or a random one for the computer
//! 4. Apply: Place the mark, re-render the table, append to history
//! 5. Evaluate: Record a winner or a draw, otherwise hand the turn over
//!
//! This is pure domain logic - no I/O, no async, no retries. The input
//! status is never mutated; an advanced status is returned by value.
//!
//! The symbol to play is derived from board parity, so X always opens
//! whoever moves first. Before every move the board is checked against
//! that assumption and against the move history.

use crate::model::board::{Board, BoardParseError};
use crate::model::game::{GameSpec, GameStatus, Turn, Winner};
use crate::model::slot::Slot;
use crate::model::symbol::Move;
use crate::service::chooser::SlotChooser;
use crate::service::endgame::evaluate;
use crate::service::resolver::{
    perform_computer_move, perform_player_move, resolve_player_slot, ResolveError,
};

/// Where a game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Table is empty
    NotStarted,
    InProgress,
    /// Winner recorded; absorbing
    Terminal,
}

/// Why a step applied no move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdleReason {
    /// Game already has a winner or ended in a draw
    Terminal,
    /// Player's turn and no move requested
    AwaitingMove,
    /// Requested move does not name a slot
    InvalidMove { input: String },
    /// Requested slot is taken
    SlotOccupied { slot: Slot },
}

impl core::fmt::Display for IdleReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IdleReason::Terminal => write!(f, "game is over"),
            IdleReason::AwaitingMove => write!(f, "waiting for the player's move"),
            IdleReason::InvalidMove { input } => write!(f, "ignoring invalid move '{}'", input),
            IdleReason::SlotOccupied { slot } => write!(f, "slot {} is already taken", slot),
        }
    }
}

/// What an advancing step did
///
/// The orchestrator doesn't log; the caller reports these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// Move applied, game continues
    MovePlayed { turn: Turn, mv: Move, next: Turn },
    /// Move completed a line
    GameWon { turn: Turn, mv: Move, winner: Winner },
    /// Move filled the board without a line
    GameDrawn { turn: Turn, mv: Move },
}

impl TurnEvent {
    pub fn mv(&self) -> &Move {
        match self {
            TurnEvent::MovePlayed { mv, .. }
            | TurnEvent::GameWon { mv, .. }
            | TurnEvent::GameDrawn { mv, .. } => mv,
        }
    }

    pub fn turn(&self) -> Turn {
        match self {
            TurnEvent::MovePlayed { turn, .. }
            | TurnEvent::GameWon { turn, .. }
            | TurnEvent::GameDrawn { turn, .. } => *turn,
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, TurnEvent::MovePlayed { .. })
    }
}

impl core::fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TurnEvent::MovePlayed { turn, mv, next } => {
                write!(f, "{} played {}, {} to move", turn, mv, next)
            }
            TurnEvent::GameWon { turn, mv, winner } => {
                write!(f, "{} played {}, {} wins", turn, mv, winner)
            }
            TurnEvent::GameDrawn { turn, mv } => write!(f, "{} played {}, draw", turn, mv),
        }
    }
}

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to write
    Unchanged(IdleReason),
    /// Exactly one move was applied
    Advanced { status: GameStatus, event: TurnEvent },
}

/// Errors that can occur in a step
///
/// These mean the stored status cannot be trusted; retrying won't help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    CorruptTable(BoardParseError),
    Inconsistent { reason: String },
    Resolve(ResolveError),
}

impl core::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrchestratorError::CorruptTable(e) => write!(f, "Corrupt table: {}", e),
            OrchestratorError::Inconsistent { reason } => {
                write!(f, "Inconsistent game status: {}", reason)
            }
            OrchestratorError::Resolve(e) => write!(f, "Cannot resolve move: {}", e),
        }
    }
}

impl std::error::Error for OrchestratorError {}

/// TurnOrchestrator - The single-step state machine
///
/// Stateless; all state lives in the `GameStatus`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOrchestrator;

impl TurnOrchestrator {
    pub fn new() -> Self {
        Self
    }

    pub fn observe(&self, status: &GameStatus) -> Phase {
        if status.is_terminal() {
            Phase::Terminal
        } else if status.is_new() {
            Phase::NotStarted
        } else {
            Phase::InProgress
        }
    }

    /// Run one step against a snapshot
    pub fn step(
        &self,
        spec: &GameSpec,
        status: &GameStatus,
        chooser: &mut impl SlotChooser,
    ) -> Result<Transition, OrchestratorError> {
        let turn = match self.observe(status) {
            Phase::Terminal => return Ok(Transition::Unchanged(IdleReason::Terminal)),
            Phase::NotStarted => {
                if spec.has_move() {
                    Turn::Player
                } else {
                    Turn::Computer
                }
            }
            Phase::InProgress => status.turn.ok_or_else(|| OrchestratorError::Inconsistent {
                reason: "game in progress without a turn".to_string(),
            })?,
        };

        let mut board = Board::from_table(&status.table).map_err(OrchestratorError::CorruptTable)?;
        check_consistency(&board, status)?;
        let symbol = board.current_symbol();

        let slot = match turn {
            Turn::Player => {
                if !spec.has_move() {
                    return Ok(Transition::Unchanged(IdleReason::AwaitingMove));
                }
                let Ok(requested) = resolve_player_slot(&spec.mv) else {
                    return Ok(Transition::Unchanged(IdleReason::InvalidMove {
                        input: spec.mv.clone(),
                    }));
                };
                let (accepted, slot) = perform_player_move(&board, requested);
                if !accepted {
                    return Ok(Transition::Unchanged(IdleReason::SlotOccupied { slot }));
                }
                slot
            }
            Turn::Computer => {
                perform_computer_move(&board, chooser).map_err(OrchestratorError::Resolve)?
            }
        };

        board.set(slot, symbol);
        let mv = Move::new(symbol, slot);

        let mut next = status.clone();
        next.table = board.serialize();
        next.move_history.push(mv.to_string());

        let endgame = evaluate(&board);
        let event = if endgame.win {
            next.winner = Winner::from_symbol(symbol);
            next.turn = Some(turn);
            TurnEvent::GameWon {
                turn,
                mv,
                winner: next.winner,
            }
        } else if endgame.stalemate {
            next.winner = Winner::Draw;
            next.turn = Some(turn);
            TurnEvent::GameDrawn { turn, mv }
        } else {
            next.turn = Some(turn.toggled());
            TurnEvent::MovePlayed {
                turn,
                mv,
                next: turn.toggled(),
            }
        };

        Ok(Transition::Advanced {
            status: next,
            event,
        })
    }
}

/// Board parity and history must agree before another mark is placed
fn check_consistency(board: &Board, status: &GameStatus) -> Result<(), OrchestratorError> {
    let (x, o) = board.counts();
    if x != o && x != o + 1 {
        return Err(OrchestratorError::Inconsistent {
            reason: format!("board holds {} X and {} O", x, o),
        });
    }
    if status.move_history.len() != board.occupied() {
        return Err(OrchestratorError::Inconsistent {
            reason: format!(
                "{} moves recorded for {} occupied slots",
                status.move_history.len(),
                board.occupied()
            ),
        });
    }
    Ok(())
}
