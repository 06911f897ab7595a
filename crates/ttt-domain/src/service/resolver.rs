//! Move Resolver - Turns a request or a random pick into a slot
//!
//! Nothing here mutates the board; the orchestrator places the mark
//! once a move has been accepted.

use crate::model::board::Board;
use crate::model::slot::{Slot, SlotParseError};
use crate::service::chooser::SlotChooser;

/// Parse the player's two-character request
pub fn resolve_player_slot(move_text: &str) -> Result<Slot, SlotParseError> {
    move_text.parse()
}

/// Accept the player's slot unless it is already occupied
pub fn perform_player_move(board: &Board, slot: Slot) -> (bool, Slot) {
    (board.get(slot).is_empty(), slot)
}

/// Pick one empty slot uniformly at random
///
/// Makes exactly one draw from `chooser`.
pub fn perform_computer_move(
    board: &Board,
    chooser: &mut impl SlotChooser,
) -> Result<Slot, ResolveError> {
    let available = board.empty_slots();
    if available.is_empty() {
        return Err(ResolveError::BoardFull);
    }

    let index = chooser.choose_index(available.len());
    available
        .get(index)
        .copied()
        .ok_or(ResolveError::ChoiceOutOfRange {
            index,
            len: available.len(),
        })
}

/// Errors when resolving a computer move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No empty slot left to play
    BoardFull,
    /// The chooser returned an index outside `0..len`
    ChoiceOutOfRange { index: usize, len: usize },
}

impl core::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ResolveError::BoardFull => write!(f, "No empty slot left for the computer"),
            ResolveError::ChoiceOutOfRange { index, len } => {
                write!(f, "Chooser picked index {} out of {} slots", index, len)
            }
        }
    }
}

impl std::error::Error for ResolveError {}
