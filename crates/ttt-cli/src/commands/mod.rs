//! CLI Commands

pub mod list;
pub mod new;
pub mod play;
pub mod reconcile;
pub mod set_move;
pub mod show;

pub use list::ListCommand;
pub use new::NewCommand;
pub use play::PlayCommand;
pub use reconcile::ReconcileCommand;
pub use set_move::MoveCommand;
pub use show::ShowCommand;

use anyhow::{bail, Result};
use regex::Regex;

use ttt_adapter::controller::{PassOutcome, ReconcileReport};
use ttt_domain::IdleReason;
use ttt_usecase::ReconcileOutcome;

/// Accepted move syntax
pub const SLOT_PATTERN: &str = "^[a-cA-C][1-3]$";

/// Reject anything that is not a slot before it reaches the store
pub fn validate_slot(input: &str) -> Result<String> {
    let input = input.trim();
    if !Regex::new(SLOT_PATTERN)?.is_match(input) {
        bail!("Invalid slot '{input}': expected a column A-C and a row 1-3, e.g. b2");
    }
    Ok(input.to_string())
}

/// Why the last pass stopped, when it refused the requested move
pub fn rejected_move(reports: &[ReconcileReport]) -> Option<&IdleReason> {
    match reports.last().map(|r| &r.outcome) {
        Some(PassOutcome::Done(ReconcileOutcome::Idle {
            reason: reason @ IdleReason::SlotOccupied { .. },
        })) if reports.len() == 1 => Some(reason),
        _ => None,
    }
}
