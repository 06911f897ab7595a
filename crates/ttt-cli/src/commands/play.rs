//! ttt play command - interactive game

use anyhow::{bail, Context, Result};
use clap::Args;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use ttt_adapter::controller::{PassOutcome, ReconcileReport};
use ttt_domain::{Game, GameId, GameRepository, GameSpec, Turn};
use ttt_usecase::ReconcileOutcome;

use super::{rejected_move, validate_slot};
use crate::context::AppContext;
use crate::output::{print_game, summary};

#[derive(Debug, Args)]
pub struct PlayCommand {
    /// Resume this game, or start it under this id
    #[arg(long)]
    pub id: Option<String>,
}

impl PlayCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> Result<()> {
        let theme = ColorfulTheme::default();
        let term = Term::stdout();
        let id = self.open(ctx, &theme).await?;

        loop {
            let game = ctx.fetch(&id)?;
            term.clear_screen()?;
            print_game(&game, false)?;

            if game.status().is_terminal() {
                println!("{}", style("Game over").bold());
                return Ok(());
            }
            if game.status().turn != Some(Turn::Player) {
                // Computer's turn left over from an interrupted run
                let reports = ctx.converge(&id).await?;
                ensure_advanced(&id, &reports)?;
                continue;
            }

            let input: String = Input::with_theme(&theme)
                .with_prompt("Your move (q to quit)")
                .validate_with(|input: &String| -> Result<(), String> {
                    if input.trim().eq_ignore_ascii_case("q") {
                        return Ok(());
                    }
                    validate_slot(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()?;

            if input.trim().eq_ignore_ascii_case("q") {
                println!("Game {} saved, resume with `ttt play --id {}`", id, id);
                return Ok(());
            }

            ctx.repository
                .update_spec(&id, &GameSpec::new(validate_slot(&input)?))
                .with_context(|| format!("Failed to request move for game {id}"))?;
            let reports = ctx.converge(&id).await?;
            if let Some(reason) = rejected_move(&reports) {
                term.write_line(&format!("{} {reason}", style("Move not played:").yellow()))?;
                term.read_key()?;
            }
        }
    }

    /// Load an existing game or create one
    async fn open(&self, ctx: &mut AppContext, theme: &ColorfulTheme) -> Result<GameId> {
        let id = GameId::new(
            self.id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        );
        if let Some(game) = ctx.repository.find_by_id(&id)? {
            println!("Resuming game {}: {}", id, summary(&game));
            return Ok(id);
        }

        let player_first = Confirm::with_theme(theme)
            .with_prompt("Do you want to move first?")
            .default(true)
            .interact()?;

        let spec = if player_first {
            let first: String = Input::with_theme(theme)
                .with_prompt("Opening move")
                .validate_with(|input: &String| -> Result<(), String> {
                    validate_slot(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()?;
            GameSpec::new(validate_slot(&first)?)
        } else {
            GameSpec::default()
        };

        ctx.repository
            .create(&Game::new(id.clone(), spec))
            .with_context(|| format!("Failed to create game {id}"))?;
        ctx.converge(&id).await?;
        Ok(id)
    }
}

/// Fails when no pass moved the game, which would otherwise loop forever
fn ensure_advanced(id: &GameId, reports: &[ReconcileReport]) -> Result<()> {
    if reports.iter().any(ReconcileReport::is_advanced) {
        return Ok(());
    }
    let reason = match reports.last().map(|r| &r.outcome) {
        Some(PassOutcome::Done(ReconcileOutcome::Idle { reason })) => reason.to_string(),
        Some(PassOutcome::Done(ReconcileOutcome::NotFound)) => "game not found".to_string(),
        _ => "no move applied".to_string(),
    };
    bail!("Game {id} is stuck ({reason}); fix its move with `ttt move {id} <SLOT>`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttt_domain::IdleReason;

    fn report(outcome: ReconcileOutcome) -> ReconcileReport {
        ReconcileReport {
            id: GameId::new("g-001"),
            attempts: 1,
            outcome: PassOutcome::Done(outcome),
        }
    }

    #[test]
    fn test_idle_passes_are_stuck() {
        let id = GameId::new("g-001");
        let idle = report(ReconcileOutcome::Idle {
            reason: IdleReason::InvalidMove {
                input: "z9".to_string(),
            },
        });
        let err = ensure_advanced(&id, &[idle]).unwrap_err();
        assert!(err.to_string().contains("z9"));
        assert!(ensure_advanced(&id, &[]).is_err());
    }

    #[tokio::test]
    async fn test_invalid_stored_move_stops_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = AppContext::load(None, Some(dir.path().join("games.json")), false).unwrap();
        let id = GameId::new("g-stuck");
        // Bypasses CLI validation, as a hand-edited store would
        ctx.repository
            .create(&Game::new(id.clone(), GameSpec::new("z9")))
            .unwrap();

        let game = ctx.fetch(&id).unwrap();
        assert_ne!(game.status().turn, Some(Turn::Player));

        let reports = ctx.converge(&id).await.unwrap();
        assert!(ensure_advanced(&id, &reports).is_err());
        assert_eq!(ctx.fetch(&id).unwrap().status().turn, None);
    }
}
