//! ttt move command

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;

use ttt_domain::{GameId, GameRepository, GameSpec};

use super::{rejected_move, validate_slot};
use crate::context::AppContext;
use crate::output::print_game;

#[derive(Debug, Args)]
pub struct MoveCommand {
    /// Game id
    pub id: String,

    /// Slot to play, e.g. b2
    pub slot: String,
}

impl MoveCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> Result<()> {
        let slot = validate_slot(&self.slot)?;
        let id = GameId::new(self.id.clone());

        let game = ctx.fetch(&id)?;
        if game.status().is_terminal() {
            bail!("Game {id} is over ({})", game.status().winner);
        }

        ctx.repository
            .update_spec(&id, &GameSpec::new(slot))
            .with_context(|| format!("Failed to request move for game {id}"))?;

        let reports = ctx.converge(&id).await?;
        if let Some(reason) = rejected_move(&reports) {
            eprintln!("{} {reason}", style("Move not played:").yellow());
        }
        print_game(&ctx.fetch(&id)?, ctx.json)
    }
}
