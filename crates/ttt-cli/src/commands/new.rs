//! ttt new command

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ttt_domain::{Game, GameId, GameRepository, GameSpec};

use super::validate_slot;
use crate::context::AppContext;
use crate::output::print_game;

#[derive(Debug, Args)]
pub struct NewCommand {
    /// Game id (random uuid if omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Open with this move; the computer opens without one
    #[arg(long = "move", value_name = "SLOT")]
    pub mv: Option<String>,
}

impl NewCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> Result<()> {
        let mv = self.mv.as_deref().map(validate_slot).transpose()?;
        let id = GameId::new(
            self.id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        );

        let game = Game::new(id.clone(), GameSpec::new(mv.unwrap_or_default()));
        ctx.repository
            .create(&game)
            .with_context(|| format!("Failed to create game {id}"))?;
        info!(game_id = %id, "game created");

        ctx.converge(&id).await?;
        print_game(&ctx.fetch(&id)?, ctx.json)
    }
}
