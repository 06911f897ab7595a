//! ttt show command

use anyhow::Result;
use clap::Args;

use ttt_domain::GameId;

use crate::context::AppContext;
use crate::output::print_game;

#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Game id
    pub id: String,
}

impl ShowCommand {
    pub fn run(&self, ctx: &AppContext) -> Result<()> {
        let game = ctx.fetch(&GameId::new(self.id.clone()))?;
        print_game(&game, ctx.json)
    }
}
