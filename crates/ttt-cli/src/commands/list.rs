//! ttt list command

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use ttt_domain::GameRepository;

use crate::context::AppContext;
use crate::output::{print_json, summary, GameView};

#[derive(Debug, Args)]
pub struct ListCommand {}

impl ListCommand {
    pub fn run(&self, ctx: &AppContext) -> Result<()> {
        let ids = ctx.repository.list_ids().context("Failed to list games")?;
        let games = ids
            .iter()
            .map(|id| ctx.fetch(id))
            .collect::<Result<Vec<_>>>()?;

        if ctx.json {
            let views: Vec<GameView> = games.iter().map(GameView::from).collect();
            return print_json(&views);
        }
        if games.is_empty() {
            println!("No games in {}", ctx.repository.path().display());
            return Ok(());
        }
        for game in &games {
            println!(
                "{} {:>2} moves  {}",
                style(format!("{:<38}", game.id())).cyan(),
                game.status().move_history.len(),
                summary(game)
            );
        }
        Ok(())
    }
}
