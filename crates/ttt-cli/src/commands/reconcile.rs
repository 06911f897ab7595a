//! ttt reconcile command

use anyhow::Result;
use clap::Args;

use ttt_adapter::controller::PassOutcome;
use ttt_domain::GameId;
use ttt_usecase::ReconcileOutcome;

use crate::context::AppContext;
use crate::output::{print_game, print_json};

#[derive(Debug, Args)]
pub struct ReconcileCommand {
    /// Game id
    pub id: String,
}

impl ReconcileCommand {
    pub async fn run(&self, ctx: &AppContext) -> Result<()> {
        let id = GameId::new(self.id.clone());
        let reports = ctx.converge(&id).await?;

        if matches!(
            reports.last().map(|r| &r.outcome),
            Some(PassOutcome::Done(ReconcileOutcome::NotFound))
        ) {
            if ctx.json {
                return print_json(&serde_json::json!({ "id": id.as_str(), "found": false }));
            }
            println!("Game {id} not found, nothing to do");
            return Ok(());
        }

        if !ctx.json {
            for report in &reports {
                if let PassOutcome::Done(ReconcileOutcome::Advanced { event, .. }) =
                    &report.outcome
                {
                    println!("{event}");
                }
            }
        }
        print_game(&ctx.fetch(&id)?, ctx.json)
    }
}
