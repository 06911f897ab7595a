//! Printing games

use anyhow::Result;
use console::style;
use serde::Serialize;

use ttt_adapter::repository::record::{SpecRecord, StatusRecord};
use ttt_domain::{Board, Game, Winner};

/// `--json` view of one game
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: String,
    pub version: u64,
    pub spec: SpecRecord,
    pub status: StatusRecord,
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id().to_string(),
            version: game.version(),
            spec: game.spec().into(),
            status: game.status().into(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_game(game: &Game, json: bool) -> Result<()> {
    if json {
        return print_json(&GameView::from(game));
    }

    let status = game.status();
    let board = Board::from_table(&status.table)?;
    println!("{} {}", style("Game").bold(), style(game.id()).cyan());
    print!("{board}");
    println!("{}", summary(game));
    if let Some(last) = status.move_history.last() {
        println!("Last move: {last}  ({} total)", status.move_history.len());
    }
    Ok(())
}

/// One-line state of a game
pub fn summary(game: &Game) -> String {
    let status = game.status();
    match status.winner {
        Winner::X | Winner::O => style(format!("{} wins", status.winner))
            .green()
            .bold()
            .to_string(),
        Winner::Draw => style("Draw").yellow().bold().to_string(),
        Winner::None => match status.turn {
            Some(turn) => format!("{} to move", style(turn).bold()),
            None => "Not started".to_string(),
        },
    }
}
