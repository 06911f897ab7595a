//! Endgame Evaluator - Win and stalemate detection

use crate::model::board::Board;
use crate::model::slot::{Column, Row, Slot};
use crate::model::symbol::Symbol;

const fn s(column: Column, row: Row) -> Slot {
    Slot::new(column, row)
}

/// Winning triples in evaluation order: columns, rows, then diagonals
pub const LINES: [[Slot; 3]; 8] = [
    [s(Column::A, Row::One), s(Column::A, Row::Two), s(Column::A, Row::Three)],
    [s(Column::B, Row::One), s(Column::B, Row::Two), s(Column::B, Row::Three)],
    [s(Column::C, Row::One), s(Column::C, Row::Two), s(Column::C, Row::Three)],
    [s(Column::A, Row::One), s(Column::B, Row::One), s(Column::C, Row::One)],
    [s(Column::A, Row::Two), s(Column::B, Row::Two), s(Column::C, Row::Two)],
    [s(Column::A, Row::Three), s(Column::B, Row::Three), s(Column::C, Row::Three)],
    [s(Column::A, Row::One), s(Column::B, Row::Two), s(Column::C, Row::Three)],
    [s(Column::A, Row::Three), s(Column::B, Row::Two), s(Column::C, Row::One)],
];

/// Result of evaluating a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Endgame {
    pub win: bool,
    pub stalemate: bool,
    /// First completed line, if any
    pub line: Option<[Slot; 3]>,
}

impl Endgame {
    pub fn is_over(&self) -> bool {
        self.win || self.stalemate
    }
}

/// Check the eight lines, then a full board
pub fn evaluate(board: &Board) -> Endgame {
    for line in LINES {
        let symbol = board.get(line[0]);
        if symbol == Symbol::Empty {
            continue;
        }
        if line[1..].iter().all(|slot| board.get(*slot) == symbol) {
            return Endgame {
                win: true,
                stalemate: false,
                line: Some(line),
            };
        }
    }

    Endgame {
        win: false,
        stalemate: board.is_full(),
        line: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_of(x: &[&str], o: &[&str]) -> Board {
        let mut board = Board::new();
        for slot in x {
            board.set(slot.parse().unwrap(), Symbol::X);
        }
        for slot in o {
            board.set(slot.parse().unwrap(), Symbol::O);
        }
        board
    }

    #[test]
    fn test_empty_board_continues() {
        assert_eq!(evaluate(&Board::new()), Endgame::default());
    }

    #[test]
    fn test_every_line_wins_for_either_symbol() {
        for line in LINES {
            for symbol in [Symbol::X, Symbol::O] {
                let mut board = Board::new();
                for slot in line {
                    board.set(slot, symbol);
                }
                let result = evaluate(&board);
                assert!(result.win, "line {:?} should win", line);
                assert!(!result.stalemate);
                assert_eq!(result.line, Some(line));
            }
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_of(&["A1", "A2"], &["A3"]);
        assert!(!evaluate(&board).win);
    }

    #[test]
    fn test_first_line_in_order_is_reported() {
        // Column A and row 1 both complete
        let board = board_of(&["A1", "A2", "A3", "B1", "C1"], &[]);
        let result = evaluate(&board);
        assert_eq!(result.line, Some(LINES[0]));
    }

    #[test]
    fn test_full_board_without_line_is_stalemate() {
        // X O X
        // X O O
        // O X X
        let board = board_of(
            &["A1", "C1", "A2", "B3", "C3"],
            &["B1", "B2", "C2", "A3"],
        );
        let result = evaluate(&board);
        assert!(!result.win);
        assert!(result.stalemate);
        assert!(result.is_over());
    }

    #[test]
    fn test_full_board_with_line_is_win() {
        // X X X
        // O O X
        // X O O
        let board = board_of(
            &["A1", "B1", "C1", "C2", "A3"],
            &["A2", "B2", "B3", "C3"],
        );
        let result = evaluate(&board);
        assert!(result.win);
        assert!(!result.stalemate);
    }

    #[test]
    fn test_partial_board_continues() {
        let board = board_of(&["A1", "C3"], &["B2"]);
        assert!(!evaluate(&board).is_over());
    }
}
