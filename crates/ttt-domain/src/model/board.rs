//! Board - Sparse slot to symbol store
//!
//! Only occupied slots are stored. Setting a slot to `Symbol::Empty`
//! removes its entry, so a board never carries explicit empties.
//!
//! The board's only persisted form is the rendered table below. The
//! reader extracts each cell at a fixed character offset and then checks
//! that the text is exactly what the writer would have produced.
//!
//! ```text
//!    A     B     C
//!       |     |
//! 1  X  |  O  |
//!  _____|_____|_____
//!       |     |
//! 2     |  X  |
//!  _____|_____|_____
//!       |     |
//! 3     |     |  O
//!       |     |
//! ```

use std::collections::BTreeMap;

use super::slot::{Column, Row, Slot};
use super::symbol::Symbol;

const HEADER: &str = "   A     B     C  ";
const SPACER: &str = "      |     |     ";
const DIVIDER: &str = " _____|_____|_____";

/// Lines produced by `split('\n')`, including the empty tail after the final newline
const TABLE_LINES: usize = 11;

/// Line index of each row's cells
const ROW_LINES: [(Row, usize); 3] = [(Row::One, 2), (Row::Two, 5), (Row::Three, 8)];

/// Character offset of each column's cell within a row line
const COLUMN_OFFSETS: [(Column, usize); 3] = [(Column::A, 3), (Column::B, 9), (Column::C, 15)];

/// Board state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    slots: BTreeMap<Slot, Symbol>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a persisted table; the empty string is a new game
    pub fn from_table(table: &str) -> Result<Self, BoardParseError> {
        if table.is_empty() {
            Ok(Self::new())
        } else {
            table.parse()
        }
    }

    pub fn get(&self, slot: Slot) -> Symbol {
        self.slots.get(&slot).copied().unwrap_or(Symbol::Empty)
    }

    pub fn set(&mut self, slot: Slot, symbol: Symbol) {
        if symbol.is_empty() {
            self.slots.remove(&slot);
        } else {
            self.slots.insert(slot, symbol);
        }
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == Slot::ALL.len()
    }

    /// Empty slots in canonical order
    pub fn empty_slots(&self) -> Vec<Slot> {
        Slot::ALL
            .iter()
            .copied()
            .filter(|slot| self.get(*slot).is_empty())
            .collect()
    }

    /// `(x_count, o_count)`
    pub fn counts(&self) -> (usize, usize) {
        self.slots.values().fold((0, 0), |(x, o), symbol| match symbol {
            Symbol::X => (x + 1, o),
            Symbol::O => (x, o + 1),
            Symbol::Empty => (x, o),
        })
    }

    /// Symbol to be played next, derived from board parity
    ///
    /// X counts +1 and O counts -1; a zero balance means X plays.
    /// X therefore always opens, whoever moves first.
    pub fn current_symbol(&self) -> Symbol {
        let (x, o) = self.counts();
        if x == o {
            Symbol::X
        } else {
            Symbol::O
        }
    }

    /// Canonical table text
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    fn render_row(&self, row: Row) -> String {
        let cells: Vec<String> = Column::ALL
            .iter()
            .map(|column| format!("  {}  ", self.get(Slot::new(*column, row))))
            .collect();
        format!("{}{}", row.as_char(), cells.join("|"))
    }
}

impl core::fmt::Display for Board {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{}", HEADER)?;
        for row in Row::ALL {
            writeln!(f, "{}", SPACER)?;
            writeln!(f, "{}", self.render_row(row))?;
            if row == Row::Three {
                writeln!(f, "{}", SPACER)?;
            } else {
                writeln!(f, "{}", DIVIDER)?;
            }
        }
        Ok(())
    }
}

impl core::str::FromStr for Board {
    type Err = BoardParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() != TABLE_LINES {
            return Err(BoardParseError::LineCount {
                expected: TABLE_LINES,
                found: lines.len(),
            });
        }

        let mut board = Board::new();
        for (row, index) in ROW_LINES {
            let line = lines[index].as_bytes();
            for (column, offset) in COLUMN_OFFSETS {
                let slot = Slot::new(column, row);
                let found = *line
                    .get(offset)
                    .ok_or(BoardParseError::MalformedLine { line: index })?;
                let symbol = Symbol::from_char(found as char).ok_or(
                    BoardParseError::InvalidSymbol {
                        slot,
                        found: found as char,
                    },
                )?;
                board.set(slot, symbol);
            }
        }

        // Everything outside the cells must match the canonical layout
        let rendered = board.to_string();
        if let Some(line) = rendered
            .split('\n')
            .zip(lines.iter())
            .position(|(expected, found)| expected != *found)
        {
            return Err(BoardParseError::MalformedLine { line });
        }

        Ok(board)
    }
}

/// Errors when reading a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardParseError {
    LineCount { expected: usize, found: usize },
    /// A line differs from the canonical layout (0-based index)
    MalformedLine { line: usize },
    InvalidSymbol { slot: Slot, found: char },
}

impl core::fmt::Display for BoardParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardParseError::LineCount { expected, found } => {
                write!(f, "Table has {} lines, expected {}", found, expected)
            }
            BoardParseError::MalformedLine { line } => {
                write!(f, "Table line {} does not match the board layout", line + 1)
            }
            BoardParseError::InvalidSymbol { slot, found } => {
                write!(f, "Invalid symbol '{}' in slot {}", found, slot)
            }
        }
    }
}

impl std::error::Error for BoardParseError {}
