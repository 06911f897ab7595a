//! Symbol and Move - The marks placed on the board

use super::slot::Slot;

/// A mark in a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    X,
    O,
    #[default]
    Empty,
}

impl Symbol {
    /// Single character used in the rendered table
    pub fn as_char(&self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
            Symbol::Empty => ' ',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Symbol::X),
            'O' => Some(Symbol::O),
            ' ' => Some(Symbol::Empty),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Symbol::Empty)
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One placed mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub symbol: Symbol,
    pub slot: Slot,
}

impl Move {
    pub fn new(symbol: Symbol, slot: Slot) -> Self {
        Self { symbol, slot }
    }
}

/// Canonical history form, e.g. `A1 - X`
impl core::fmt::Display for Move {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} - {}", self.slot, self.symbol)
    }
}
