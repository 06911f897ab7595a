//! Slot - One of the nine positions on the board
//!
//! A Slot is a Value Object addressed by column (A-C) and row (1-3).

/// Board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    A,
    B,
    C,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::A, Column::B, Column::C];

    pub fn as_char(&self) -> char {
        match self {
            Column::A => 'A',
            Column::B => 'B',
            Column::C => 'C',
        }
    }

    /// Parse a column letter, ignoring case
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Column::A),
            'B' => Some(Column::B),
            'C' => Some(Column::C),
            _ => None,
        }
    }
}

/// Board row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Row {
    One,
    Two,
    Three,
}

impl Row {
    pub const ALL: [Row; 3] = [Row::One, Row::Two, Row::Three];

    pub fn as_char(&self) -> char {
        match self {
            Row::One => '1',
            Row::Two => '2',
            Row::Three => '3',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Row::One),
            '2' => Some(Row::Two),
            '3' => Some(Row::Three),
            _ => None,
        }
    }
}

/// A position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub column: Column,
    pub row: Row,
}

impl Slot {
    /// All nine slots in canonical order (A1, A2, A3, B1, ... C3)
    pub const ALL: [Slot; 9] = [
        Slot::new(Column::A, Row::One),
        Slot::new(Column::A, Row::Two),
        Slot::new(Column::A, Row::Three),
        Slot::new(Column::B, Row::One),
        Slot::new(Column::B, Row::Two),
        Slot::new(Column::B, Row::Three),
        Slot::new(Column::C, Row::One),
        Slot::new(Column::C, Row::Two),
        Slot::new(Column::C, Row::Three),
    ];

    pub const fn new(column: Column, row: Row) -> Self {
        Self { column, row }
    }
}

impl core::fmt::Display for Slot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.column.as_char(), self.row.as_char())
    }
}

impl core::str::FromStr for Slot {
    type Err = SlotParseError;

    /// Accepts exactly `[a-cA-C][1-3]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(c), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SlotParseError::InvalidLength {
                input: s.to_string(),
            });
        };

        let column = Column::from_char(c).ok_or(SlotParseError::InvalidColumn { found: c })?;
        let row = Row::from_char(r).ok_or(SlotParseError::InvalidRow { found: r })?;
        Ok(Slot::new(column, row))
    }
}

/// Errors when reading a slot from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotParseError {
    /// Input is not exactly two characters
    InvalidLength { input: String },
    InvalidColumn { found: char },
    InvalidRow { found: char },
}

impl core::fmt::Display for SlotParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SlotParseError::InvalidLength { input } => {
                write!(f, "Slot must be a column letter and a row digit, got '{}'", input)
            }
            SlotParseError::InvalidColumn { found } => {
                write!(f, "Invalid column '{}', expected A, B or C", found)
            }
            SlotParseError::InvalidRow { found } => {
                write!(f, "Invalid row '{}', expected 1, 2 or 3", found)
            }
        }
    }
}

impl std::error::Error for SlotParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let names: Vec<String> = Slot::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["A1", "A2", "A3", "B1", "B2", "B3", "C1", "C2", "C3"]
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("a1".parse::<Slot>().unwrap(), Slot::new(Column::A, Row::One));
        assert_eq!("C3".parse::<Slot>().unwrap(), Slot::new(Column::C, Row::Three));
        assert_eq!("b2".parse::<Slot>().unwrap(), Slot::new(Column::B, Row::Two));
    }

    #[test]
    fn test_parse_rejects_out_of_pattern() {
        assert!(matches!(
            "".parse::<Slot>(),
            Err(SlotParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            "a12".parse::<Slot>(),
            Err(SlotParseError::InvalidLength { .. })
        ));
        assert_eq!(
            "d1".parse::<Slot>(),
            Err(SlotParseError::InvalidColumn { found: 'd' })
        );
        assert_eq!(
            "a4".parse::<Slot>(),
            Err(SlotParseError::InvalidRow { found: '4' })
        );
        // Multi-byte input must not panic on slicing
        assert!("é1".parse::<Slot>().is_err());
    }
}
