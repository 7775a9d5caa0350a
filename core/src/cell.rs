use serde::{Deserialize, Serialize};

/// What a cell holds once the board is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    /// Number of mines among the (up to 8) surrounding cells.
    Count(u8),
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// Display category of a cell, the only thing a renderer needs to pick a fill.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellColor {
    Hidden,
    RevealedSafe,
    RevealedMine,
    Flagged,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    value: CellValue,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub const fn value(self) -> CellValue {
        self.value
    }

    pub const fn is_mine(self) -> bool {
        matches!(self.value, CellValue::Mine)
    }

    pub const fn count(self) -> Option<u8> {
        match self.value {
            CellValue::Mine => None,
            CellValue::Count(count) => Some(count),
        }
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Flag takes precedence over everything, then the revealed content.
    pub const fn color(self) -> CellColor {
        if self.flagged {
            return CellColor::Flagged;
        }

        match (self.revealed, self.value) {
            (false, _) => CellColor::Hidden,
            (true, CellValue::Mine) => CellColor::RevealedMine,
            (true, CellValue::Count(_)) => CellColor::RevealedSafe,
        }
    }

    /// Flips the flag. Does not look at `revealed`, the grid guards that.
    pub fn toggle_flag(&mut self) {
        self.flagged = !self.flagged;
    }

    pub(crate) fn set_value(&mut self, value: CellValue) {
        self.value = value;
    }

    pub(crate) fn mark_revealed(&mut self) {
        self.revealed = true;
    }
}
