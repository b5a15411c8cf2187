//! Embedding levels

use serde::Serialize;

use crate::class::BidiClass;

/// Embedding level (0-125, even=LTR, odd=RTL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Level(pub(crate) u8);

impl Level {
    /// Maximum explicit embedding depth
    pub const MAX: u8 = 125;

    /// LTR level 0
    pub const LTR: Level = Level(0);

    /// RTL level 1
    pub const RTL: Level = Level(1);

    /// Create new level
    pub fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX + 1 {
            Some(Level(level))
        } else {
            None
        }
    }

    /// Numeric value of the level
    pub fn number(self) -> u8 {
        self.0
    }

    /// Check if LTR
    pub fn is_ltr(self) -> bool {
        self.0 % 2 == 0
    }

    /// Check if RTL
    pub fn is_rtl(self) -> bool {
        self.0 % 2 == 1
    }

    /// Strong type matching the level's direction (the embedding direction)
    pub fn direction_class(self) -> BidiClass {
        if self.is_rtl() { BidiClass::R } else { BidiClass::L }
    }

    /// Least greater even level, if it does not exceed the depth limit
    pub fn next_ltr(self) -> Option<Self> {
        let next = (self.0 + 2) & !1;
        (next <= Self::MAX).then_some(Level(next))
    }

    /// Least greater odd level, if it does not exceed the depth limit
    pub fn next_rtl(self) -> Option<Self> {
        let next = (self.0 + 1) | 1;
        (next <= Self::MAX).then_some(Level(next))
    }

    /// Raise by `amount` levels (rules I1/I2 may go one past `MAX`)
    pub(crate) fn raise(self, amount: u8) -> Self {
        Level(self.0 + amount)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

/// Overall direction of a paragraph, line or run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
    /// Both even and odd levels are present
    Mixed,
}

impl Direction {
    /// Direction of a single level
    pub fn of_level(level: Level) -> Self {
        if level.is_rtl() { Direction::Rtl } else { Direction::Ltr }
    }

    /// Classify a level sequence; an empty sequence takes the paragraph level's direction.
    pub fn from_levels<I>(levels: I, para_level: Level) -> Self
    where
        I: IntoIterator<Item = Level>,
    {
        let mut has_ltr = false;
        let mut has_rtl = false;
        for level in levels {
            if level.is_rtl() {
                has_rtl = true;
            } else {
                has_ltr = true;
            }
            if has_ltr && has_rtl {
                return Direction::Mixed;
            }
        }
        match (has_ltr, has_rtl) {
            (true, false) => Direction::Ltr,
            (false, true) => Direction::Rtl,
            _ => Self::of_level(para_level),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
            Direction::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
