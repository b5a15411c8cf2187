//! Bidirectional character types
//!
//! Classification uses the Unicode Character Database Bidi_Class table
//! bundled with `unicode-bidi`.

use unicode_bidi::BidiClass as UcdClass;
use unicode_bidi::format_chars::{ALM, FSI, LRE, LRI, LRM, LRO, PDF, PDI, RLE, RLI, RLM, RLO};

/// Bidirectional character type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidiClass {
    // Strong types
    /// Left-to-Right
    L,
    /// Right-to-Left
    R,
    /// Arabic Letter
    AL,

    // Weak types
    /// European Number
    EN,
    /// European Number Separator
    ES,
    /// European Number Terminator
    ET,
    /// Arabic Number
    AN,
    /// Common Number Separator
    CS,
    /// Nonspacing Mark
    NSM,
    /// Boundary Neutral
    BN,

    // Neutral types
    /// Paragraph Separator
    B,
    /// Segment Separator
    S,
    /// Whitespace
    WS,
    /// Other Neutrals
    ON,

    // Explicit formatting
    /// Left-to-Right Embedding
    LRE,
    /// Left-to-Right Override
    LRO,
    /// Right-to-Left Embedding
    RLE,
    /// Right-to-Left Override
    RLO,
    /// Pop Directional Format
    PDF,
    /// Left-to-Right Isolate
    LRI,
    /// Right-to-Left Isolate
    RLI,
    /// First Strong Isolate
    FSI,
    /// Pop Directional Isolate
    PDI,
}

impl BidiClass {
    /// Get bidi class for a character
    pub fn of(c: char) -> Self {
        match unicode_bidi::bidi_class(c) {
            UcdClass::L => BidiClass::L,
            UcdClass::R => BidiClass::R,
            UcdClass::AL => BidiClass::AL,
            UcdClass::EN => BidiClass::EN,
            UcdClass::ES => BidiClass::ES,
            UcdClass::ET => BidiClass::ET,
            UcdClass::AN => BidiClass::AN,
            UcdClass::CS => BidiClass::CS,
            UcdClass::NSM => BidiClass::NSM,
            UcdClass::BN => BidiClass::BN,
            UcdClass::B => BidiClass::B,
            UcdClass::S => BidiClass::S,
            UcdClass::WS => BidiClass::WS,
            UcdClass::ON => BidiClass::ON,
            UcdClass::LRE => BidiClass::LRE,
            UcdClass::LRO => BidiClass::LRO,
            UcdClass::RLE => BidiClass::RLE,
            UcdClass::RLO => BidiClass::RLO,
            UcdClass::PDF => BidiClass::PDF,
            UcdClass::LRI => BidiClass::LRI,
            UcdClass::RLI => BidiClass::RLI,
            UcdClass::FSI => BidiClass::FSI,
            UcdClass::PDI => BidiClass::PDI,
        }
    }

    /// Check if this is a strong type
    pub fn is_strong(self) -> bool {
        matches!(self, BidiClass::L | BidiClass::R | BidiClass::AL)
    }

    /// Check if this is an explicit formatting character
    pub fn is_explicit(self) -> bool {
        matches!(
            self,
            BidiClass::LRE
                | BidiClass::RLE
                | BidiClass::LRO
                | BidiClass::RLO
                | BidiClass::PDF
                | BidiClass::LRI
                | BidiClass::RLI
                | BidiClass::FSI
                | BidiClass::PDI
        )
    }

    /// Isolate initiators (LRI, RLI, FSI)
    pub fn is_isolate_initiator(self) -> bool {
        matches!(self, BidiClass::LRI | BidiClass::RLI | BidiClass::FSI)
    }

    /// Characters rule X9 removes from implicit processing
    pub fn is_removed_by_x9(self) -> bool {
        matches!(
            self,
            BidiClass::LRE
                | BidiClass::RLE
                | BidiClass::LRO
                | BidiClass::RLO
                | BidiClass::PDF
                | BidiClass::BN
        )
    }

    /// Neutral and isolate types resolved by N1/N2
    pub fn is_neutral_or_isolate(self) -> bool {
        matches!(
            self,
            BidiClass::B
                | BidiClass::S
                | BidiClass::WS
                | BidiClass::ON
                | BidiClass::LRI
                | BidiClass::RLI
                | BidiClass::FSI
                | BidiClass::PDI
        )
    }

    /// Characters whose level rule L1 resets when they trail a line
    pub fn is_trailing_whitespace(self) -> bool {
        matches!(
            self,
            BidiClass::WS
                | BidiClass::LRI
                | BidiClass::RLI
                | BidiClass::FSI
                | BidiClass::PDI
        ) || self.is_removed_by_x9()
    }

    /// Direction used by N0-N2, where numbers count as R
    pub fn strong_direction(self) -> Option<BidiClass> {
        match self {
            BidiClass::L => Some(BidiClass::L),
            BidiClass::R | BidiClass::AL | BidiClass::EN | BidiClass::AN => Some(BidiClass::R),
            _ => None,
        }
    }
}

/// Implicit directional marks and explicit controls.
///
/// These are the characters dropped by `ReorderOptions::remove_bidi_controls`.
pub fn is_bidi_control(c: char) -> bool {
    matches!(
        c,
        ALM | LRM | RLM | LRE | RLE | PDF | LRO | RLO | LRI | RLI | FSI | PDI
    )
}
