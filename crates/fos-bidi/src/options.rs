//! Paragraph and output configuration
//!
//! Options are plain values passed at construction time. They can also be
//! deserialized from the JSON objects a host binding receives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::level::Level;
use crate::{BidiError, Result};

/// ICU value of `UBIDI_DEFAULT_LTR`
pub const DEFAULT_LTR: u8 = 0xFE;
/// ICU value of `UBIDI_DEFAULT_RTL`
pub const DEFAULT_RTL: u8 = 0xFF;

/// Requested paragraph level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "ParaLevelRepr", into = "u8")]
pub enum ParaLevel {
    /// Detect from the first strong character, falling back to LTR
    #[default]
    DefaultLtr,
    /// Detect from the first strong character, falling back to RTL
    DefaultRtl,
    /// Force level 0
    Ltr,
    /// Force level 1
    Rtl,
}

impl ParaLevel {
    /// Level forced by this setting, or `None` when it must be detected
    pub fn explicit(self) -> Option<Level> {
        match self {
            ParaLevel::Ltr => Some(Level::LTR),
            ParaLevel::Rtl => Some(Level::RTL),
            ParaLevel::DefaultLtr | ParaLevel::DefaultRtl => None,
        }
    }

    /// Level used when detection finds no strong character
    pub fn fallback(self) -> Level {
        match self {
            ParaLevel::DefaultRtl | ParaLevel::Rtl => Level::RTL,
            ParaLevel::DefaultLtr | ParaLevel::Ltr => Level::LTR,
        }
    }

    pub fn is_default(self) -> bool {
        self.explicit().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParaLevel::DefaultLtr => "default-ltr",
            ParaLevel::DefaultRtl => "default-rtl",
            ParaLevel::Ltr => "ltr",
            ParaLevel::Rtl => "rtl",
        }
    }
}

impl fmt::Display for ParaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for ParaLevel {
    type Error = BidiError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ParaLevel::Ltr),
            1 => Ok(ParaLevel::Rtl),
            DEFAULT_LTR => Ok(ParaLevel::DefaultLtr),
            DEFAULT_RTL => Ok(ParaLevel::DefaultRtl),
            other => Err(BidiError::Validation(format!(
                "unrecognized paragraph level {other:#x}"
            ))),
        }
    }
}

impl From<ParaLevel> for u8 {
    fn from(level: ParaLevel) -> u8 {
        match level {
            ParaLevel::Ltr => 0,
            ParaLevel::Rtl => 1,
            ParaLevel::DefaultLtr => DEFAULT_LTR,
            ParaLevel::DefaultRtl => DEFAULT_RTL,
        }
    }
}

impl FromStr for ParaLevel {
    type Err = BidiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "ltr" => Ok(ParaLevel::Ltr),
            "rtl" => Ok(ParaLevel::Rtl),
            "default-ltr" => Ok(ParaLevel::DefaultLtr),
            "default-rtl" => Ok(ParaLevel::DefaultRtl),
            _ => Err(BidiError::Validation(format!(
                "unrecognized paragraph level {s:?}"
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParaLevelRepr {
    Number(u8),
    Name(String),
}

impl TryFrom<ParaLevelRepr> for ParaLevel {
    type Error = BidiError;

    fn try_from(repr: ParaLevelRepr) -> Result<Self> {
        match repr {
            ParaLevelRepr::Number(n) => ParaLevel::try_from(n),
            ParaLevelRepr::Name(name) => name.parse(),
        }
    }
}

/// Options for constructing a `Paragraph`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ParagraphOptions {
    pub para_level: ParaLevel,
    /// Text logically preceding the paragraph
    pub prologue: Option<String>,
    /// Text logically following the paragraph
    pub epilogue: Option<String>,
}

impl ParagraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object such as `{"paraLevel": "default-rtl"}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BidiError::Validation(e.to_string()))
    }

    pub fn with_para_level(mut self, para_level: ParaLevel) -> Self {
        self.para_level = para_level;
        self
    }

    pub fn with_prologue(mut self, prologue: impl Into<String>) -> Self {
        self.prologue = Some(prologue.into());
        self
    }

    pub fn with_epilogue(mut self, epilogue: impl Into<String>) -> Self {
        self.epilogue = Some(epilogue.into());
        self
    }
}

/// Options for `write_reordered`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ReorderOptions {
    /// Replace characters at RTL levels by their mirror glyph (L4)
    pub mirroring: bool,
    /// Drop LRM, RLM, ALM and explicit embedding/isolate controls
    pub remove_bidi_controls: bool,
    /// Write the visual result from right to left
    pub output_reverse: bool,
}

impl ReorderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BidiError::Validation(e.to_string()))
    }

    pub fn with_mirroring(mut self, mirroring: bool) -> Self {
        self.mirroring = mirroring;
        self
    }

    pub fn with_remove_bidi_controls(mut self, remove: bool) -> Self {
        self.remove_bidi_controls = remove;
        self
    }

    pub fn with_output_reverse(mut self, reverse: bool) -> Self {
        self.output_reverse = reverse;
        self
    }
}
