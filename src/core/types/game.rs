//! Target software classification: variant, language, text speed, screen state

use serde::{Deserialize, Serialize};

/// Minor variant of the supported title pair.
///
/// The two variants share almost every offset, but the in-battle probe
/// differs in both address and expected value (see `offsets::battle_probe`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameVariant {
    Sword,
    Shield,
}

impl GameVariant {
    /// Classifies the active software identifier reported by the channel
    pub fn from_title_id(title_id: &str) -> Option<Self> {
        match title_id.to_ascii_uppercase().as_str() {
            crate::offsets::TITLE_ID_SWORD => Some(GameVariant::Sword),
            crate::offsets::TITLE_ID_SHIELD => Some(GameVariant::Shield),
            _ => None,
        }
    }
}

/// Console display language.
///
/// The raw screen-id layout is not language-stable for every detection case,
/// so the language-specific overworld flag lives at a per-language address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleLanguage {
    English,
    French,
    German,
    Spanish,
    Italian,
    Dutch,
    Portuguese,
    Russian,
    Japanese,
    ChineseSimplified,
    ChineseTraditional,
    Korean,
}

/// In-game message speed setting.
///
/// Automation requires `Fast`; anything slower desynchronizes the macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TextSpeed {
    Slow,
    Mid,
    Fast,
}

impl TextSpeed {
    /// Decodes the low two bits of the text-speed settings byte
    pub fn from_bits(byte: u8) -> Self {
        match byte & 3 {
            0 => TextSpeed::Slow,
            1 => TextSpeed::Mid,
            _ => TextSpeed::Fast,
        }
    }

    /// Encodes back into the low two bits of the settings byte
    pub fn to_bits(self) -> u8 {
        match self {
            TextSpeed::Slow => 0,
            TextSpeed::Mid => 1,
            TextSpeed::Fast => 2,
        }
    }
}

/// Classified UI context of the running software.
///
/// Derived, never stored: the screen can change between polls, so every
/// query performs a fresh remote read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Overworld,
    Battle,
    Box,
    Other(u32),
}

/// Selects how the overworld check reads the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMode {
    /// Match the 4-byte screen id against the known overworld magics
    #[default]
    Raw,
    /// Read the 1-byte per-language overworld flag
    ConsoleLanguage,
}
