//! Screen-state detection from live console memory
//!
//! Classifies the UI context of the running software by polling catalog
//! addresses. Detection has no side effects and no caching: the screen can
//! change between polls, so every query performs a fresh remote read.

use crate::channel::DeviceChannel;
use crate::config::ConsoleConfig;
use crate::core::types::{
    Address, ChannelError, ConsoleLanguage, DetectionMode, ExecutorResult, GameVariant,
    ScreenState,
};
use crate::offsets::{self, BattleProbe};

/// Detection parameters resolved once at session start.
///
/// The battle probe is variant-keyed and the overworld flag language-keyed;
/// resolving both here keeps magic-value branching out of the read paths.
#[derive(Debug, Clone, Copy)]
pub struct DetectionSpec {
    pub mode: DetectionMode,
    pub language: ConsoleLanguage,
    pub battle: BattleProbe,
}

impl DetectionSpec {
    /// Builds the spec for the active software variant and console settings
    pub fn new(console: &ConsoleConfig, variant: GameVariant) -> Self {
        DetectionSpec {
            mode: console.screen_detection,
            language: console.language,
            battle: offsets::battle_probe(variant),
        }
    }
}

/// Polls catalog addresses to classify the console's current UI state
pub struct ScreenStateDetector<'a, C> {
    channel: &'a C,
    spec: DetectionSpec,
}

impl<'a, C: DeviceChannel> ScreenStateDetector<'a, C> {
    /// Creates a detector over a channel with resolved detection parameters
    pub fn new(channel: &'a C, spec: DetectionSpec) -> Self {
        ScreenStateDetector { channel, spec }
    }

    async fn read_u8(&self, address: Address) -> ExecutorResult<u8> {
        let data = self.channel.read_bytes(address, 1).await?;
        data.first()
            .copied()
            .ok_or_else(|| ChannelError::short_read(address, 1, 0).into())
    }

    async fn read_u32(&self, address: Address) -> ExecutorResult<u32> {
        let data = self.channel.read_bytes(address, 4).await?;
        let bytes: [u8; 4] = data
            .as_slice()
            .try_into()
            .map_err(|_| ChannelError::short_read(address, 4, data.len()))?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Raw 4-byte screen id of the current UI state
    pub async fn current_screen(&self) -> ExecutorResult<u32> {
        self.read_u32(offsets::CURRENT_SCREEN).await
    }

    /// True while the avatar is on the overworld.
    ///
    /// Raw mode matches the screen id against the two known overworld magics
    /// (the value differs by transition direction). Console-language mode
    /// reads the per-language flag byte instead; the raw id layout is not
    /// language-stable for that case.
    pub async fn is_overworld(&self) -> ExecutorResult<bool> {
        match self.spec.mode {
            DetectionMode::Raw => {
                let screen = self.current_screen().await?;
                Ok(screen == offsets::SCREEN_OVERWORLD_FADE
                    || screen == offsets::SCREEN_OVERWORLD_MENU)
            }
            DetectionMode::ConsoleLanguage => {
                let flag = self.read_u8(offsets::overworld_flag(self.spec.language)).await?;
                Ok(flag == 1)
            }
        }
    }

    /// True while a battle is running
    pub async fn is_in_battle(&self) -> ExecutorResult<bool> {
        let flag = self.read_u8(self.spec.battle.address).await?;
        Ok(flag == self.spec.battle.match_value)
    }

    /// True while box storage is open
    pub async fn is_in_box(&self) -> ExecutorResult<bool> {
        let screen = self.current_screen().await?;
        Ok(screen == offsets::SCREEN_BOX_VIEW || screen == offsets::SCREEN_BOX_HOLDING)
    }

    /// True when the game is interactive at all (overworld or battle).
    /// The launch macro polls this to decide the title finished loading.
    pub async fn in_game(&self) -> ExecutorResult<bool> {
        Ok(self.is_overworld().await? || self.is_in_battle().await?)
    }

    /// Full classification of the current screen
    pub async fn screen_state(&self) -> ExecutorResult<ScreenState> {
        if self.is_in_battle().await? {
            return Ok(ScreenState::Battle);
        }
        if self.is_overworld().await? {
            return Ok(ScreenState::Overworld);
        }
        let screen = self.current_screen().await?;
        if screen == offsets::SCREEN_BOX_VIEW || screen == offsets::SCREEN_BOX_HOLDING {
            return Ok(ScreenState::Box);
        }
        Ok(ScreenState::Other(screen))
    }
}
