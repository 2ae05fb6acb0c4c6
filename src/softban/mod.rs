//! Soft-ban detection and recovery
//!
//! The game records a temporary trade penalty as a Unix timestamp; zero
//! (the epoch) means not banned. Clearing the flag alone is not enough —
//! the penalty is tied to process state, so recovery restarts the game and
//! then zeroes the timestamp.

use crate::channel::DeviceChannel;
use crate::core::types::ExecutorResult;
use crate::macros::UiMacroSequencer;
use crate::offsets;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Detects and clears the transient trade penalty
pub struct SoftBanGuard<'a, C> {
    channel: &'a C,
}

impl<'a, C: DeviceChannel> SoftBanGuard<'a, C> {
    /// Creates a guard over a channel
    pub fn new(channel: &'a C) -> Self {
        SoftBanGuard { channel }
    }

    /// True when the penalty timestamp is set.
    /// A low byte of 1 is boundary noise from the timestamp write, not a ban.
    pub async fn is_soft_banned(&self) -> ExecutorResult<bool> {
        let data = self.channel.read_bytes(offsets::SOFT_BAN_TIMESTAMP, 1).await?;
        Ok(data.first().copied().unwrap_or(0) > 1)
    }

    /// Writes the timestamp back to the epoch
    pub async fn clear_ban(&self) -> ExecutorResult<()> {
        info!("soft ban detected, resetting the penalty timestamp");
        self.channel
            .write_bytes(offsets::SOFT_BAN_TIMESTAMP, &0u32.to_le_bytes())
            .await?;
        Ok(())
    }

    /// Full recovery: restart the game, then clear the timestamp.
    /// The restart is what actually lifts the penalty; the cleared flag
    /// keeps the game from re-reading a stale value afterwards.
    pub async fn recover(
        &self,
        sequencer: &UiMacroSequencer<'a, C>,
        token: &CancellationToken,
    ) -> ExecutorResult<()> {
        info!("potential soft ban, restarting the game");
        sequencer.close_game(token).await?;
        sequencer.start_game(token).await?;
        self.clear_ban().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MockChannel;
    use crate::core::types::Address;

    #[tokio::test]
    async fn test_ban_threshold() {
        let channel = MockChannel::new();
        let guard = SoftBanGuard::new(&channel);

        for (byte, banned) in [(0u8, false), (1, false), (2, true), (255, true)] {
            channel.load(offsets::SOFT_BAN_TIMESTAMP, &[byte]);
            assert_eq!(guard.is_soft_banned().await.unwrap(), banned, "byte {byte}");
        }
    }

    #[tokio::test]
    async fn test_clear_writes_full_timestamp() {
        let channel = MockChannel::new();
        channel.load(offsets::SOFT_BAN_TIMESTAMP, &[0xAA, 0xBB, 0xCC, 0xDD]);

        SoftBanGuard::new(&channel).clear_ban().await.unwrap();
        assert_eq!(
            channel.memory(offsets::SOFT_BAN_TIMESTAMP, 4),
            vec![0, 0, 0, 0]
        );
        // Neighboring memory is untouched.
        assert_eq!(
            channel.memory(Address::new(offsets::SOFT_BAN_TIMESTAMP.as_u64() + 4), 1),
            vec![0]
        );
    }
}
