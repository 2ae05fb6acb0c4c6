//! Session orchestration over one console
//!
//! A `DeviceExecutor` owns the channel to one console and hands out the
//! focused components (detector, codec, sequencer, guards) bound to it.
//! Session start runs the configuration-fatal checks: wrong title, corrupt
//! trainer data, or a slow text-speed setting stop the bot before any macro
//! runs, because every one of them needs an operator, not a retry.

use crate::boxes::BoxSlotCodec;
use crate::channel::DeviceChannel;
use crate::config::Config;
use crate::core::types::{
    Address, CreatureRecord, ExecutorError, ExecutorResult, GameVariant, TextSpeed,
    TrainerProfile,
};
use crate::detect::{DetectionSpec, ScreenStateDetector};
use crate::macros::UiMacroSequencer;
use crate::offsets;
use crate::softban::SoftBanGuard;
use crate::spin::{SpinCache, SpinTradeCorrector};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Per-session state established by `identify_trainer`.
///
/// Holds everything that is resolved once per session: the software variant,
/// the validated trainer profile, the detection parameters, and the
/// spin-coordinate cache. The cache lives here — per console session, not
/// process-wide — so concurrently driven consoles cannot poison each other.
#[derive(Debug)]
pub struct ExecutorSession {
    pub variant: GameVariant,
    pub trainer: TrainerProfile,
    pub spec: DetectionSpec,
    pub spin: SpinCache,
}

/// Automation executor bound to one console's debug channel
pub struct DeviceExecutor<C> {
    channel: C,
    config: Config,
}

impl<C: DeviceChannel> DeviceExecutor<C> {
    /// Creates an executor over a connected channel
    pub fn new(channel: C, config: Config) -> Self {
        DeviceExecutor { channel, config }
    }

    /// The underlying channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The deployment configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verifies the console is ready and identifies the session trainer.
    ///
    /// Checks, in order: the running title is a supported variant, the
    /// trainer block parses as valid save data, and the text speed is Fast.
    /// Each failure is configuration-fatal.
    pub async fn identify_trainer(&self) -> ExecutorResult<ExecutorSession> {
        let title = self.channel.title_id().await?;
        let variant =
            GameVariant::from_title_id(&title).ok_or(ExecutorError::WrongTitle(title))?;

        info!("grabbing trainer data of host console");
        let data = self
            .channel
            .read_bytes(offsets::TRAINER_DATA, offsets::TRAINER_DATA_LEN)
            .await?;
        let trainer = TrainerProfile::from_bytes(&data);
        if !trainer.is_valid() {
            return Err(ExecutorError::InvalidTrainerData);
        }

        let speed = self.text_speed().await?;
        if speed < TextSpeed::Fast {
            return Err(ExecutorError::TextSpeedTooSlow(speed));
        }

        info!(
            trainer = %trainer.name(),
            id = trainer.display_id(),
            ?variant,
            "session trainer identified"
        );
        Ok(ExecutorSession {
            spec: DetectionSpec::new(&self.config.console, variant),
            variant,
            trainer,
            spin: SpinCache::default(),
        })
    }

    /// Startup hygiene: detach any stale controller, optionally darken the
    /// screen for the deployment
    pub async fn initialize_hardware(&self) -> ExecutorResult<()> {
        info!("detaching on startup");
        self.channel.detach().await?;
        if self.config.console.screen_off {
            info!("turning off screen");
            self.channel.set_screen(false).await?;
        }
        Ok(())
    }

    /// Exit hygiene: restore the screen and detach the controller
    pub async fn clean_exit(&self) -> ExecutorResult<()> {
        if self.config.console.screen_off {
            info!("turning on screen");
            self.channel.set_screen(true).await?;
        }
        info!("detaching controller on routine exit");
        self.channel.detach().await?;
        Ok(())
    }

    /// Detector bound to this console and session
    pub fn detector(&self, session: &ExecutorSession) -> ScreenStateDetector<'_, C> {
        ScreenStateDetector::new(&self.channel, session.spec)
    }

    /// Macro sequencer bound to this console and session
    pub fn sequencer(&self, session: &ExecutorSession) -> UiMacroSequencer<'_, C> {
        UiMacroSequencer::new(&self.channel, session.spec, self.config.timings.clone())
    }

    /// Box storage codec bound to this console
    pub fn boxes(&self) -> BoxSlotCodec<'_, C> {
        BoxSlotCodec::new(&self.channel)
    }

    /// Soft-ban guard bound to this console
    pub fn soft_ban(&self) -> SoftBanGuard<'_, C> {
        SoftBanGuard::new(&self.channel)
    }

    /// Spin-trade corrector bound to this console
    pub fn spin(&self) -> SpinTradeCorrector<'_, C> {
        SpinTradeCorrector::new(&self.channel)
    }

    /// Current text-speed setting
    pub async fn text_speed(&self) -> ExecutorResult<TextSpeed> {
        let data = self.channel.read_bytes(offsets::TEXT_SPEED, 1).await?;
        Ok(TextSpeed::from_bits(data.first().copied().unwrap_or(0)))
    }

    /// Rewrites the text-speed setting, preserving the unrelated bits of
    /// the settings byte
    pub async fn set_text_speed(&self, speed: TextSpeed) -> ExecutorResult<()> {
        let data = self.channel.read_bytes(offsets::TEXT_SPEED, 1).await?;
        let byte = (data.first().copied().unwrap_or(0) & 0xFC) | speed.to_bits();
        self.channel.write_bytes(offsets::TEXT_SPEED, &[byte]).await?;
        Ok(())
    }

    /// True while the game reports an online-service connection
    pub async fn is_online(&self) -> ExecutorResult<bool> {
        let data = self.channel.read_bytes(offsets::ONLINE_CONNECTED, 1).await?;
        Ok(data.first().copied().unwrap_or(0) == 1)
    }

    /// Reconnects the online service if the connection flag dropped
    pub async fn ensure_online(
        &self,
        session: &ExecutorSession,
        token: &CancellationToken,
    ) -> ExecutorResult<()> {
        if !self.is_online().await? {
            info!("online service dropped, reconnecting");
            self.sequencer(session).reconnect_online(token).await?;
        }
        Ok(())
    }

    /// True when the bytes at `address` no longer equal `original`
    pub async fn read_is_changed(
        &self,
        address: Address,
        original: &[u8],
    ) -> ExecutorResult<bool> {
        let data = self.channel.read_bytes(address, original.len()).await?;
        Ok(data != original)
    }

    /// Record staged on the partner side of a surprise trade
    pub async fn read_surprise_trade_partner(&self) -> ExecutorResult<CreatureRecord> {
        let data = self
            .channel
            .read_bytes(offsets::SURPRISE_TRADE_PARTNER, offsets::SLOT_SIZE)
            .await?;
        Ok(CreatureRecord::from_bytes(&data))
    }
}
