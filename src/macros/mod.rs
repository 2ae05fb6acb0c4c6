//! Deterministic multi-step UI macros
//!
//! Coarse-grained console actions encoded as ordered button/delay sequences:
//! launching and closing the game, reconnecting the online service, saving.
//! Steps execute strictly in sequence — each press must observe the
//! on-console effect of the previous one — and every step checks the
//! caller's cancellation signal before issuing the next press.

pub mod launch;

use crate::channel::DeviceChannel;
use crate::config::TimingConfig;
use crate::core::types::{Button, ExecutorResult};
use crate::detect::{DetectionSpec, ScreenStateDetector};
use crate::poll::{ensure_active, sleep_checked};
use launch::{advance, LaunchAction, LaunchState};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spacing of the cancel presses that walk back to the overworld
const BACKOUT_HOLD_MS: u64 = 500;

/// Executes named multi-step procedures against the console
pub struct UiMacroSequencer<'a, C> {
    channel: &'a C,
    detector: ScreenStateDetector<'a, C>,
    timings: TimingConfig,
}

impl<'a, C: DeviceChannel> UiMacroSequencer<'a, C> {
    /// Creates a sequencer over a channel with resolved detection parameters
    pub fn new(channel: &'a C, spec: DetectionSpec, timings: TimingConfig) -> Self {
        UiMacroSequencer {
            channel,
            detector: ScreenStateDetector::new(channel, spec),
            timings,
        }
    }

    /// Presses a button, pacing the macro by `hold_ms`
    async fn click(
        &self,
        button: Button,
        hold_ms: u64,
        token: &CancellationToken,
    ) -> ExecutorResult<()> {
        ensure_active(token)?;
        self.channel
            .press(button, Duration::from_millis(hold_ms))
            .await?;
        Ok(())
    }

    /// Launches the game from the console menu and waits until it is
    /// interactive.
    ///
    /// The fixed press sequence walks: profile select, optional
    /// system-update dodge, DLC check, and the "DLC unusable" prompt (the
    /// extra up+confirm is harmless when the prompt does not appear — the
    /// console is still in a loading screen). After the load wait, the
    /// launch state machine polls for overworld/battle and escalates into
    /// the rescue loop if the budget lapses.
    pub async fn start_game(&self, token: &CancellationToken) -> ExecutorResult<()> {
        let timings = &self.timings;

        self.click(Button::A, 1_000 + timings.extra_time_load_profile, token)
            .await?;

        if timings.avoid_system_update {
            self.click(Button::DUp, 600, token).await?;
            self.click(Button::A, 1_000 + timings.extra_time_load_profile, token)
                .await?;
        }

        self.click(Button::A, 1_000 + timings.extra_time_check_dlc, token)
            .await?;
        self.click(Button::DUp, 600, token).await?;
        self.click(Button::A, 600, token).await?;

        info!("restarting the game");
        sleep_checked(token, Duration::from_millis(10_000 + timings.extra_time_load_game)).await?;

        for _ in 0..4 {
            self.click(Button::A, 1_000, token).await?;
        }

        let mut state = LaunchState::AwaitingGame { waited_ms: 0 };
        loop {
            ensure_active(token)?;
            let in_game = self.detector.in_game().await?;
            let (next, action) = advance(state, in_game, timings.avoid_system_update);
            if matches!(next, LaunchState::Rescue) && !matches!(state, LaunchState::Rescue) {
                info!("game did not come up in time, starting rescue presses");
            }
            state = next;
            match action {
                LaunchAction::Wait { ms } => {
                    sleep_checked(token, Duration::from_millis(ms)).await?
                }
                LaunchAction::PressConfirm { hold_ms } => {
                    self.click(Button::A, hold_ms, token).await?
                }
                LaunchAction::Done => break,
            }
        }

        info!("back in the game");
        Ok(())
    }

    /// Closes the running game from the console menu
    pub async fn close_game(&self, token: &CancellationToken) -> ExecutorResult<()> {
        let timings = &self.timings;
        self.click(Button::Home, 2_000 + timings.extra_time_return_home, token)
            .await?;
        self.click(Button::X, 1_000, token).await?;
        self.click(Button::A, 5_000 + timings.extra_time_close_game, token)
            .await?;
        info!("closed out of the game");
        Ok(())
    }

    /// Reconnects the online service after a drop.
    ///
    /// The leading cancel clears a possible error dialog. The service press
    /// is issued twice: the console sometimes misses the first one.
    pub async fn reconnect_online(&self, token: &CancellationToken) -> ExecutorResult<()> {
        self.click(Button::B, 2_000, token).await?;

        ensure_active(token)?;
        if !self.detector.is_overworld().await? {
            for _ in 0..5 {
                self.click(Button::B, BACKOUT_HOLD_MS, token).await?;
            }
        }

        self.click(Button::Y, 1_000, token).await?;
        self.click(Button::Plus, 2_000, token).await?;
        self.click(Button::Plus, 5_000 + self.timings.extra_time_reconnect, token)
            .await?;

        for _ in 0..5 {
            self.click(Button::B, BACKOUT_HOLD_MS, token).await?;
        }
        Ok(())
    }

    /// Saves the game through the in-game menu, confirming until the
    /// overworld comes back
    pub async fn save_game(&self, token: &CancellationToken) -> ExecutorResult<()> {
        self.click(Button::B, 200, token).await?;
        info!("saving the game");
        self.click(Button::X, 2_000, token).await?;
        self.click(Button::R, 250, token).await?;
        loop {
            ensure_active(token)?;
            if self.detector.is_overworld().await? {
                break;
            }
            self.click(Button::A, 500, token).await?;
        }
        info!("game saved");
        Ok(())
    }

    /// Toggles airplane mode through the quick-settings menu.
    /// `tail_hold_ms` paces the final cursor step before confirming.
    pub async fn toggle_airplane(
        &self,
        tail_hold_ms: u64,
        token: &CancellationToken,
    ) -> ExecutorResult<()> {
        ensure_active(token)?;
        self.channel
            .hold(Button::Home, Duration::from_millis(2_000))
            .await?;
        sleep_checked(token, Duration::from_millis(1_000)).await?;

        for i in 0..4 {
            let hold = if i == 3 { tail_hold_ms } else { 150 };
            self.click(Button::DDown, hold, token).await?;
        }
        self.click(Button::A, 2_000, token).await?;
        self.click(Button::A, 500, token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::mock::InputEvent;
    use crate::channel::MockChannel;
    use crate::config::Config;
    use crate::core::types::GameVariant;
    use crate::offsets;

    fn sequencer(channel: &MockChannel) -> UiMacroSequencer<'_, MockChannel> {
        let config = Config::default();
        let spec = DetectionSpec::new(&config.console, GameVariant::Sword);
        UiMacroSequencer::new(channel, spec, config.timings)
    }

    fn presses(events: &[InputEvent]) -> Vec<Button> {
        events
            .iter()
            .filter_map(|e| match e {
                InputEvent::Press { button, .. } => Some(*button),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_game_sequence() {
        let channel = MockChannel::new();
        let token = CancellationToken::new();

        sequencer(&channel).close_game(&token).await.unwrap();
        assert_eq!(
            presses(&channel.events()),
            vec![Button::Home, Button::X, Button::A]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_double_press_quirk() {
        let channel = MockChannel::new();
        // Already on the overworld: the backout presses are skipped.
        channel.load_u32(offsets::CURRENT_SCREEN, offsets::SCREEN_OVERWORLD_FADE);
        let token = CancellationToken::new();

        sequencer(&channel).reconnect_online(&token).await.unwrap();

        let buttons = presses(&channel.events());
        assert_eq!(
            buttons,
            vec![
                Button::B,
                Button::Y,
                Button::Plus,
                Button::Plus,
                Button::B,
                Button::B,
                Button::B,
                Button::B,
                Button::B,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_game_confirms_until_overworld() {
        let channel = MockChannel::new();
        // Two polls away from the overworld, then back.
        channel.script_read(offsets::CURRENT_SCREEN, &0u32.to_le_bytes());
        channel.script_read(offsets::CURRENT_SCREEN, &0u32.to_le_bytes());
        channel.load_u32(offsets::CURRENT_SCREEN, offsets::SCREEN_OVERWORLD_MENU);
        let token = CancellationToken::new();

        sequencer(&channel).save_game(&token).await.unwrap();

        let buttons = presses(&channel.events());
        assert_eq!(
            buttons,
            vec![Button::B, Button::X, Button::R, Button::A, Button::A]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_between_presses() {
        let channel = MockChannel::new();
        let token = CancellationToken::new();
        token.cancel();

        let result = sequencer(&channel).close_game(&token).await;
        assert!(result.is_err());
        assert!(channel.events().is_empty());
    }
}
