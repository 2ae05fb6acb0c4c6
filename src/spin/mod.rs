//! Spin-trade positional correction
//!
//! During trade initiation the avatar must keep spinning near a tracked
//! position until a memory condition flips. The avatar's coordinate block
//! has no stable address; it is located once per session through a pointer
//! chain, cached, and re-asserted defensively whenever a correction window
//! times out.
//!
//! The cache is owned by the session context and passed in by reference —
//! never process-global — so concurrent bot instances cannot silently share
//! stale coordinates.

use crate::channel::DeviceChannel;
use crate::core::types::{Address, ExecutorResult, Stick};
use crate::offsets;
use crate::pointer;
use crate::poll::{ensure_active, read_until_changed, sleep_checked};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Stick tilt used for the circular correction pulses
const SPIN_TILT: i16 = 3_500;

/// Pacing of one correction pulse
const PULSE_MS: u64 = 100;

/// Budget floor below which a fresh correction circle is not worth starting:
/// the pirouette end animation needs this long to finish cleanly.
const CIRCLE_CUTOFF: Duration = Duration::from_millis(4_000);

/// Cached avatar coordinate block: resolved base plus the three 4-byte
/// position values read at resolution time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinCoordinates {
    pub base: Address,
    pub x: [u8; 4],
    pub y: [u8; 4],
    pub z: [u8; 4],
}

/// Session-owned resolution state for the coordinate block.
///
/// `Untried` retries resolution on the next call (the chain itself failed);
/// `Failed` is sticky for the session (the chain resolved but the probe
/// reads came back short — retrying would read the same bad memory).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpinCache {
    #[default]
    Untried,
    Failed,
    Resolved(SpinCoordinates),
}

/// Closed-loop positional correction for the spin-trade animation
pub struct SpinTradeCorrector<'a, C> {
    channel: &'a C,
}

impl<'a, C: DeviceChannel> SpinTradeCorrector<'a, C> {
    /// Creates a corrector over a channel
    pub fn new(channel: &'a C) -> Self {
        SpinTradeCorrector { channel }
    }

    /// Resolves the coordinate block once, updating the cache
    async fn coordinates(&self, cache: &mut SpinCache) -> ExecutorResult<Option<SpinCoordinates>> {
        match cache {
            SpinCache::Resolved(coords) => return Ok(Some(coords.clone())),
            SpinCache::Failed => return Ok(None),
            SpinCache::Untried => {}
        }

        let base = pointer::resolve_text(self.channel, offsets::SPIN_COORDINATE_CHAIN).await?;
        if base.is_null() {
            // Chain resolution failed outright; leave the cache untried so a
            // later call can retry once the game state settles.
            return Ok(None);
        }

        let x = self.read_coordinate(base).await?;
        let y = self.read_coordinate(base.add(0x4)).await?;
        let z = self.read_coordinate(base.add(0x8)).await?;
        match (x, y, z) {
            (Some(x), Some(y), Some(z)) => {
                info!(%base, "spin coordinates resolved");
                let coords = SpinCoordinates { base, x, y, z };
                *cache = SpinCache::Resolved(coords.clone());
                Ok(Some(coords))
            }
            _ => {
                debug!(%base, "coordinate probe came back short");
                *cache = SpinCache::Failed;
                Ok(None)
            }
        }
    }

    async fn read_coordinate(&self, address: Address) -> ExecutorResult<Option<[u8; 4]>> {
        let data = self.channel.read_bytes_absolute(address, 4).await?;
        Ok(data.as_slice().try_into().ok())
    }

    /// Rewrites the cached coordinate values into console memory,
    /// re-asserting the last known-good position
    pub async fn spin_correction(&self, coords: &SpinCoordinates) -> ExecutorResult<()> {
        self.channel.write_bytes_absolute(coords.base, &coords.x).await?;
        self.channel
            .write_bytes_absolute(coords.base.add(0x4), &coords.y)
            .await?;
        self.channel
            .write_bytes_absolute(coords.base.add(0x8), &coords.z)
            .await?;
        Ok(())
    }

    /// Keeps the avatar spinning near the tracked position until the bytes
    /// at `condition` compare against `comparison` the way `match_on_equal`
    /// asks, or until `timeout` elapses.
    ///
    /// Returns `true` when the condition was met (after a brief stop pulse
    /// and a settle wait), `false` on timeout — in which case the cached
    /// coordinates are rewritten before returning. Falls back to a plain
    /// poll when the coordinate block is unresolved.
    #[allow(clippy::too_many_arguments)]
    pub async fn spin_trade(
        &self,
        cache: &mut SpinCache,
        condition: Address,
        comparison: &[u8],
        timeout: Duration,
        settle: Duration,
        match_on_equal: bool,
        token: &CancellationToken,
    ) -> ExecutorResult<bool> {
        let Some(coords) = self.coordinates(cache).await? else {
            return read_until_changed(
                self.channel,
                condition,
                comparison,
                timeout,
                settle,
                match_on_equal,
                token,
            )
            .await;
        };

        let started = Instant::now();
        loop {
            ensure_active(token)?;
            let data = self.channel.read_bytes(condition, comparison.len()).await?;
            if (data == comparison) == match_on_equal {
                self.pulse(0, 0).await?;
                sleep_checked(token, settle).await?;
                return Ok(true);
            }

            if started.elapsed() + CIRCLE_CUTOFF < timeout {
                // Full circle: keeps the avatar pirouetting on the spot.
                self.pulse(-SPIN_TILT, 0).await?;
                self.pulse(0, -SPIN_TILT).await?;
                self.pulse(SPIN_TILT, 0).await?;
                self.pulse(0, SPIN_TILT).await?;
            } else {
                // Too close to timeout for a fresh circle; just recenter.
                self.pulse(0, 0).await?;
            }

            if started.elapsed() >= timeout {
                break;
            }
        }

        sleep_checked(token, settle).await?;
        self.spin_correction(&coords).await?;
        Ok(false)
    }

    async fn pulse(&self, dx: i16, dy: i16) -> ExecutorResult<()> {
        self.channel
            .set_stick(Stick::Left, dx, dy, Duration::from_millis(PULSE_MS))
            .await?;
        Ok(())
    }
}
