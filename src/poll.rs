//! Cancellation-aware waiting and bounded polling primitives
//!
//! Every suspension point in the executor goes through these helpers: waits
//! abort when the caller's cancellation signal fires, and bounded polls
//! return `false`/`None` on timeout instead of raising. Cancellation aborts
//! before the next channel operation is issued, never mid-transmission, and
//! performs no cleanup presses on the way out.

use crate::channel::DeviceChannel;
use crate::core::types::{Address, CreatureRecord, ExecutorError, ExecutorResult};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Errors out immediately if the routine has been cancelled
pub fn ensure_active(token: &CancellationToken) -> ExecutorResult<()> {
    if token.is_cancelled() {
        return Err(ExecutorError::Cancelled);
    }
    Ok(())
}

/// Sleeps for `duration`, aborting early if cancellation fires
pub async fn sleep_checked(token: &CancellationToken, duration: Duration) -> ExecutorResult<()> {
    ensure_active(token)?;
    tokio::select! {
        _ = token.cancelled() => Err(ExecutorError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Polls a heap address until its bytes compare against `comparison` the way
/// `match_on_equal` asks, or until `timeout` elapses.
///
/// Returns `true` when the requested match state was observed, `false` on
/// timeout. Timeout is not an error here; the caller decides whether to
/// continue.
pub async fn read_until_changed<C: DeviceChannel>(
    channel: &C,
    address: Address,
    comparison: &[u8],
    timeout: Duration,
    interval: Duration,
    match_on_equal: bool,
    token: &CancellationToken,
) -> ExecutorResult<bool> {
    let started = Instant::now();
    loop {
        ensure_active(token)?;
        let data = channel.read_bytes(address, comparison.len()).await?;
        if (data == comparison) == match_on_equal {
            return Ok(true);
        }
        if started.elapsed() >= timeout {
            debug!(
                address = %address,
                expected = %hex::encode(comparison),
                observed = %hex::encode(&data),
                "poll timed out without reaching match state"
            );
            return Ok(false);
        }
        sleep_checked(token, interval).await?;
    }
}

/// Polls an absolute address until a plausibly real creature record shows up
/// (nonzero species, verifying checksum), or until `timeout` elapses.
pub async fn read_until_present<C: DeviceChannel>(
    channel: &C,
    address: Address,
    timeout: Duration,
    interval: Duration,
    token: &CancellationToken,
) -> ExecutorResult<Option<CreatureRecord>> {
    let started = Instant::now();
    while started.elapsed() < timeout {
        ensure_active(token)?;
        let data = channel
            .read_bytes_absolute(address, crate::core::types::RECORD_SIZE)
            .await?;
        let record = CreatureRecord::from_bytes(&data);
        if record.is_present() {
            return Ok(Some(record));
        }
        sleep_checked(token, interval).await?;
    }
    Ok(None)
}
