//! Textual pointer-chain resolution for volatile addresses
//!
//! Some values have no stable address between sessions; the community ships
//! their locations as chain descriptions like `"[[[main+100]+8]+4]+C"`: start
//! from the image base, dereference through each bracketed offset, then add a
//! final arithmetic offset.
//!
//! Parsing decides the chain's shape once, structurally: a description that
//! ends in `]` dereferences through every offset (addend 0); otherwise the
//! trailing `+tok` outside the brackets is the addend. Resolution never
//! compares token values, so a chain whose last dereference offset happens to
//! equal an earlier one resolves correctly.

use crate::channel::DeviceChannel;
use crate::core::types::{Address, ChannelError, ExecutorResult};
use tracing::warn;

/// A parsed chain: dereference offsets plus one terminal addend.
///
/// The first jump is module-relative; every later jump offsets the pointer
/// read at the previous step. The addend is added arithmetically, never
/// dereferenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerChain {
    jumps: Vec<u64>,
    addend: u64,
}

impl PointerChain {
    /// Builds a chain from explicit parts
    pub fn new(jumps: Vec<u64>, addend: u64) -> Self {
        PointerChain { jumps, addend }
    }

    /// Dereference offsets, first is module-relative
    pub fn jumps(&self) -> &[u64] {
        &self.jumps
    }

    /// Terminal arithmetic offset
    pub fn addend(&self) -> u64 {
        self.addend
    }

    /// Parses a textual chain description.
    ///
    /// Returns `None` for an empty or non-hex description. A description
    /// without any brackets is a single module-relative dereference.
    pub fn parse(text: &str) -> Option<PointerChain> {
        let trimmed = text.trim();
        let bracket_terminated = trimmed.ends_with(']');

        let cleaned = trimmed.replace("main", "").replace(['[', ']'], "");
        let mut tokens = Vec::new();
        for piece in cleaned.split('+') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            tokens.push(u64::from_str_radix(piece.trim_start_matches("0x"), 16).ok()?);
        }

        if tokens.is_empty() {
            return None;
        }

        if bracket_terminated {
            return Some(PointerChain::new(tokens, 0));
        }

        let addend = tokens.pop()?;
        if tokens.is_empty() {
            // Bare "main+X" is one dereference, not a naked addend.
            return Some(PointerChain::new(vec![addend], 0));
        }
        Some(PointerChain::new(tokens, addend))
    }

    /// Resolves the chain to an absolute address by sequential dereferencing.
    ///
    /// Reads 8 little-endian bytes at `main + jumps[0]`, then at each
    /// `previous + jump`, and finally adds the addend.
    pub async fn resolve<C: DeviceChannel>(&self, channel: &C) -> ExecutorResult<Address> {
        let mut jumps = self.jumps.iter();
        let Some(&first) = jumps.next() else {
            warn!("pointer chain has no jumps; returning null");
            return Ok(Address::null());
        };

        let mut address = read_u64(channel.read_bytes_main(first, 8).await?, first)?;
        for &jump in jumps {
            let at = Address::new(address).add(jump);
            address = read_u64(channel.read_bytes_absolute(at, 8).await?, jump)?;
        }
        Ok(Address::new(address).add(self.addend))
    }
}

fn read_u64(data: Vec<u8>, jump: u64) -> Result<u64, ChannelError> {
    let bytes: [u8; 8] = data
        .as_slice()
        .try_into()
        .map_err(|_| ChannelError::short_read(format!("jump +0x{jump:X}"), 8, data.len()))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Parses and resolves a chain description in one step.
///
/// A malformed or empty description resolves to the null address with a
/// warning; callers treat null as "unresolved" and fall back to slower
/// primitives. Channel failures still propagate.
pub async fn resolve_text<C: DeviceChannel>(channel: &C, text: &str) -> ExecutorResult<Address> {
    match PointerChain::parse(text) {
        Some(chain) => chain.resolve(channel).await,
        None => {
            warn!(chain = text, "invalid pointer chain description");
            Ok(Address::null())
        }
    }
}
