//! Box storage codec: slot addressing plus record reads and writes
//!
//! Slots are a flat array in console memory: `BOX_START + SLOT_SIZE *
//! (BOX_CAPACITY * box + slot)`. Records are read in place and written back
//! whole; the write path owns the hygiene rules (trainer stamping, checksum
//! refresh, party-transient reset).

use crate::channel::DeviceChannel;
use crate::core::types::{Address, CreatureRecord, ExecutorResult, TrainerProfile};
use crate::offsets;
use tracing::debug;

/// Computes the storage address of a box slot.
///
/// Callers keep `slot` below `BOX_CAPACITY`; box indices are unbounded in
/// this layer because the catalog does not fix the box count.
pub fn slot_address(box_index: u32, slot: u32) -> Address {
    debug_assert!(slot < offsets::BOX_CAPACITY);
    let index = (offsets::BOX_CAPACITY * box_index + slot) as u64;
    offsets::BOX_START.add(offsets::SLOT_SIZE as u64 * index)
}

/// Serializes creature records to and from the box memory region
pub struct BoxSlotCodec<'a, C> {
    channel: &'a C,
}

impl<'a, C: DeviceChannel> BoxSlotCodec<'a, C> {
    /// Creates a codec over a channel
    pub fn new(channel: &'a C) -> Self {
        BoxSlotCodec { channel }
    }

    /// Reads the record stored in a box slot
    pub async fn read_slot(&self, box_index: u32, slot: u32) -> ExecutorResult<CreatureRecord> {
        let data = self
            .channel
            .read_bytes(slot_address(box_index, slot), offsets::SLOT_SIZE)
            .await?;
        Ok(CreatureRecord::from_bytes(&data))
    }

    /// Writes a record into a box slot.
    ///
    /// When `trainer` is supplied the record is first stamped with the
    /// session trainer identity and today's date, and its checksum
    /// recomputed. The party-transient block is always cleared: box storage
    /// must never hold party-only battle state.
    pub async fn write_slot(
        &self,
        record: &CreatureRecord,
        box_index: u32,
        slot: u32,
        trainer: Option<&TrainerProfile>,
    ) -> ExecutorResult<()> {
        let mut outgoing = record.clone();
        if let Some(trainer) = trainer {
            outgoing.stamp_trade(trainer, chrono::Local::now().date_naive());
            outgoing.refresh_checksum();
        }
        outgoing.reset_party_stats();

        let address = slot_address(box_index, slot);
        debug!(%address, box_index, slot, species = outgoing.species(), "writing box slot");
        self.channel.write_bytes(address, outgoing.as_bytes()).await?;
        Ok(())
    }

    /// Index of the currently opened box.
    ///
    /// One byte wide on read; the write side is 4 bytes. The asymmetry is a
    /// quirk of the underlying layout, preserved deliberately.
    pub async fn current_box(&self) -> ExecutorResult<u32> {
        let data = self.channel.read_bytes(offsets::CURRENT_BOX, 1).await?;
        Ok(data.first().copied().unwrap_or(0) as u32)
    }

    /// Selects the currently opened box
    pub async fn set_current_box(&self, box_index: u32) -> ExecutorResult<()> {
        self.channel
            .write_bytes(offsets::CURRENT_BOX, &box_index.to_le_bytes())
            .await?;
        Ok(())
    }
}
