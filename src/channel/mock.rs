//! Scripted in-memory channel for tests
//!
//! Holds a sparse byte image of the console plus optional per-address read
//! scripts, and records every injected input. Unit and integration tests
//! build a fixture image, run an executor routine against it, and assert on
//! the resulting memory and input log.

use super::DeviceChannel;
use crate::core::types::{Address, Button, ChannelResult, Stick};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// One injected input, as observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Press {
        button: Button,
        hold_ms: u64,
    },
    Hold {
        button: Button,
        hold_ms: u64,
    },
    Stick {
        stick: Stick,
        dx: i16,
        dy: i16,
        hold_ms: u64,
    },
    Detach,
    Screen {
        on: bool,
    },
}

#[derive(Default)]
struct MockState {
    memory: HashMap<u64, u8>,
    scripts: HashMap<u64, VecDeque<Vec<u8>>>,
    read_counts: HashMap<u64, usize>,
    events: Vec<InputEvent>,
    title_id: String,
    module_base: u64,
}

/// In-memory device channel with scriptable reads
#[derive(Default)]
pub struct MockChannel {
    state: Mutex<MockState>,
}

impl MockChannel {
    pub fn new() -> Self {
        MockChannel::default()
    }

    /// Sets the title id reported by the device
    pub fn with_title(self, title_id: &str) -> Self {
        self.state.lock().unwrap().title_id = title_id.to_string();
        self
    }

    /// Sets the image base used for module-relative reads
    pub fn with_module_base(self, base: u64) -> Self {
        self.state.lock().unwrap().module_base = base;
        self
    }

    /// Places bytes into the sparse memory image
    pub fn load(&self, address: Address, bytes: &[u8]) {
        let mut state = self.state.lock().unwrap();
        for (i, &b) in bytes.iter().enumerate() {
            state.memory.insert(address.as_u64() + i as u64, b);
        }
    }

    /// Places a little-endian u64 (a remote pointer) into the image
    pub fn load_u64(&self, address: Address, value: u64) {
        self.load(address, &value.to_le_bytes());
    }

    /// Places a little-endian u32 into the image
    pub fn load_u32(&self, address: Address, value: u32) {
        self.load(address, &value.to_le_bytes());
    }

    /// Queues a scripted response for reads at `address`; once the queue
    /// drains, reads fall back to the memory image
    pub fn script_read(&self, address: Address, bytes: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(address.as_u64())
            .or_default()
            .push_back(bytes.to_vec());
    }

    /// Bytes currently stored at `address`, missing bytes read as zero
    pub fn memory(&self, address: Address, len: usize) -> Vec<u8> {
        let state = self.state.lock().unwrap();
        (0..len)
            .map(|i| {
                state
                    .memory
                    .get(&(address.as_u64() + i as u64))
                    .copied()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Every input injected so far, in order
    pub fn events(&self) -> Vec<InputEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// Number of reads performed at `address`
    pub fn read_count(&self, address: Address) -> usize {
        self.state
            .lock()
            .unwrap()
            .read_counts
            .get(&address.as_u64())
            .copied()
            .unwrap_or(0)
    }

    fn read_at(&self, address: u64, len: usize) -> Vec<u8> {
        let mut state = self.state.lock().unwrap();
        *state.read_counts.entry(address).or_insert(0) += 1;
        if let Some(queue) = state.scripts.get_mut(&address) {
            if let Some(scripted) = queue.pop_front() {
                return scripted;
            }
        }
        (0..len)
            .map(|i| state.memory.get(&(address + i as u64)).copied().unwrap_or(0))
            .collect()
    }

    fn write_at(&self, address: u64, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        for (i, &b) in data.iter().enumerate() {
            state.memory.insert(address + i as u64, b);
        }
    }
}

impl DeviceChannel for MockChannel {
    async fn read_bytes(&self, address: Address, len: usize) -> ChannelResult<Vec<u8>> {
        Ok(self.read_at(address.as_u64(), len))
    }

    async fn write_bytes(&self, address: Address, data: &[u8]) -> ChannelResult<()> {
        self.write_at(address.as_u64(), data);
        Ok(())
    }

    async fn read_bytes_main(&self, offset: u64, len: usize) -> ChannelResult<Vec<u8>> {
        let base = self.state.lock().unwrap().module_base;
        Ok(self.read_at(base + offset, len))
    }

    async fn read_bytes_absolute(&self, address: Address, len: usize) -> ChannelResult<Vec<u8>> {
        Ok(self.read_at(address.as_u64(), len))
    }

    async fn write_bytes_absolute(&self, address: Address, data: &[u8]) -> ChannelResult<()> {
        self.write_at(address.as_u64(), data);
        Ok(())
    }

    async fn press(&self, button: Button, hold: Duration) -> ChannelResult<()> {
        self.state.lock().unwrap().events.push(InputEvent::Press {
            button,
            hold_ms: hold.as_millis() as u64,
        });
        tokio::time::sleep(hold).await;
        Ok(())
    }

    async fn hold(&self, button: Button, hold: Duration) -> ChannelResult<()> {
        self.state.lock().unwrap().events.push(InputEvent::Hold {
            button,
            hold_ms: hold.as_millis() as u64,
        });
        tokio::time::sleep(hold).await;
        Ok(())
    }

    async fn set_stick(&self, stick: Stick, dx: i16, dy: i16, hold: Duration) -> ChannelResult<()> {
        self.state.lock().unwrap().events.push(InputEvent::Stick {
            stick,
            dx,
            dy,
            hold_ms: hold.as_millis() as u64,
        });
        tokio::time::sleep(hold).await;
        Ok(())
    }

    async fn title_id(&self) -> ChannelResult<String> {
        Ok(self.state.lock().unwrap().title_id.clone())
    }

    async fn detach(&self) -> ChannelResult<()> {
        self.state.lock().unwrap().events.push(InputEvent::Detach);
        Ok(())
    }

    async fn set_screen(&self, on: bool) -> ChannelResult<()> {
        self.state.lock().unwrap().events.push(InputEvent::Screen { on });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_image_round_trip() {
        let channel = MockChannel::new();
        channel.load(Address::new(0x1000), &[1, 2, 3]);

        let bytes = channel.read_bytes(Address::new(0x1000), 4).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 0]);

        channel.write_bytes(Address::new(0x1002), &[9]).await.unwrap();
        assert_eq!(channel.memory(Address::new(0x1000), 3), vec![1, 2, 9]);
        assert_eq!(channel.read_count(Address::new(0x1000)), 1);
    }

    #[tokio::test]
    async fn test_scripted_reads_then_fallback() {
        let channel = MockChannel::new();
        let addr = Address::new(0x2000);
        channel.load(addr, &[0xFF]);
        channel.script_read(addr, &[0x00]);
        channel.script_read(addr, &[0x01]);

        assert_eq!(channel.read_bytes(addr, 1).await.unwrap(), vec![0x00]);
        assert_eq!(channel.read_bytes(addr, 1).await.unwrap(), vec![0x01]);
        assert_eq!(channel.read_bytes(addr, 1).await.unwrap(), vec![0xFF]);
    }

    #[tokio::test]
    async fn test_module_relative_reads() {
        let channel = MockChannel::new().with_module_base(0x7100_0000);
        channel.load_u64(Address::new(0x7100_0100), 0xAABB);

        let bytes = channel.read_bytes_main(0x100, 8).await.unwrap();
        assert_eq!(u64::from_le_bytes(bytes.try_into().unwrap()), 0xAABB);
    }
}
