//! TCP transport for the botbase debug service
//!
//! The service speaks a line-oriented text protocol: one command per line,
//! CRLF-terminated, with query responses coming back as a single hex-encoded
//! line. Commands are strictly sequential — the executor never pipelines,
//! because each press must observe the on-console effect of the previous one.

use super::DeviceChannel;
use crate::core::types::{Address, Button, ChannelError, ChannelResult, Stick};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Debug channel over a TCP connection to the console
pub struct BotbaseChannel {
    stream: Mutex<BufStream<TcpStream>>,
    peer: String,
}

impl BotbaseChannel {
    /// Connects to the debug service on the console
    pub async fn connect(host: &str, port: u16) -> ChannelResult<Self> {
        let peer = format!("{host}:{port}");
        let stream = TcpStream::connect(&peer).await?;
        stream.set_nodelay(true)?;
        debug!("connected to debug channel at {peer}");
        Ok(BotbaseChannel {
            stream: Mutex::new(BufStream::new(stream)),
            peer,
        })
    }

    /// Peer address this channel is connected to
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Sends one command line without waiting for a response
    async fn send(&self, command: &str) -> ChannelResult<()> {
        trace!(command, "channel send");
        let mut stream = self.stream.lock().await;
        stream.write_all(command.as_bytes()).await?;
        stream.write_all(b"\r\n").await?;
        stream.flush().await?;
        Ok(())
    }

    /// Sends one command line and reads the single-line response
    async fn query(&self, command: &str) -> ChannelResult<String> {
        trace!(command, "channel query");
        let mut stream = self.stream.lock().await;
        stream.write_all(command.as_bytes()).await?;
        stream.write_all(b"\r\n").await?;
        stream.flush().await?;

        let mut line = String::new();
        let n = stream.read_line(&mut line).await?;
        if n == 0 {
            return Err(ChannelError::Closed);
        }
        Ok(line.trim_end().to_string())
    }

    /// Decodes a hex peek response, checking the expected byte count
    fn decode_peek(
        address: impl std::fmt::Display,
        line: &str,
        expected: usize,
    ) -> ChannelResult<Vec<u8>> {
        let bytes = hex::decode(line.trim())
            .map_err(|e| ChannelError::protocol(format!("bad peek response: {e}")))?;
        if bytes.len() != expected {
            return Err(ChannelError::short_read(address, expected, bytes.len()));
        }
        Ok(bytes)
    }
}

impl DeviceChannel for BotbaseChannel {
    async fn read_bytes(&self, address: Address, len: usize) -> ChannelResult<Vec<u8>> {
        let line = self.query(&format!("peek 0x{:X} {}", address.as_u64(), len)).await?;
        Self::decode_peek(address, &line, len)
    }

    async fn write_bytes(&self, address: Address, data: &[u8]) -> ChannelResult<()> {
        self.send(&format!("poke 0x{:X} 0x{}", address.as_u64(), hex::encode(data)))
            .await
    }

    async fn read_bytes_main(&self, offset: u64, len: usize) -> ChannelResult<Vec<u8>> {
        let line = self.query(&format!("peekMain 0x{offset:X} {len}")).await?;
        Self::decode_peek(format!("main+0x{offset:X}"), &line, len)
    }

    async fn read_bytes_absolute(&self, address: Address, len: usize) -> ChannelResult<Vec<u8>> {
        let line = self
            .query(&format!("peekAbsolute 0x{:X} {}", address.as_u64(), len))
            .await?;
        Self::decode_peek(address, &line, len)
    }

    async fn write_bytes_absolute(&self, address: Address, data: &[u8]) -> ChannelResult<()> {
        self.send(&format!(
            "pokeAbsolute 0x{:X} 0x{}",
            address.as_u64(),
            hex::encode(data)
        ))
        .await
    }

    async fn press(&self, button: Button, hold: Duration) -> ChannelResult<()> {
        self.send(&format!("click {}", button.protocol_name())).await?;
        tokio::time::sleep(hold).await;
        Ok(())
    }

    async fn hold(&self, button: Button, hold: Duration) -> ChannelResult<()> {
        self.send(&format!("press {}", button.protocol_name())).await?;
        tokio::time::sleep(hold).await;
        self.send(&format!("release {}", button.protocol_name())).await
    }

    async fn set_stick(&self, stick: Stick, dx: i16, dy: i16, hold: Duration) -> ChannelResult<()> {
        self.send(&format!("setStick {} {dx} {dy}", stick.protocol_name()))
            .await?;
        tokio::time::sleep(hold).await;
        Ok(())
    }

    async fn title_id(&self) -> ChannelResult<String> {
        let line = self.query("getTitleID").await?;
        if line.is_empty() {
            return Err(ChannelError::protocol("empty title id response"));
        }
        Ok(line)
    }

    async fn detach(&self) -> ChannelResult<()> {
        self.send("detachController").await
    }

    async fn set_screen(&self, on: bool) -> ChannelResult<()> {
        self.send(if on { "screenOn" } else { "screenOff" }).await
    }
}
