//! Telnet `put` client over TCP.
//!
//! Each sample is encoded into a reusable buffer, written as one line and
//! flushed immediately; nothing is buffered across `send` calls.

use std::fmt;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

use kairos_core::error::{KairosError, Result};
use kairos_core::protocol::put::encode_put_line;
use kairos_core::{TagSet, Value};

use crate::transport::client::KairosClient;

pub struct KairosDb {
    host: String,
    port: u16,
    tags: TagSet,
    writer: Option<BufWriter<TcpStream>>,
    line: BytesMut,
}

impl KairosDb {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tags: TagSet::new(),
            writer: None,
            line: BytesMut::with_capacity(128),
        }
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_connected(&self) -> bool {
        self.writer.is_some()
    }
}

impl fmt::Display for KairosDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for KairosDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KairosDb")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl KairosClient for KairosDb {
    fn set_tags(&mut self, tags: TagSet) {
        self.tags = tags;
    }

    async fn connect(&mut self) -> Result<String> {
        if self.writer.is_some() {
            return Err(KairosError::AlreadyConnected);
        }

        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        stream.set_nodelay(true)?;
        self.writer = Some(BufWriter::new(stream));

        tracing::debug!(server = %self, "connected");
        Ok(self.to_string())
    }

    async fn send(&mut self, name: &str, value: Value, timestamp: i64) -> Result<()> {
        self.line.clear();
        if !encode_put_line(&mut self.line, name, timestamp, &value, &self.tags) {
            return Ok(());
        }

        let writer = self.writer.as_mut().ok_or(KairosError::NotConnected)?;
        writer.write_all(&self.line).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.shutdown().await?;
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        self.to_string()
    }
}
