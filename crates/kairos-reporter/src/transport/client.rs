use async_trait::async_trait;

use kairos_core::error::Result;
use kairos_core::{TagSet, Value};

/// Connection to a time-series ingestion endpoint.
///
/// The reporter drives one `connect -> send* -> close` sequence per tick.
/// Implementations may be swapped for recording or failing clients in
/// tests.
#[async_trait]
pub trait KairosClient: Send {
    /// Tags appended to every sample.
    fn set_tags(&mut self, tags: TagSet);

    /// Open the connection. Returns a description of the endpoint.
    async fn connect(&mut self) -> Result<String>;

    /// Write one sample. Non-finite values are dropped without error.
    async fn send(&mut self, name: &str, value: Value, timestamp: i64) -> Result<()>;

    /// Release the connection. Calling it while closed is a no-op.
    async fn close(&mut self) -> Result<()>;

    /// Endpoint label for logs.
    fn endpoint(&self) -> String;
}
