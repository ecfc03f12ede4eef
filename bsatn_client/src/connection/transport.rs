use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// The socket side of a connection.
///
/// Implementations dial [`crate::ConnectionOptions::subscribe_uri`], write each
/// outbound frame as one binary message, and hand every inbound binary message
/// to [`super::DbConnection::deliver_frame`].
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Writes one whole frame.
    async fn send(&self, frame: Bytes) -> Result<()>;

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
