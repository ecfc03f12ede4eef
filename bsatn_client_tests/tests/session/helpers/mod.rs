pub mod loopback;
pub mod user;

use anyhow::{anyhow, Result};
use bsatn_client::ConnectionEvent;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

pub async fn next_event(events: &mut mpsc::Receiver<ConnectionEvent>) -> Result<ConnectionEvent> {
    timeout(Duration::from_secs(5), events.recv())
        .await?
        .ok_or_else(|| anyhow!("event channel closed"))
}
