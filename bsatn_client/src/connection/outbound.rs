use super::Transport;
use anyhow::Result;
use bytes::Bytes;
use derive_more::Constructor;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, trace, warn};

/// An encoded client frame and the caller waiting for it to be written.
#[derive(Constructor)]
pub struct OutboundFrame {
    frame: Bytes,
    ack: oneshot::Sender<Result<()>>,
}

#[derive(Constructor)]
pub struct OutboundJob {
    transport: Arc<dyn Transport>,

    /* rx */
    outbound: mpsc::Receiver<OutboundFrame>,
    is_terminating: watch::Receiver<()>,
}

impl OutboundJob {
    pub async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                biased;
                res = (self.is_terminating.changed()) => {
                    res.ok();
                    break
                }
                opt_frame = (self.outbound.recv()) => {
                    match opt_frame {
                        Some(OutboundFrame { frame, ack }) => {
                            let len = frame.len();
                            let res = self.transport.send(frame).await;
                            match &res {
                                Ok(()) => trace!(len, "sent client frame"),
                                Err(e) => warn!(error = %e, len, "failed to send client frame"),
                            }
                            ack.send(res).ok();
                        }
                        None => break,
                    }
                }
            }
        }

        info!("outbound job received termination signal");

        // Waiting callers see their ack dropped.
        self.outbound.close();
        while self.outbound.try_recv().is_ok() {}

        if let Err(e) = self.transport.close().await {
            warn!(error = %e, "failed to close transport");
        }

        info!("outbound job is exiting");

        Ok(())
    }
}
