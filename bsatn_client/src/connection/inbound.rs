use super::{ConnectionEvent, DbConnection};
use crate::{
    error::ClientError,
    messages::{decode_server_frame, DatabaseUpdate, ServerMessage, TransactionUpdate, UpdateStatus},
    table::ApplyOutcome,
};
use anyhow::Result;
use bytes::Bytes;
use derive_more::Constructor;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Constructor)]
pub struct InboundJob {
    conn: Arc<DbConnection>,

    /* rx */
    frames: mpsc::Receiver<Bytes>,
    is_terminating: watch::Receiver<()>,

    /* tx */
    events: mpsc::Sender<ConnectionEvent>,
}

impl InboundJob {
    pub async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                biased;
                res = (self.is_terminating.changed()) => {
                    res.ok();
                    break
                }
                opt_frame = (self.frames.recv()) => {
                    let frame = match opt_frame {
                        Some(frame) => frame,
                        None => break,
                    };
                    let event = self.process_frame(&frame).await;
                    if self.emit(event).await.is_break() {
                        break
                    }
                }
            }
        }

        info!("inbound job is exiting");

        Ok(())
    }

    async fn process_frame(&self, frame: &[u8]) -> ConnectionEvent {
        let msg = match decode_server_frame(frame) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, len = frame.len(), "rejected server frame");
                return ConnectionEvent::FrameRejected { error: e.into() };
            }
        };

        match msg {
            ServerMessage::IdentityToken(token) => {
                self.conn.on_identity_token(&token).await;
                ConnectionEvent::Connected {
                    identity: token.identity,
                    token: token.token,
                    connection_id: token.connection_id,
                }
            }
            ServerMessage::InitialSubscription(sub) => {
                match self.apply(&sub.database_update).await {
                    Ok(outcome) => ConnectionEvent::SubscriptionApplied {
                        request_id: sub.request_id,
                        outcome,
                        host_execution_duration: sub.total_host_execution_duration,
                    },
                    Err(error) => ConnectionEvent::FrameRejected { error },
                }
            }
            ServerMessage::TransactionUpdate(tx) => self.transaction_event(tx).await,
        }
    }

    async fn transaction_event(&self, tx: TransactionUpdate) -> ConnectionEvent {
        let TransactionUpdate {
            status,
            timestamp,
            caller_identity,
            caller_connection_id,
            reducer_call,
            ..
        } = tx;

        match status {
            UpdateStatus::Committed(update) => match self.apply(&update).await {
                Ok(outcome) => ConnectionEvent::TransactionCommitted {
                    reducer_call,
                    caller_identity,
                    caller_connection_id,
                    timestamp,
                    outcome,
                },
                Err(error) => ConnectionEvent::FrameRejected { error },
            },
            UpdateStatus::Failed(message) => {
                debug!(reducer = %reducer_call.reducer_name, %message, "reducer failed");
                ConnectionEvent::TransactionFailed {
                    reducer_call,
                    caller_identity,
                    message,
                }
            }
            UpdateStatus::OutOfEnergy => ConnectionEvent::OutOfEnergy {
                reducer_call,
                caller_identity,
            },
        }
    }

    async fn apply(&self, update: &DatabaseUpdate) -> Result<ApplyOutcome, ClientError> {
        let mut registry = self.conn.registry().write().await;

        let res = registry.apply_database_update(update);
        match &res {
            Ok(outcome) => {
                for error in &outcome.errors {
                    warn!(%error, "table update skipped");
                }
            }
            Err(error) => warn!(%error, "rejected database update"),
        }
        res
    }

    /// Waits for room in the event channel, unless the connection terminates first.
    ///
    /// The frame is fully applied by now, so on termination only the event is lost.
    async fn emit(&mut self, event: ConnectionEvent) -> ControlFlow<()> {
        tokio::select! {
            biased;
            res = (self.is_terminating.changed()) => {
                res.ok();
                debug!("event dropped on termination");
                ControlFlow::Break(())
            }
            res = (self.events.send(event)) => {
                // Caches stay current even when nobody listens.
                if res.is_err() {
                    debug!("event receiver is gone");
                }
                ControlFlow::Continue(())
            }
        }
    }
}
