//! # Connection processing
//!
//! ```text
//! transport reader --deliver_frame--> [frames] --> InboundJob --decode, apply--> [events] --> application
//! application --call_reducer, subscribe--> [outbound] --> OutboundJob --send--> transport writer
//! ```
//!
//! The inbound job is the only writer of the table caches, and handles one frame
//! at a time in arrival order. The outbound job writes one frame at a time.

mod event;
mod inbound;
mod outbound;
mod transport;


pub use event::*;
pub use inbound::InboundJob;
pub use outbound::OutboundJob;
pub use transport::*;

use crate::{
    error::ClientError,
    messages::{
        encode_client_frame, CallReducer, CallReducerFlags, ClientMessage, IdentityToken,
        Subscribe,
    },
    options::ConnectionOptions,
    table::TableRegistry,
};
use bsatn_types::domain::{ConnectionId, Identity};
use bsatn_types::Ser;
use bytes::Bytes;
use outbound::OutboundFrame;
use shorthand::ShortHand;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch, RwLock, RwLockReadGuard};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    pub identity: Option<Identity>,
    pub token: Option<String>,
    pub connection_id: Option<ConnectionId>,
    pub is_connected: bool,
    pub is_terminating: bool,
}

#[derive(ShortHand)]
#[shorthand(visibility("pub(in crate)"))]
pub struct DbConnection {
    options: ConnectionOptions,

    state: RwLock<ConnectionState>,
    registry: RwLock<TableRegistry>,

    next_request_id: AtomicU32,

    frame_tx: mpsc::Sender<Bytes>,
    outbound_tx: mpsc::Sender<OutboundFrame>,
    is_terminating_tx: watch::Sender<()>,
}

impl DbConnection {
    /// Validates `options` and wires up the connection.
    ///
    /// Nothing runs until the caller spawns both jobs.
    #[allow(clippy::type_complexity)]
    pub fn new(
        options: ConnectionOptions,
        registry: TableRegistry,
        transport: Arc<dyn Transport>,
    ) -> Result<
        (
            Arc<Self>,
            InboundJob,
            OutboundJob,
            mpsc::Receiver<ConnectionEvent>,
        ),
        ClientError,
    > {
        options.validate()?;

        let (frame_tx, frame_rx) = mpsc::channel(options.inbound_capacity());
        let (outbound_tx, outbound_rx) = mpsc::channel(options.outbound_capacity());
        let (event_tx, event_rx) = mpsc::channel(options.event_capacity());
        let (is_terminating_tx, is_terminating_rx) = watch::channel(());

        let state = ConnectionState {
            token: options.token().map(String::from),
            ..Default::default()
        };

        let conn = Self {
            options,

            state: RwLock::new(state),
            registry: RwLock::new(registry),

            next_request_id: AtomicU32::new(0),

            frame_tx,
            outbound_tx,
            is_terminating_tx,
        };
        let conn = Arc::new(conn);

        let inbound_job = InboundJob::new(
            Arc::clone(&conn),
            frame_rx,
            is_terminating_rx.clone(),
            event_tx,
        );

        let outbound_job = OutboundJob::new(transport, outbound_rx, is_terminating_rx);

        Ok((conn, inbound_job, outbound_job, event_rx))
    }

    /* Inbound */

    /// Queues one server frame for the inbound job.
    pub async fn deliver_frame(&self, frame: impl Into<Bytes>) -> Result<(), ClientError> {
        if self.state.read().await.is_terminating == true {
            return Err(ClientError::Closed);
        }
        self.frame_tx
            .send(frame.into())
            .await
            .map_err(|_| ClientError::Closed)
    }

    /* Outbound */

    /// Sends a reducer call whose arguments are already BSATN-encoded.
    ///
    /// Resolves once the frame has been written, to the call's request id.
    pub async fn call_reducer(
        &self,
        reducer: impl Into<String>,
        args: Vec<u8>,
        flags: CallReducerFlags,
    ) -> Result<u32, ClientError> {
        let request_id = self.fresh_request_id();
        let msg = ClientMessage::CallReducer(CallReducer {
            reducer: reducer.into(),
            args,
            request_id,
            flags,
        });
        self.send(&msg).await?;
        Ok(request_id)
    }

    /// [`Self::call_reducer`] with the arguments encoded from `args`.
    pub async fn call_reducer_with<A: Ser + ?Sized>(
        &self,
        reducer: impl Into<String>,
        args: &A,
    ) -> Result<u32, ClientError> {
        let args = args.ser_solo()?;
        self.call_reducer(reducer, args, CallReducerFlags::default())
            .await
    }

    pub async fn subscribe<Q: Into<String>>(
        &self,
        query_strings: impl IntoIterator<Item = Q>,
    ) -> Result<u32, ClientError> {
        let request_id = self.fresh_request_id();
        let msg = ClientMessage::Subscribe(Subscribe {
            query_strings: query_strings.into_iter().map(Into::into).collect(),
            request_id,
        });
        self.send(&msg).await?;
        Ok(request_id)
    }

    fn fresh_request_id(&self) -> u32 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn send(&self, msg: &ClientMessage) -> Result<(), ClientError> {
        if self.state.read().await.is_terminating == true {
            return Err(ClientError::Closed);
        }

        let frame = encode_client_frame(msg)?;
        let (ack_tx, ack_rx) = oneshot::channel();
        self.outbound_tx
            .send(OutboundFrame::new(frame, ack_tx))
            .await
            .map_err(|_| ClientError::Closed)?;

        // The ack sender is dropped unsent if the outbound job exits first.
        let res = ack_rx.await.map_err(|_| ClientError::Closed)?;
        res.map_err(ClientError::Transport)
    }

    /* State */

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn connection_id(&self) -> Option<ConnectionId> {
        self.state.read().await.connection_id
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.is_connected
    }

    /// A read view of every table cache. Hold it briefly; frames are not
    /// applied while it is held.
    pub async fn tables(&self) -> RwLockReadGuard<'_, TableRegistry> {
        self.registry.read().await
    }

    pub fn database(&self) -> &str {
        self.options.database()
    }

    pub(in crate) async fn on_identity_token(&self, token: &IdentityToken) {
        let mut state = self.state.write().await;

        state.identity = Some(token.identity);
        if state.token.is_none() {
            state.token = Some(token.token.clone());
        }
        state.connection_id = Some(token.connection_id);
        state.is_connected = true;

        info!(
            identity = %token.identity,
            connection_id = %token.connection_id,
            database = self.options.database(),
            "connected"
        );
    }

    /// Stops both jobs. Frames already handed to the inbound job may be dropped,
    /// but never half applied.
    pub async fn terminate(&self) {
        {
            let mut state = self.state.write().await;

            state.is_terminating = true;
            state.is_connected = false;
        }

        debug!("terminating connection");
        self.is_terminating_tx.send(()).ok();
    }
}
