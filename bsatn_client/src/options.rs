use crate::error::ClientError;
use crate::messages::Compression;

/// The websocket subprotocol of the binary protocol.
pub const SUBPROTOCOL: &str = "v1.bsatn.spacetimedb";

pub const DEFAULT_HOST: &str = "wss://maincloud.spacetimedb.com";

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Where to connect and how to size the connection's channels.
///
/// ```
/// use bsatn_client::ConnectionOptions;
///
/// let opts = ConnectionOptions::new("quickstart-chat").with_host("ws://localhost:3000");
/// assert_eq!(
///     opts.subscribe_uri(),
///     "ws://localhost:3000/v1/database/quickstart-chat/subscribe?compression=None",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    host: String,
    database: String,
    token: Option<String>,
    compression: Compression,
    inbound_capacity: usize,
    outbound_capacity: usize,
    event_capacity: usize,
}

impl ConnectionOptions {
    /// `database` is the database's name or identity.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            database: database.into(),
            token: None,
            compression: Compression::None,
            inbound_capacity: DEFAULT_CHANNEL_CAPACITY,
            outbound_capacity: DEFAULT_CHANNEL_CAPACITY,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// A token from an earlier session. Without one the server issues a new identity.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_inbound_capacity(mut self, capacity: usize) -> Self {
        self.inbound_capacity = capacity;
        self
    }

    pub fn with_outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = capacity;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }
    pub fn database(&self) -> &str {
        &self.database
    }
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
    pub fn compression(&self) -> Compression {
        self.compression
    }
    pub fn inbound_capacity(&self) -> usize {
        self.inbound_capacity
    }
    pub fn outbound_capacity(&self) -> usize {
        self.outbound_capacity
    }
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.host.is_empty() {
            return Err(ClientError::InvalidOptions("host cannot be empty".into()));
        }
        if self.database.is_empty() {
            return Err(ClientError::InvalidOptions(
                "database name or identity cannot be empty".into(),
            ));
        }
        self.compression
            .check_supported()
            .map_err(ClientError::Unsupported)?;
        for (what, capacity) in [
            ("inbound", self.inbound_capacity),
            ("outbound", self.outbound_capacity),
            ("event", self.event_capacity),
        ] {
            if capacity == 0 {
                return Err(ClientError::InvalidOptions(format!(
                    "{} channel capacity must be positive",
                    what
                )));
            }
        }
        Ok(())
    }

    /// The websocket URI to dial, to be opened with [`SUBPROTOCOL`].
    pub fn subscribe_uri(&self) -> String {
        format!(
            "{}/v1/database/{}/subscribe?compression={}",
            self.host.trim_end_matches('/'),
            self.database,
            self.compression.query_value()
        )
    }
}
