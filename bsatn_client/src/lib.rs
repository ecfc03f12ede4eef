pub mod connection;
pub mod error;
pub mod messages;
pub mod options;
pub mod table;

pub use connection::{ConnectionEvent, ConnectionState, DbConnection, InboundJob, OutboundJob, Transport};
pub use error::ClientError;
pub use options::{ConnectionOptions, DEFAULT_HOST, SUBPROTOCOL};
pub use table::{
    ApplyOutcome, DynamicBinding, RowKey, TableBinding, TableCache, TableDelta, TableHandle,
    TableRegistry,
};
