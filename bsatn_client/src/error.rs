use bsatn_types::{DecodeError, EncodeError, SchemaError, UnsupportedFeature};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("unsupported: {0}")]
    Unsupported(UnsupportedFeature),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("table '{table}' has no struct field '{field}' to key rows by")]
    NoSuchKeyField { table: String, field: String },

    #[error("no table named '{0}' is registered")]
    UnknownTable(String),

    /// A delete named a row the cache does not hold. The cache is left as it was.
    #[error("table '{table}' has no row with key {key}")]
    RowNotFound { table: String, key: String },

    #[error("table '{table}': {source}")]
    Table {
        table: String,
        #[source]
        source: Box<ClientError>,
    },

    #[error("invalid connection options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    #[error("connection is closed")]
    Closed,
}

impl ClientError {
    pub fn in_table(self, table: impl Into<String>) -> Self {
        Self::Table {
            table: table.into(),
            source: Box::new(self),
        }
    }

    /// The error with all [`ClientError::Table`] layers removed.
    pub fn root(&self) -> &ClientError {
        let mut err = self;
        while let Self::Table { source, .. } = err {
            err = &**source;
        }
        err
    }

    /// The innermost decode error, if this is one.
    pub fn decode_root_cause(&self) -> Option<&DecodeError> {
        match self.root() {
            Self::Decode(e) => Some(e.root_cause()),
            _ => None,
        }
    }
}
