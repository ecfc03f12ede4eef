use bsatn_types::codec::BsatnReader;
use bsatn_types::{DecodeError, EncodeError, Ser};
use derive_more::{Deref, From, Into};
use itertools::Itertools;
use std::fmt::{self, Debug};

/// The BSATN bytes that identify a row within its table.
#[derive(Deref, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct RowKey(Vec<u8>);

impl RowKey {
    /// The key of a statically typed primary-key value.
    pub fn of<K: Ser + ?Sized>(key: &K) -> Result<Self, EncodeError> {
        Ok(Self(key.ser_solo()?))
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0.iter().map(|b| format!("{:02x}", b)).join(""))
    }
}
impl fmt::Debug for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowKey({})", self)
    }
}

/// How rows of one table are read off the wire and identified.
///
/// Generated per table by module bindings, or built at runtime with
/// [`super::DynamicBinding`].
pub trait TableBinding: Send + Sync + 'static {
    type Row: Clone + Debug + Send + Sync + 'static;

    fn table_name(&self) -> &str;

    /// Reads exactly one row.
    fn deserialize_row(&self, r: &mut BsatnReader) -> Result<Self::Row, DecodeError>;

    fn primary_key(&self, row: &Self::Row) -> Result<RowKey, EncodeError>;
}
