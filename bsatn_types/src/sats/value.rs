use super::AlgebraicTypeKind;
use crate::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
use ethnum::{I256, U256};

/// A decoded value. Its shape mirrors the [`super::AlgebraicType`] it was read with.
///
/// `Array<U8>` is always represented as [`AlgebraicValue::Bytes`] after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgebraicValue {
    Unit,
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    U128(u128),
    I128(i128),
    U256(U256),
    I256(I256),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),

    Timestamp(Timestamp),
    TimeDuration(TimeDuration),
    ConnectionId(ConnectionId),
    Identity(Identity),

    Sum(SumValue),
    Struct(StructValue),
    Array(Vec<AlgebraicValue>),
    /// Pairs in wire order. Duplicate keys are kept as they arrived.
    Map(Vec<(AlgebraicValue, AlgebraicValue)>),
    Tuple(Vec<AlgebraicValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SumValue {
    pub tag: u8,
    pub value: Box<AlgebraicValue>,
}

/// Fields by name. Their order here does not matter; the type's declaration order does.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    pub fields: Vec<(String, AlgebraicValue)>,
}

impl StructValue {
    pub fn field(&self, name: &str) -> Option<&AlgebraicValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/* Constructors. */
impl AlgebraicValue {
    pub fn sum(tag: u8, value: AlgebraicValue) -> Self {
        Self::Sum(SumValue {
            tag,
            value: Box::new(value),
        })
    }

    pub fn some(value: AlgebraicValue) -> Self {
        Self::sum(0, value)
    }

    pub fn none() -> Self {
        Self::sum(1, AlgebraicValue::Unit)
    }

    pub fn struct_of<N: Into<String>>(fields: impl IntoIterator<Item = (N, AlgebraicValue)>) -> Self {
        Self::Struct(StructValue {
            fields: fields.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        })
    }
}

/* Inspection. */
impl AlgebraicValue {
    pub fn kind(&self) -> AlgebraicTypeKind {
        match self {
            Self::Unit => AlgebraicTypeKind::Unit,
            Self::Bool(_) => AlgebraicTypeKind::Bool,
            Self::U8(_) => AlgebraicTypeKind::U8,
            Self::I8(_) => AlgebraicTypeKind::I8,
            Self::U16(_) => AlgebraicTypeKind::U16,
            Self::I16(_) => AlgebraicTypeKind::I16,
            Self::U32(_) => AlgebraicTypeKind::U32,
            Self::I32(_) => AlgebraicTypeKind::I32,
            Self::U64(_) => AlgebraicTypeKind::U64,
            Self::I64(_) => AlgebraicTypeKind::I64,
            Self::U128(_) => AlgebraicTypeKind::U128,
            Self::I128(_) => AlgebraicTypeKind::I128,
            Self::U256(_) => AlgebraicTypeKind::U256,
            Self::I256(_) => AlgebraicTypeKind::I256,
            Self::F32(_) => AlgebraicTypeKind::F32,
            Self::F64(_) => AlgebraicTypeKind::F64,
            Self::String(_) => AlgebraicTypeKind::String,
            Self::Bytes(_) => AlgebraicTypeKind::Bytes,
            Self::Timestamp(_) => AlgebraicTypeKind::Timestamp,
            Self::TimeDuration(_) => AlgebraicTypeKind::TimeDuration,
            Self::ConnectionId(_) => AlgebraicTypeKind::ConnectionId,
            Self::Identity(_) => AlgebraicTypeKind::Identity,
            Self::Sum(_) => AlgebraicTypeKind::Sum,
            Self::Struct(_) => AlgebraicTypeKind::Struct,
            Self::Array(_) => AlgebraicTypeKind::Array,
            Self::Map(_) => AlgebraicTypeKind::Map,
            Self::Tuple(_) => AlgebraicTypeKind::Tuple,
        }
    }

    /// The named field of a struct value.
    pub fn field(&self, name: &str) -> Option<&AlgebraicValue> {
        self.as_struct()?.field(name)
    }

    /// For a value of an option type: `Some(Some(v))` for `some`, `Some(None)` for `none`.
    pub fn as_option(&self) -> Option<Option<&AlgebraicValue>> {
        match self.as_sum()? {
            SumValue { tag: 0, value } => Some(Some(value)),
            SumValue { tag: 1, .. } => Some(None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_sum(&self) -> Option<&SumValue> {
        match self {
            Self::Sum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AlgebraicValue]> {
        match self {
            Self::Array(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(AlgebraicValue, AlgebraicValue)]> {
        match self {
            Self::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[AlgebraicValue]> {
        match self {
            Self::Tuple(elems) => Some(elems),
            _ => None,
        }
    }
}

/// Copy accessors and `From` conversions for the scalar variants.
macro_rules! scalar_variants {
    ($($variant:ident($t:ty) => $as_fn:ident;)*) => {
        impl AlgebraicValue {
            $(
                pub fn $as_fn(&self) -> Option<$t> {
                    match self {
                        Self::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            )*
        }
        $(
            impl From<$t> for AlgebraicValue {
                fn from(v: $t) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

scalar_variants! {
    Bool(bool) => as_bool;
    U8(u8) => as_u8;
    I8(i8) => as_i8;
    U16(u16) => as_u16;
    I16(i16) => as_i16;
    U32(u32) => as_u32;
    I32(i32) => as_i32;
    U64(u64) => as_u64;
    I64(i64) => as_i64;
    U128(u128) => as_u128;
    I128(i128) => as_i128;
    U256(U256) => as_u256;
    I256(I256) => as_i256;
    F32(f32) => as_f32;
    F64(f64) => as_f64;
    Timestamp(Timestamp) => as_timestamp;
    TimeDuration(TimeDuration) => as_time_duration;
    ConnectionId(ConnectionId) => as_connection_id;
    Identity(Identity) => as_identity;
}

impl From<String> for AlgebraicValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
impl From<&str> for AlgebraicValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}
impl From<Vec<u8>> for AlgebraicValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}
