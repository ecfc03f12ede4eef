/// The kind of an [`super::AlgebraicType`], without its nested details.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum AlgebraicTypeKind {
    Unit,
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    String,
    Bytes,
    U128,
    I128,
    U256,
    I256,

    Timestamp,
    TimeDuration,
    ConnectionId,
    Identity,

    Sum,
    Struct,
    Array,
    Map,
    Tuple,

    Ref,
}

