use super::{AlgebraicTypeKind, AlgebraicTypeRef};
use itertools::Itertools;
use std::sync::Arc;

/// A description of how a value is laid out in BSATN.
///
/// Composite nodes hold their children behind [`Arc`], so a type graph is
/// cheap to clone and may be shared by any number of concurrent encoders and
/// decoders. A type graph is never mutated after construction.
///
/// Recursive schemas go through [`AlgebraicType::Ref`] and a [`super::Typespace`].
#[derive(Debug, Clone, PartialEq)]
pub enum AlgebraicType {
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
    U128,
    I128,
    U256,
    I256,
    F32,
    F64,
    String,
    Bytes,

    Timestamp,
    TimeDuration,
    ConnectionId,
    Identity,

    Sum(Arc<SumType>),
    Struct(Arc<StructType>),
    Array(Arc<AlgebraicType>),
    Map(Arc<MapType>),
    Tuple(Arc<TupleType>),

    Ref(AlgebraicTypeRef),
}

/// A tagged union. The wire tag of a variant is its index in `variants`.
#[derive(Debug, Clone, PartialEq)]
pub struct SumType {
    pub name: Option<String>,
    pub variants: Vec<SumVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SumVariant {
    pub name: String,
    pub ty: AlgebraicType,
}

/// A record. Fields are written in declaration order; names never reach the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub name: Option<String>,
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: AlgebraicType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    pub key: AlgebraicType,
    pub value: AlgebraicType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub name: Option<String>,
    pub elems: Vec<AlgebraicType>,
}

pub const OPTION_SOME: &str = "some";
pub const OPTION_NONE: &str = "none";

/* Constructors. */
impl AlgebraicType {
    pub fn sum<N, V>(name: impl Into<String>, variants: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<AlgebraicType>,
    {
        let variants = variants
            .into_iter()
            .map(|(name, ty)| SumVariant {
                name: name.into(),
                ty: ty.into(),
            })
            .collect();
        Self::Sum(Arc::new(SumType {
            name: Some(name.into()),
            variants,
        }))
    }

    /// `some`(T) at tag 0 and `none`(Unit) at tag 1.
    pub fn option(some: AlgebraicType) -> Self {
        Self::Sum(Arc::new(SumType {
            name: None,
            variants: vec![
                SumVariant {
                    name: OPTION_SOME.into(),
                    ty: some,
                },
                SumVariant {
                    name: OPTION_NONE.into(),
                    ty: AlgebraicType::Unit,
                },
            ],
        }))
    }

    pub fn struct_type<N, V>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, V)>,
    ) -> Self
    where
        N: Into<String>,
        V: Into<AlgebraicType>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, ty)| StructField {
                name: name.into(),
                ty: ty.into(),
            })
            .collect();
        Self::Struct(Arc::new(StructType {
            name: Some(name.into()),
            fields,
        }))
    }

    pub fn array(elem: AlgebraicType) -> Self {
        Self::Array(Arc::new(elem))
    }

    pub fn map(key: AlgebraicType, value: AlgebraicType) -> Self {
        Self::Map(Arc::new(MapType { key, value }))
    }

    pub fn tuple(elems: impl IntoIterator<Item = AlgebraicType>) -> Self {
        Self::Tuple(Arc::new(TupleType {
            name: None,
            elems: elems.into_iter().collect(),
        }))
    }
}

impl From<AlgebraicTypeRef> for AlgebraicType {
    fn from(r: AlgebraicTypeRef) -> Self {
        Self::Ref(r)
    }
}

/* Inspection. */
impl AlgebraicType {
    pub fn kind(&self) -> AlgebraicTypeKind {
        match self {
            Self::Unit => AlgebraicTypeKind::Unit,
            Self::Bool => AlgebraicTypeKind::Bool,
            Self::U8 => AlgebraicTypeKind::U8,
            Self::I8 => AlgebraicTypeKind::I8,
            Self::U16 => AlgebraicTypeKind::U16,
            Self::I16 => AlgebraicTypeKind::I16,
            Self::U32 => AlgebraicTypeKind::U32,
            Self::I32 => AlgebraicTypeKind::I32,
            Self::U64 => AlgebraicTypeKind::U64,
            Self::I64 => AlgebraicTypeKind::I64,
            Self::U128 => AlgebraicTypeKind::U128,
            Self::I128 => AlgebraicTypeKind::I128,
            Self::U256 => AlgebraicTypeKind::U256,
            Self::I256 => AlgebraicTypeKind::I256,
            Self::F32 => AlgebraicTypeKind::F32,
            Self::F64 => AlgebraicTypeKind::F64,
            Self::String => AlgebraicTypeKind::String,
            Self::Bytes => AlgebraicTypeKind::Bytes,
            Self::Timestamp => AlgebraicTypeKind::Timestamp,
            Self::TimeDuration => AlgebraicTypeKind::TimeDuration,
            Self::ConnectionId => AlgebraicTypeKind::ConnectionId,
            Self::Identity => AlgebraicTypeKind::Identity,
            Self::Sum(_) => AlgebraicTypeKind::Sum,
            Self::Struct(_) => AlgebraicTypeKind::Struct,
            Self::Array(_) => AlgebraicTypeKind::Array,
            Self::Map(_) => AlgebraicTypeKind::Map,
            Self::Tuple(_) => AlgebraicTypeKind::Tuple,
            Self::Ref(_) => AlgebraicTypeKind::Ref,
        }
    }

    /// A human-readable name, for error messages and logs.
    pub fn type_name(&self) -> String {
        match self {
            Self::Sum(sum) => match (&sum.name, sum.option_payload()) {
                (Some(name), _) => name.clone(),
                (None, Some(some)) => format!("Option<{}>", some.type_name()),
                (None, None) => format!(
                    "Sum<{}>",
                    sum.variants.iter().map(|v| v.name.as_str()).join(" | ")
                ),
            },
            Self::Struct(st) => match &st.name {
                Some(name) => name.clone(),
                None => format!(
                    "{{{}}}",
                    st.fields
                        .iter()
                        .map(|f| format!("{}: {}", f.name, f.ty.type_name()))
                        .join(", ")
                ),
            },
            Self::Array(elem) => format!("Array<{}>", elem.type_name()),
            Self::Map(map) => format!("Map<{}, {}>", map.key.type_name(), map.value.type_name()),
            Self::Tuple(tup) => match &tup.name {
                Some(name) => name.clone(),
                None => format!("({})", tup.elems.iter().map(|e| e.type_name()).join(", ")),
            },
            Self::Ref(r) => r.to_string(),
            _ => format!("{:?}", self.kind()),
        }
    }

    pub fn is_byte_array(&self) -> bool {
        matches!(self, Self::Array(elem) if **elem == AlgebraicType::U8)
    }
}

impl SumType {
    /// The `some` payload type, if this sum is exactly `some`(T) | `none`(Unit).
    pub fn option_payload(&self) -> Option<&AlgebraicType> {
        match &self.variants[..] {
            [some, none]
                if some.name == OPTION_SOME
                    && none.name == OPTION_NONE
                    && none.ty == AlgebraicType::Unit =>
            {
                Some(&some.ty)
            }
            _ => None,
        }
    }

    pub fn is_option(&self) -> bool {
        self.option_payload().is_some()
    }

    pub fn variant_tag(&self, name: &str) -> Option<u8> {
        let idx = self.variants.iter().position(|v| v.name == name)?;
        u8::try_from(idx).ok()
    }
}
