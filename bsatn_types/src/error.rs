//! Error types for encoding and decoding.

use crate::sats::{AlgebraicTypeKind, AlgebraicTypeRef};
use std::string::FromUtf8Error;
use thiserror::Error;

/// A protocol feature that is recognized on the wire but deliberately not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedFeature {
    BrotliCompression,
    GzipCompression,
    TransactionUpdateLight,
}

impl std::fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BrotliCompression => "brotli compression",
            Self::GzipCompression => "gzip compression",
            Self::TransactionUpdateLight => "TransactionUpdateLight message",
        };
        f.write_str(s)
    }
}

/// Errors while reading BSATN.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A read would go past the end of the buffer.
    #[error("read out of bounds: need {needed} bytes at offset {offset}, buffer has {len}")]
    OutOfBounds {
        needed: usize,
        offset: usize,
        len: usize,
    },

    #[error("invalid discriminant {tag} for {type_name} ({variant_count} variants)")]
    InvalidDiscriminant {
        type_name: String,
        tag: u8,
        variant_count: usize,
    },

    #[error("unsupported: {0}")]
    Unsupported(UnsupportedFeature),

    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("{remaining} trailing bytes after value")]
    TrailingBytes { remaining: usize },

    #[error("row deserializer for {table} consumed no bytes at offset {offset}")]
    EmptyRow { table: String, offset: usize },

    #[error("unresolved type reference {0}")]
    UnresolvedRef(AlgebraicTypeRef),

    #[error("nesting deeper than {limit}")]
    TooDeep { limit: usize },

    /// A count at `offset` claims more elements than the rest of the buffer can hold.
    #[error("{count} elements of at least {min_elem_len} bytes at offset {offset}, but only {remaining} bytes remain")]
    CountExceedsInput {
        count: usize,
        min_elem_len: usize,
        offset: usize,
        remaining: usize,
    },

    #[error("{count} empty elements exceed the remaining budget of {limit}")]
    TooManyEmptyElements { count: usize, limit: usize },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all [`DecodeError::Context`] layers removed.
    pub fn root_cause(&self) -> &DecodeError {
        let mut err = self;
        while let Self::Context { source, .. } = err {
            err = &**source;
        }
        err
    }
}

/// Errors while writing BSATN.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("type mismatch for {type_name}: expected {expected:?}, got {got:?}")]
    TypeMismatch {
        type_name: String,
        expected: AlgebraicTypeKind,
        got: AlgebraicTypeKind,
    },

    #[error("{type_name}: field '{field}' missing from value")]
    MissingField { type_name: String, field: String },

    #[error("{type_name}: variant tag {tag} out of range ({variant_count} variants)")]
    InvalidVariant {
        type_name: String,
        tag: u8,
        variant_count: usize,
    },

    #[error("{type_name}: expected {expected} elements, got {got}")]
    ArityMismatch {
        type_name: String,
        expected: usize,
        got: usize,
    },

    #[error("length {len} does not fit in a u32 prefix")]
    LengthOverflow { len: usize },

    #[error("unresolved type reference {0}")]
    UnresolvedRef(AlgebraicTypeRef),

    #[error("nesting deeper than {limit}")]
    TooDeep { limit: usize },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn root_cause(&self) -> &EncodeError {
        let mut err = self;
        while let Self::Context { source, .. } = err {
            err = &**source;
        }
        err
    }
}

/// Errors found while validating a [`crate::sats::Typespace`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("type {at} references {target}, but the typespace has {len} types")]
    DanglingRef {
        at: AlgebraicTypeRef,
        target: AlgebraicTypeRef,
        len: usize,
    },

    #[error("type {0} was reserved but never defined")]
    Undefined(AlgebraicTypeRef),

    #[error("type {0} is already defined")]
    AlreadyDefined(AlgebraicTypeRef),

    #[error("no slot {target} in a typespace of {len} types")]
    UnknownRef { target: AlgebraicTypeRef, len: usize },

    #[error("type {0} is a bare reference cycle")]
    RefCycle(AlgebraicTypeRef),
}

/// Errors while parsing a hex rendering of an id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseHexError {
    #[error("expected {expected} hex digits, got {got}")]
    Length { expected: usize, got: usize },

    #[error("non-hex character at offset {offset}")]
    Digit { offset: usize },
}
