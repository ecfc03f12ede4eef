use super::{AlgebraicType, AlgebraicValue, Typespace};
use crate::codec::{BsatnReader, BsatnWriter};
use crate::error::{DecodeError, EncodeError};

/// Nesting bound for composite values and reference hops.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Serializes and deserializes [`AlgebraicValue`]s by walking an [`AlgebraicType`].
///
/// References are resolved through the borrowed typespace. The walker holds no
/// other state, so one may be shared freely.
#[derive(Clone, Copy, Debug)]
pub struct TypeWalker<'t> {
    pub(super) typespace: &'t Typespace,
    pub(super) max_depth: usize,
}

impl<'t> TypeWalker<'t> {
    pub fn new(typespace: &'t Typespace) -> Self {
        Self {
            typespace,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    pub fn serialize(
        &self,
        ty: &AlgebraicType,
        value: &AlgebraicValue,
        w: &mut BsatnWriter,
    ) -> Result<(), EncodeError> {
        self.ser(ty, value, w, 0)
    }

    pub fn deserialize(
        &self,
        ty: &AlgebraicType,
        r: &mut BsatnReader,
    ) -> Result<AlgebraicValue, DecodeError> {
        self.de(ty, r, 0)
    }
}

/// Serializes a value of a type that contains no references.
pub fn serialize(
    ty: &AlgebraicType,
    value: &AlgebraicValue,
    w: &mut BsatnWriter,
) -> Result<(), EncodeError> {
    let typespace = Typespace::new();
    TypeWalker::new(&typespace).serialize(ty, value, w)
}

/// Deserializes a value of a type that contains no references.
pub fn deserialize(ty: &AlgebraicType, r: &mut BsatnReader) -> Result<AlgebraicValue, DecodeError> {
    let typespace = Typespace::new();
    TypeWalker::new(&typespace).deserialize(ty, r)
}
