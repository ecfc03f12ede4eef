use super::{AlgebraicType, AlgebraicValue, StructValue, TypeWalker};
use crate::codec::BsatnReader;
use crate::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
use crate::error::DecodeError;

type T = AlgebraicType;
type V = AlgebraicValue;

/// References followed when sizing an element type. Past this, a reference counts as empty.
const MIN_LEN_REF_HOPS: usize = 2;

impl TypeWalker<'_> {
    pub(super) fn de(
        &self,
        ty: &AlgebraicType,
        r: &mut BsatnReader,
        depth: usize,
    ) -> Result<AlgebraicValue, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::TooDeep {
                limit: self.max_depth,
            });
        }
        let value = match ty {
            T::Unit => V::Unit,
            T::Bool => V::Bool(r.get_bool()?),
            T::U8 => V::U8(r.get_u8()?),
            T::I8 => V::I8(r.get_i8()?),
            T::U16 => V::U16(r.get_u16()?),
            T::I16 => V::I16(r.get_i16()?),
            T::U32 => V::U32(r.get_u32()?),
            T::I32 => V::I32(r.get_i32()?),
            T::U64 => V::U64(r.get_u64()?),
            T::I64 => V::I64(r.get_i64()?),
            T::U128 => V::U128(r.get_u128()?),
            T::I128 => V::I128(r.get_i128()?),
            T::U256 => V::U256(r.get_u256()?),
            T::I256 => V::I256(r.get_i256()?),
            T::F32 => V::F32(r.get_f32()?),
            T::F64 => V::F64(r.get_f64()?),
            T::String => V::String(r.get_string()?),
            T::Bytes => V::Bytes(r.get_bytes()?),

            T::Timestamp => V::Timestamp(Timestamp::from_micros_since_unix_epoch(r.get_i64()?)),
            T::TimeDuration => V::TimeDuration(TimeDuration::from_micros(r.get_i64()?)),
            T::ConnectionId => V::ConnectionId(ConnectionId::from(r.get_u128()?)),
            T::Identity => V::Identity(Identity::from(r.get_u256()?)),

            T::Sum(sum) => {
                let tag = r.get_u8()?;
                let variant = sum.variants.get(tag as usize).ok_or_else(|| {
                    DecodeError::InvalidDiscriminant {
                        type_name: ty.type_name(),
                        tag,
                        variant_count: sum.variants.len(),
                    }
                })?;
                let inner = self.de(&variant.ty, r, depth + 1).map_err(|e| {
                    e.context(format!("variant `{}` of {}", variant.name, ty.type_name()))
                })?;
                V::sum(tag, inner)
            }

            T::Struct(st) => {
                let mut fields = Vec::with_capacity(st.fields.len());
                for field in st.fields.iter() {
                    let v = self.de(&field.ty, r, depth + 1).map_err(|e| {
                        e.context(format!("field `{}` of {}", field.name, ty.type_name()))
                    })?;
                    fields.push((field.name.clone(), v));
                }
                V::Struct(StructValue { fields })
            }

            T::Array(elem) if **elem == T::U8 => V::Bytes(r.get_bytes()?),
            T::Array(elem) => {
                let count = r.get_u32()? as usize;
                r.check_count(count, self.min_len(elem, MIN_LEN_REF_HOPS))
                    .map_err(|e| e.context(ty.type_name()))?;
                // A corrupt count must not turn into a huge allocation.
                let mut elems = Vec::with_capacity(count.min(r.remaining()));
                for i in 0..count {
                    let v = self
                        .de(elem, r, depth + 1)
                        .map_err(|e| e.context(format!("element {} of {}", i, ty.type_name())))?;
                    elems.push(v);
                }
                V::Array(elems)
            }

            T::Map(map) => {
                let count = r.get_u32()? as usize;
                let min_len = self
                    .min_len(&map.key, MIN_LEN_REF_HOPS)
                    .saturating_add(self.min_len(&map.value, MIN_LEN_REF_HOPS));
                r.check_count(count, min_len)
                    .map_err(|e| e.context(ty.type_name()))?;
                let mut pairs = Vec::with_capacity(count.min(r.remaining()));
                for i in 0..count {
                    let k = self
                        .de(&map.key, r, depth + 1)
                        .map_err(|e| e.context(format!("key {} of {}", i, ty.type_name())))?;
                    let v = self
                        .de(&map.value, r, depth + 1)
                        .map_err(|e| e.context(format!("value {} of {}", i, ty.type_name())))?;
                    pairs.push((k, v));
                }
                V::Map(pairs)
            }

            T::Tuple(tup) => {
                let mut elems = Vec::with_capacity(tup.elems.len());
                for (i, elem_ty) in tup.elems.iter().enumerate() {
                    let v = self
                        .de(elem_ty, r, depth + 1)
                        .map_err(|e| e.context(format!("element {} of {}", i, ty.type_name())))?;
                    elems.push(v);
                }
                V::Tuple(elems)
            }

            T::Ref(target) => {
                let resolved = self
                    .typespace
                    .get(*target)
                    .ok_or(DecodeError::UnresolvedRef(*target))?;
                self.de(resolved, r, depth + 1)?
            }
        };
        Ok(value)
    }

    /// A lower bound on the encoded length of any value of `ty`.
    fn min_len(&self, ty: &AlgebraicType, ref_hops: usize) -> usize {
        match ty {
            T::Unit => 0,
            T::Bool | T::U8 | T::I8 => 1,
            T::U16 | T::I16 => 2,
            T::U32 | T::I32 | T::F32 => 4,
            T::U64 | T::I64 | T::F64 | T::Timestamp | T::TimeDuration => 8,
            T::U128 | T::I128 | T::ConnectionId => 16,
            T::U256 | T::I256 | T::Identity => 32,
            T::String | T::Bytes | T::Array(_) | T::Map(_) => 4,
            T::Sum(_) => 1,
            T::Struct(st) => st
                .fields
                .iter()
                .map(|f| self.min_len(&f.ty, ref_hops))
                .fold(0, usize::saturating_add),
            T::Tuple(tup) => tup
                .elems
                .iter()
                .map(|elem| self.min_len(elem, ref_hops))
                .fold(0, usize::saturating_add),
            T::Ref(target) => match (ref_hops, self.typespace.get(*target)) {
                (0, _) | (_, None) => 0,
                (_, Some(resolved)) => self.min_len(resolved, ref_hops - 1),
            },
        }
    }
}
