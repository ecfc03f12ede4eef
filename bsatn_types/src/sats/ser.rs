use super::{
    AlgebraicType, AlgebraicValue, MapType, StructType, StructValue, SumType, SumValue, TupleType,
    TypeWalker,
};
use crate::codec::BsatnWriter;
use crate::error::EncodeError;

type T = AlgebraicType;
type V = AlgebraicValue;

impl TypeWalker<'_> {
    pub(super) fn ser(
        &self,
        ty: &AlgebraicType,
        value: &AlgebraicValue,
        w: &mut BsatnWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if depth > self.max_depth {
            return Err(EncodeError::TooDeep {
                limit: self.max_depth,
            });
        }
        match (ty, value) {
            (T::Unit, V::Unit) => {}
            (T::Bool, V::Bool(v)) => w.put_bool(*v),
            (T::U8, V::U8(v)) => w.put_u8(*v),
            (T::I8, V::I8(v)) => w.put_i8(*v),
            (T::U16, V::U16(v)) => w.put_u16(*v),
            (T::I16, V::I16(v)) => w.put_i16(*v),
            (T::U32, V::U32(v)) => w.put_u32(*v),
            (T::I32, V::I32(v)) => w.put_i32(*v),
            (T::U64, V::U64(v)) => w.put_u64(*v),
            (T::I64, V::I64(v)) => w.put_i64(*v),
            (T::U128, V::U128(v)) => w.put_u128(*v),
            (T::I128, V::I128(v)) => w.put_i128(*v),
            (T::U256, V::U256(v)) => w.put_u256(*v),
            (T::I256, V::I256(v)) => w.put_i256(*v),
            (T::F32, V::F32(v)) => w.put_f32(*v),
            (T::F64, V::F64(v)) => w.put_f64(*v),
            (T::String, V::String(s)) => w.put_string(s)?,
            (T::Bytes, V::Bytes(b)) => w.put_bytes(b)?,

            (T::Timestamp, V::Timestamp(t)) => w.put_i64(t.micros_since_unix_epoch()),
            (T::TimeDuration, V::TimeDuration(d)) => w.put_i64(d.micros()),
            (T::ConnectionId, V::ConnectionId(c)) => w.put_u128(**c),
            (T::Identity, V::Identity(id)) => w.put_u256(**id),

            (T::Sum(sum), V::Sum(sv)) => self.ser_sum(ty, sum, sv, w, depth)?,
            (T::Struct(st), V::Struct(sv)) => self.ser_struct(ty, st, sv, w, depth)?,
            (T::Array(elem), V::Bytes(b)) if **elem == T::U8 => w.put_bytes(b)?,
            (T::Array(elem), V::Array(elems)) => self.ser_array(ty, elem, elems, w, depth)?,
            (T::Map(map), V::Map(pairs)) => self.ser_map(ty, map, pairs, w, depth)?,
            (T::Tuple(tup), V::Tuple(elems)) => self.ser_tuple(ty, tup, elems, w, depth)?,

            (T::Ref(r), _) => {
                let target = self
                    .typespace
                    .get(*r)
                    .ok_or(EncodeError::UnresolvedRef(*r))?;
                self.ser(target, value, w, depth + 1)?
            }

            _ => {
                return Err(EncodeError::TypeMismatch {
                    type_name: ty.type_name(),
                    expected: ty.kind(),
                    got: value.kind(),
                })
            }
        }
        Ok(())
    }

    fn ser_sum(
        &self,
        ty: &AlgebraicType,
        sum: &SumType,
        sv: &SumValue,
        w: &mut BsatnWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        let variant =
            sum.variants
                .get(sv.tag as usize)
                .ok_or_else(|| EncodeError::InvalidVariant {
                    type_name: ty.type_name(),
                    tag: sv.tag,
                    variant_count: sum.variants.len(),
                })?;
        w.put_u8(sv.tag);
        self.ser(&variant.ty, &sv.value, w, depth + 1)
            .map_err(|e| e.context(format!("variant `{}` of {}", variant.name, ty.type_name())))
    }

    fn ser_struct(
        &self,
        ty: &AlgebraicType,
        st: &StructType,
        sv: &StructValue,
        w: &mut BsatnWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        for field in st.fields.iter() {
            let value = sv
                .field(&field.name)
                .ok_or_else(|| EncodeError::MissingField {
                    type_name: ty.type_name(),
                    field: field.name.clone(),
                })?;
            self.ser(&field.ty, value, w, depth + 1)
                .map_err(|e| e.context(format!("field `{}` of {}", field.name, ty.type_name())))?;
        }
        Ok(())
    }

    fn ser_array(
        &self,
        ty: &AlgebraicType,
        elem_ty: &AlgebraicType,
        elems: &[AlgebraicValue],
        w: &mut BsatnWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if *elem_ty == T::U8 {
            // Byte arrays are one length-prefixed run, whichever value form they came in.
            let mut bytes = Vec::with_capacity(elems.len());
            for (i, elem) in elems.iter().enumerate() {
                let byte = elem.as_u8().ok_or_else(|| {
                    EncodeError::TypeMismatch {
                        type_name: elem_ty.type_name(),
                        expected: elem_ty.kind(),
                        got: elem.kind(),
                    }
                    .context(format!("element {} of {}", i, ty.type_name()))
                })?;
                bytes.push(byte);
            }
            return w.put_bytes(&bytes);
        }
        w.put_len(elems.len())?;
        for (i, elem) in elems.iter().enumerate() {
            self.ser(elem_ty, elem, w, depth + 1)
                .map_err(|e| e.context(format!("element {} of {}", i, ty.type_name())))?;
        }
        Ok(())
    }

    fn ser_map(
        &self,
        ty: &AlgebraicType,
        map: &MapType,
        pairs: &[(AlgebraicValue, AlgebraicValue)],
        w: &mut BsatnWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        w.put_len(pairs.len())?;
        for (i, (k, v)) in pairs.iter().enumerate() {
            self.ser(&map.key, k, w, depth + 1)
                .map_err(|e| e.context(format!("key {} of {}", i, ty.type_name())))?;
            self.ser(&map.value, v, w, depth + 1)
                .map_err(|e| e.context(format!("value {} of {}", i, ty.type_name())))?;
        }
        Ok(())
    }

    fn ser_tuple(
        &self,
        ty: &AlgebraicType,
        tup: &TupleType,
        elems: &[AlgebraicValue],
        w: &mut BsatnWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if elems.len() != tup.elems.len() {
            return Err(EncodeError::ArityMismatch {
                type_name: ty.type_name(),
                expected: tup.elems.len(),
                got: elems.len(),
            });
        }
        for (i, (elem_ty, elem)) in tup.elems.iter().zip(elems).enumerate() {
            self.ser(elem_ty, elem, w, depth + 1)
                .map_err(|e| e.context(format!("element {} of {}", i, ty.type_name())))?;
        }
        Ok(())
    }
}
