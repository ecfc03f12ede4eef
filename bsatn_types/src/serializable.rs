//! Statically typed BSATN, for types whose layout is known at compile time.
//!
//! These produce exactly the bytes that [`crate::sats::TypeWalker`] produces
//! for the corresponding [`crate::sats::AlgebraicType`].

use crate::codec::{BsatnReader, BsatnWriter};
use crate::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
use crate::error::{DecodeError, EncodeError};
use ethnum::{I256, U256};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

pub trait Ser {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError>;

    fn ser_solo(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = BsatnWriter::new();
        self.ser(&mut w)?;
        Ok(w.into_vec())
    }
}

pub trait Deser: Sized {
    /// The fewest bytes a value can take on the wire. Zero when unknown.
    const MIN_LEN: usize = 0;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError>;

    /// Decodes one value that must span the whole buffer.
    fn deser_solo(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut r = BsatnReader::new(buf);
        let moi = Self::deser(&mut r)?;
        if !r.is_exhausted() {
            return Err(DecodeError::TrailingBytes {
                remaining: r.remaining(),
            });
        }
        Ok(moi)
    }
}

/* Tags. */

/// A fieldless enum whose discriminant is its one-byte wire tag.
pub trait WireTag: FromPrimitive + ToPrimitive + Copy {
    const TYPE_NAME: &'static str;
    const VARIANT_COUNT: usize;
}

pub fn put_tag<E: WireTag>(w: &mut BsatnWriter, tag: E) -> Result<(), EncodeError> {
    let byte = tag.to_u8().ok_or_else(|| EncodeError::InvalidVariant {
        type_name: E::TYPE_NAME.into(),
        tag: u8::MAX,
        variant_count: E::VARIANT_COUNT,
    })?;
    w.put_u8(byte);
    Ok(())
}

pub fn get_tag<E: WireTag>(r: &mut BsatnReader) -> Result<E, DecodeError> {
    let tag = r.get_u8()?;
    E::from_u8(tag).ok_or_else(|| DecodeError::InvalidDiscriminant {
        type_name: E::TYPE_NAME.into(),
        tag,
        variant_count: E::VARIANT_COUNT,
    })
}

#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, FromPrimitive, ToPrimitive)]
pub enum OptionTag {
    Some = 0,
    None = 1,
}
impl WireTag for OptionTag {
    const TYPE_NAME: &'static str = "Option";
    const VARIANT_COUNT: usize = 2;
}

/* Primitives. */

macro_rules! primitive_serde {
    ($($t:ty => $put:ident, $get:ident;)*) => {
        $(
            impl Ser for $t {
                fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
                    w.$put(*self);
                    Ok(())
                }
            }
            impl Deser for $t {
                const MIN_LEN: usize = std::mem::size_of::<$t>();

                fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
                    r.$get()
                }
            }
        )*
    };
}

primitive_serde! {
    bool => put_bool, get_bool;
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16, get_u16;
    i16 => put_i16, get_i16;
    u32 => put_u32, get_u32;
    i32 => put_i32, get_i32;
    u64 => put_u64, get_u64;
    i64 => put_i64, get_i64;
    u128 => put_u128, get_u128;
    i128 => put_i128, get_i128;
    U256 => put_u256, get_u256;
    I256 => put_i256, get_i256;
    f32 => put_f32, get_f32;
    f64 => put_f64, get_f64;
}

impl Ser for () {
    fn ser(&self, _w: &mut BsatnWriter) -> Result<(), EncodeError> {
        Ok(())
    }
}
impl Deser for () {
    fn deser(_r: &mut BsatnReader) -> Result<Self, DecodeError> {
        Ok(())
    }
}

impl Ser for String {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_string(self)
    }
}
impl Ser for str {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_string(self)
    }
}
impl Deser for String {
    const MIN_LEN: usize = 4;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        r.get_string()
    }
}

/* Containers. */

/// A `u32` count, then each element. For `u8` elements this is the same byte
/// layout as a length-prefixed byte run.
impl<T: Ser> Ser for [T] {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_len(self.len())?;
        for (i, elem) in self.iter().enumerate() {
            elem.ser(w)
                .map_err(|e| e.context(format!("element {}", i)))?;
        }
        Ok(())
    }
}
impl<T: Ser> Ser for Vec<T> {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.as_slice().ser(w)
    }
}
impl<T: Deser> Deser for Vec<T> {
    const MIN_LEN: usize = 4;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let count = r.get_u32()? as usize;
        r.check_count(count, T::MIN_LEN)?;
        let mut elems = Vec::with_capacity(count.min(r.remaining()));
        for i in 0..count {
            let elem = T::deser(r).map_err(|e| e.context(format!("element {}", i)))?;
            elems.push(elem);
        }
        Ok(elems)
    }
}

/// `some` is tag 0 then the payload; `none` is tag 1 alone.
impl<T: Ser> Ser for Option<T> {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        match self {
            Some(v) => {
                put_tag(w, OptionTag::Some)?;
                v.ser(w)
            }
            None => put_tag(w, OptionTag::None),
        }
    }
}
impl<T: Deser> Deser for Option<T> {
    const MIN_LEN: usize = 1;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        match get_tag(r)? {
            OptionTag::Some => Ok(Some(T::deser(r)?)),
            OptionTag::None => Ok(None),
        }
    }
}

/* Domain wrappers. */

impl Ser for Identity {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_u256(**self);
        Ok(())
    }
}
impl Deser for Identity {
    const MIN_LEN: usize = 32;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        Ok(Self::from(r.get_u256()?))
    }
}

impl Ser for ConnectionId {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_u128(**self);
        Ok(())
    }
}
impl Deser for ConnectionId {
    const MIN_LEN: usize = 16;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        Ok(Self::from(r.get_u128()?))
    }
}

impl Ser for Timestamp {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_i64(self.micros_since_unix_epoch());
        Ok(())
    }
}
impl Deser for Timestamp {
    const MIN_LEN: usize = 8;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        Ok(Self::from_micros_since_unix_epoch(r.get_i64()?))
    }
}

impl Ser for TimeDuration {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_i64(self.micros());
        Ok(())
    }
}
impl Deser for TimeDuration {
    const MIN_LEN: usize = 8;

    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        Ok(Self::from_micros(r.get_i64()?))
    }
}
