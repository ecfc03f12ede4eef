use bsatn_types::codec::{BsatnReader, BsatnWriter};
use bsatn_types::{get_tag, put_tag, DecodeError, Deser, EncodeError, Ser, WireTag};
use derive_more::{From, Into};
use num_derive::{FromPrimitive, ToPrimitive};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    CallReducer(CallReducer),
    Subscribe(Subscribe),
}

#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, FromPrimitive, ToPrimitive)]
pub enum ClientMessageTag {
    CallReducer = 0,
    Subscribe = 1,
}
impl WireTag for ClientMessageTag {
    const TYPE_NAME: &'static str = "ClientMessage";
    const VARIANT_COUNT: usize = 2;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallReducer {
    pub reducer: String,
    /// The reducer's arguments, already BSATN-encoded by the caller.
    pub args: Vec<u8>,
    pub request_id: u32,
    pub flags: CallReducerFlags,
}

/// The raw flag byte of a reducer call. Bytes with no named constant are passed through.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, From, Into)]
pub struct CallReducerFlags(pub u8);

impl CallReducerFlags {
    /// The caller is sent the full transaction update.
    pub const FULL_UPDATE: Self = Self(0);
    /// The caller is not notified of success.
    pub const NO_SUCCESS_NOTIFY: Self = Self(1);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subscribe {
    pub query_strings: Vec<String>,
    pub request_id: u32,
}

/* ClientMessage */

impl Ser for ClientMessage {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        match self {
            Self::CallReducer(m) => {
                put_tag(w, ClientMessageTag::CallReducer)?;
                m.ser(w)
            }
            Self::Subscribe(m) => {
                put_tag(w, ClientMessageTag::Subscribe)?;
                m.ser(w)
            }
        }
    }
}
impl Deser for ClientMessage {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        match get_tag(r)? {
            ClientMessageTag::CallReducer => Ok(Self::CallReducer(CallReducer::deser(r)?)),
            ClientMessageTag::Subscribe => Ok(Self::Subscribe(Subscribe::deser(r)?)),
        }
    }
}

/* CallReducer */

impl Ser for CallReducer {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_string(&self.reducer)?;
        w.put_bytes(&self.args)?;
        w.put_u32(self.request_id);
        w.put_u8(self.flags.0);
        Ok(())
    }
}
impl Deser for CallReducer {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let reducer = r.get_string()?;
        let args = r.get_bytes()?;
        let request_id = r.get_u32()?;
        let flags = CallReducerFlags(r.get_u8()?);
        Ok(Self {
            reducer,
            args,
            request_id,
            flags,
        })
    }
}

/* Subscribe */

impl Ser for Subscribe {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.query_strings.ser(w)?;
        w.put_u32(self.request_id);
        Ok(())
    }
}
impl Deser for Subscribe {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let query_strings = Vec::<String>::deser(r)?;
        let request_id = r.get_u32()?;
        Ok(Self {
            query_strings,
            request_id,
        })
    }
}
