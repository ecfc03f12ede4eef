use super::{decode_hex, encode_hex};
use crate::error::ParseHexError;
use derive_more::{Deref, From, Into};
use rand::Rng;
use std::fmt;

/// Identifies one connection of a client. Zero means "no connection".
#[derive(Deref, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct ConnectionId(u128);

impl ConnectionId {
    pub const ZERO: Self = Self(0);

    /// Sixteen pseudo-bytes, each in `[0, 254]`, read as a big-endian integer.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let mut be = [0u8; 16];
        for b in be.iter_mut() {
            *b = rng.gen_range(0..0xff);
        }
        Self::from_be_bytes(be)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn none_if_zero(self) -> Option<Self> {
        (!self.is_zero()).then_some(self)
    }

    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_le_bytes(bytes))
    }
    pub fn to_le_bytes(&self) -> [u8; 16] {
        self.0.to_le_bytes()
    }
    pub fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }
    pub fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.to_be_bytes())
    }
    pub fn from_hex(s: &str) -> Result<Self, ParseHexError> {
        decode_hex(s).map(Self::from_be_bytes)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.to_hex())
    }
}
