use super::{decode_hex, encode_hex};
use crate::error::ParseHexError;
use derive_more::{Deref, From, Into};
use ethnum::U256;
use std::fmt;

/// A 256-bit public identity of a client or module.
#[derive(Deref, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct Identity(U256);

impl Identity {
    pub const ZERO: Self = Self(U256::ZERO);

    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_le_bytes(bytes))
    }
    pub fn to_le_bytes(&self) -> [u8; 32] {
        self.0.to_le_bytes()
    }
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_be_bytes(bytes))
    }
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.to_be_bytes())
    }
    pub fn from_hex(s: &str) -> Result<Self, ParseHexError> {
        decode_hex(s).map(Self::from_be_bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_hex())
    }
}
