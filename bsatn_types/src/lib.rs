pub mod codec;
pub mod domain;
pub mod error;
pub mod sats;
mod serializable;

mod serializable_test;

pub use error::{DecodeError, EncodeError, ParseHexError, SchemaError, UnsupportedFeature};
pub use serializable::*;
