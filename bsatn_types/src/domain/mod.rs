//! Wrappers for the protocol's domain values.
//!
//! On the wire each one is just the primitive it wraps:
//!
//! ```text
//! Identity        u256    little-endian limbs
//! ConnectionId    u128    little-endian limbs
//! Timestamp       i64     microseconds since the unix epoch
//! TimeDuration    i64     microseconds
//! ```
//!
//! Hex renderings are big-endian, i.e. the reverse of the wire bytes.

mod connection_id;
mod identity;
mod time_duration;
mod timestamp;

mod domain_test;

pub use connection_id::*;
pub use identity::*;
pub use time_duration::*;
pub use timestamp::*;

use crate::error::ParseHexError;

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parses exactly `2 * N` hex digits, with an optional `0x` prefix.
fn decode_hex<const N: usize>(s: &str) -> Result<[u8; N], ParseHexError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if let Some(offset) = s.find(|c: char| !c.is_ascii_hexdigit()) {
        return Err(ParseHexError::Digit { offset });
    }
    if s.len() != N * 2 {
        return Err(ParseHexError::Length {
            expected: N * 2,
            got: s.len(),
        });
    }
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        let offset = i * 2;
        *byte = u8::from_str_radix(&s[offset..offset + 2], 16)
            .map_err(|_| ParseHexError::Digit { offset })?;
    }
    Ok(out)
}
