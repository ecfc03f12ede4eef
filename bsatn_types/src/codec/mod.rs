//! # Serialization format
//!
//! BSATN values carry no self-description; the reader must already know the
//! shape being read. All multi-byte integers are little-endian.
//!
//! ```text
//! bool:           u8                  // 0 is false, anything else is true
//! u8 .. u64:      [u8; width]
//! i8 .. i64:      [u8; width]         // two's complement
//! f32, f64:       [u8; width]         // IEEE 754 bits
//!
//! u128 {
//!     limb_0:     u64,                // least significant
//!     limb_1:     u64,
//! }
//! i128 {
//!     limb_0:     u64,                // raw bits, read as unsigned
//!     limb_1:     i64,                // only the top limb carries the sign
//! }
//! u256 {
//!     limb_0..limb_3: u64,
//! }
//! i256 {
//!     limb_0:     u64,
//!     limb_1:     u64,
//!     limb_2:     u64,
//!     limb_3:     i64,                // contributes `limb_3 << 192`
//! }
//!
//! bytes or string {
//!     len:        u32,                // byte count, not character count
//!     body:       [u8; len],
//! }
//! ```
//!
//! Composite shapes (sums, structs, arrays, maps, tuples) are laid out by
//! [`crate::sats`] on top of these primitives.

mod reader;
mod wide;
mod writer;


pub use reader::*;
pub use writer::*;
