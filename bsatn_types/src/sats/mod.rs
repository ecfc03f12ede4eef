//! # Algebraic types
//!
//! An [`AlgebraicType`] describes the shape of a value, and a [`TypeWalker`]
//! reads or writes [`AlgebraicValue`]s of that shape.
//!
//! ```text
//! Sum {
//!     tag:        u8,                 // zero-based variant index
//!     payload:    variants[tag],
//! }
//!
//! Struct {
//!     field_0:    fields[0],          // declaration order; names are not written
//!     ...
//! }
//!
//! Array<U8> {
//!     len:        u32,
//!     bytes:      [u8; len],
//! }
//!
//! Array<T> or Map<K, V> {
//!     count:      u32,
//!     elems:      [T; count] or [(K, V); count],
//! }
//!
//! Tuple {
//!     elem_0:     elems[0],
//!     ...
//! }
//! ```
//!
//! `Option<T>` is the sum `some(T) | none(Unit)`, so `some` is tag 0 followed
//! by the payload, and `none` is tag 1 alone.

mod algebraic_type;
mod de;
mod kind;
mod ser;
mod typespace;
mod value;
mod walker;


pub use algebraic_type::*;
pub use kind::*;
pub use typespace::*;
pub use value::*;
pub use walker::*;
