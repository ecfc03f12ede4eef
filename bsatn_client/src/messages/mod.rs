//! # Frame format
//!
//! Client to server, one websocket binary message per command:
//!
//! ```text
//! ClientMessage {
//!     tag:        u8,             // 0 CallReducer, 1 Subscribe
//!     payload:    CallReducer | Subscribe,
//! }
//! ```
//!
//! Server to client:
//!
//! ```text
//! {
//!     compression:    u8,         // 0 none; 1 brotli and 2 gzip are rejected
//!     tag:            u8,         // 0 InitialSubscription, 1 TransactionUpdate,
//!                                 // 2 TransactionUpdateLight (rejected), 3 IdentityToken
//!     payload:        ...,
//! }
//! ```
//!
//! Every payload is a struct in the BSATN layout of [`bsatn_types::sats`].
//! Table rows travel as opaque byte runs inside [`BsatnRowList`]s and are only
//! interpreted by the table bindings.

mod client_message;
mod compression;
mod frame;
mod schema;
mod server_message;
mod update;

mod messages_test;

pub use client_message::*;
pub use compression::*;
pub use frame::*;
pub use schema::*;
pub use server_message::*;
pub use update::*;
