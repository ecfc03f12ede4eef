//! # Client-side table caches
//!
//! Each subscribed table is mirrored by a [`TableCache`], keyed by the BSATN
//! encoding of the row's primary key (or of the whole row, if the table has none).
//!
//! A [`TableUpdate`](crate::messages::TableUpdate) is applied per query update:
//!
//! ```text
//! for query_update in table_update.updates {
//!     read rows from inserts.rows_data until exhausted  -> insert (overwrite on same key)
//!     read rows from deletes.rows_data until exhausted  -> delete
//! }
//! ```
//!
//! Row boundaries come from the table's own row deserializer; the row list's
//! size hint is not consulted.
//!
//! Deletes run after the inserts of their own query update, so a key that is
//! inserted and deleted together ends up absent. Replacing a row in place is a
//! plain re-insert of its key.
//!
//! [`TableRegistry::apply_database_update`] decodes every table of an update
//! before it mutates any of them. A malformed row rejects the whole update.

mod binding;
mod cache;
mod dynamic;
mod registry;


pub use binding::*;
pub use cache::*;
pub use dynamic::*;
pub use registry::*;
