//! Change notifications and live queries.
//!
//! # Responsibility
//! - Publish one `ChangeSet` per committed write, scoped by collection.
//! - Re-run subscribed queries when a watched collection changes.
//!
//! # Invariants
//! - Revisions are strictly increasing per bus.
//! - A write that commits nothing publishes nothing.

mod bus;
mod query;

pub use bus::{ChangeBus, ChangeSet, Collection};
pub use query::LiveQuery;
