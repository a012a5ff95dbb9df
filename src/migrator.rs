//! Schema migrations for the `cafe_orders` database.
//!
//! The table definitions live in the `migrations` workspace member so the
//! migration CLI and the server share one ledger.

pub use migrations::{Migrator, OrderItems, Orders};
