//! SQL-backed store implementations.

pub mod link;

pub use link::SqliteLinkStore;
