//! Core type definitions used across the BurnLink workspace.

pub mod id;

pub use id::{DEFAULT_TOKEN_BYTES, EventId, LinkId, LinkIdError, MIN_TOKEN_BYTES, WatermarkId};
