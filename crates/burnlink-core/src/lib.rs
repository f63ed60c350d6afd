//! # burnlink-core
//!
//! Core crate for BurnLink. Contains configuration schemas, the link
//! token and other typed identifiers, domain events, the notification
//! sink trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other BurnLink crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, InvalidInputReason};
pub use result::AppResult;
