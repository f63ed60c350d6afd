//! # burnlink-entity
//!
//! Domain entity models for BurnLink. [`link::LinkRecord`] is the unit of
//! persistence; the remaining types are value objects it is built from or
//! projections handed to callers. All entities derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize`.

pub mod link;

pub use link::{
    DestructionCause, DestructionPolicy, Document, LinkOverview, LinkRecord, LinkState,
    LinkSummary, NewWatermark, RenderPayload, Tombstone, WatermarkPlacement,
};
