//! Protected link entities.

pub mod document;
pub mod model;
pub mod payload;
pub mod policy;
pub mod summary;
pub mod tombstone;
pub mod watermark;

pub use document::Document;
pub use model::{LinkRecord, LinkState};
pub use payload::RenderPayload;
pub use policy::DestructionPolicy;
pub use summary::{LinkOverview, LinkSummary};
pub use tombstone::{DestructionCause, Tombstone};
pub use watermark::{NewWatermark, WatermarkPlacement};
