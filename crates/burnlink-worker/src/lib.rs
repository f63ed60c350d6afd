//! Background work for BurnLink.
//!
//! The [`ExpirySweeper`] ticks every opened link so time-boxed links are
//! destroyed even when no viewer polls them, finishes single-view
//! destructions that did not land, and purges old tombstones.

pub mod sweeper;

pub use sweeper::{ExpirySweeper, SweepReport};
