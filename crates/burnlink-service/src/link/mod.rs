//! Link administration and viewing.

pub mod admin;
pub mod token;
pub mod viewer;

pub use admin::{AdminService, NewLink};
pub use token::LinkService;
pub use viewer::{CaptureReport, TickResult, ViewerService};
