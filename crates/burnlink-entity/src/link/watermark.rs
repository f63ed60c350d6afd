//! Watermark placements produced by the overlay editor.

use serde::{Deserialize, Serialize};

use burnlink_core::types::id::WatermarkId;

/// A watermark position relative to the document render area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatermarkPlacement {
    /// Placement id, unique within one link.
    pub id: WatermarkId,
    /// Horizontal position in percent of the render width.
    pub x_percent: f64,
    /// Vertical position in percent of the render height.
    pub y_percent: f64,
}

impl WatermarkPlacement {
    /// Whether both coordinates are finite and within `[0, 100]`.
    pub fn is_within_bounds(&self) -> bool {
        in_range(self.x_percent) && in_range(self.y_percent)
    }
}

fn in_range(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Editor output for one watermark. The id is optional; a fresh one is
/// assigned when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewWatermark {
    /// Placement id chosen by the editor.
    #[serde(default)]
    pub id: Option<WatermarkId>,
    /// Horizontal position in percent.
    pub x_percent: f64,
    /// Vertical position in percent.
    pub y_percent: f64,
}

impl NewWatermark {
    /// Editor output without an id.
    pub fn at(x_percent: f64, y_percent: f64) -> Self {
        Self {
            id: None,
            x_percent,
            y_percent,
        }
    }

    /// Resolve into a placement, assigning an id when needed.
    pub fn into_placement(self) -> WatermarkPlacement {
        WatermarkPlacement {
            id: self.id.unwrap_or_default(),
            x_percent: self.x_percent,
            y_percent: self.y_percent,
        }
    }
}
