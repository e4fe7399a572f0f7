//! Panel records placed on the layout canvas.

use serde::{Deserialize, Serialize};

/// Canvas coordinates in pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    /// Creates a new canvas point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn offset_from(&self, other: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(self.x - other.x, self.y - other.y)
    }
}

/// One solar panel on the canvas.
///
/// Position and size are in pixels. The id is assigned by the
/// [`PanelStore`](crate::panel_store::PanelStore) and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
}

impl Panel {
    /// Creates an unselected panel.
    pub fn new(id: u64, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            selected: false,
        }
    }

    /// Inclusive point-in-rectangle test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Top-left corner.
    pub fn origin(&self) -> CanvasPoint {
        CanvasPoint::new(self.x, self.y)
    }

    /// Center point.
    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }
}
