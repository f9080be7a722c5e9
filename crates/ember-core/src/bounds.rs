//! Viewport bounds.

use serde::{Deserialize, Serialize};

/// Size of the region a particle field lives in, in virtual pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Create bounds, clamping negative or non-finite sizes to zero.
    pub fn new(width: f32, height: f32) -> Self {
        let clean = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: clean(width),
            height: clean(height),
        }
    }

    /// Bounds covering a terminal area of `cols` x `rows` cells.
    pub fn from_cells(cols: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        Self::new(cols as f32 * cell_width, rows as f32 * cell_height)
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
