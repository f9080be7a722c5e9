//! A single drifting particle.

use ember_core::Rgb;

/// Handle to an externally owned visual element (one per particle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

/// A drifting point in viewport space.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position, growing downward.
    pub y: f32,
    /// Horizontal drift per frame.
    pub vx: f32,
    /// Vertical drift per frame; negative values rise.
    pub vy: f32,
    /// Diameter.
    pub size: f32,
    pub color: Rgb,
    /// Visual element, present only for the element variant.
    pub handle: Option<ElementHandle>,
}

impl Particle {
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Euclidean distance to another particle.
    pub fn distance_to(&self, other: &Particle) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
