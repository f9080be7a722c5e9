//! Particle field configuration.

use serde::{Deserialize, Serialize};

use crate::color::{Palette, Rgb};

/// Largest particle count a config may ask for.
///
/// The constellation pass compares every pair of particles each frame, so
/// the cost grows with the square of the count.
pub const MAX_PARTICLES: usize = 500;

/// How a particle field is presented.
///
/// Both variants share the same population, drift and wrap policy; they
/// differ only in what reaches the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldVariant {
    /// Dots and proximity lines drawn onto a raster canvas.
    #[default]
    Constellation,
    /// One positioned glyph per particle, no connecting lines.
    Embers,
}

impl FieldVariant {
    /// Toggle between the two variants.
    pub fn toggle(self) -> Self {
        match self {
            FieldVariant::Constellation => FieldVariant::Embers,
            FieldVariant::Embers => FieldVariant::Constellation,
        }
    }

    /// Whether this variant runs the constellation pass.
    pub fn draws_links(self) -> bool {
        matches!(self, FieldVariant::Constellation)
    }

    /// Whether particles own an element handle.
    pub fn uses_elements(self) -> bool {
        matches!(self, FieldVariant::Embers)
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldVariant::Constellation => "constellation",
            FieldVariant::Embers => "embers",
        }
    }

    /// Parse a variant name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "constellation" | "canvas" => Some(FieldVariant::Constellation),
            "embers" | "elements" => Some(FieldVariant::Embers),
            _ => None,
        }
    }
}

/// Tunables for a particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Presentation variant.
    pub variant: FieldVariant,
    /// Particle count on wide layouts, at most [`MAX_PARTICLES`].
    pub count: usize,
    /// Fraction of `count` kept on compact layouts.
    pub compact_ratio: f32,
    /// Viewports narrower than this are compact.
    pub compact_breakpoint: f32,
    /// Smallest particle diameter.
    pub min_size: f32,
    /// Largest particle diameter (exclusive).
    pub max_size: f32,
    /// Fastest time for a particle to rise one viewport height, in seconds.
    pub min_rise_secs: f32,
    /// Slowest rise time, in seconds (exclusive).
    pub max_rise_secs: f32,
    /// Frames per second the rise time is expressed against.
    pub frame_rate: f32,
    /// Width of the horizontal jitter range, centered on zero.
    pub drift_spread: f32,
    /// How far past an edge a particle may travel before it wraps.
    pub margin: f32,
    /// Particles closer than this are joined by a line.
    pub link_distance: f32,
    /// Line opacity for two coincident particles.
    pub link_max_opacity: f32,
    /// Line stroke width.
    pub link_width: f32,
    /// Dot opacity.
    pub particle_opacity: f32,
    /// Line color.
    pub link_color: Rgb,
    /// Weighted particle colors.
    pub palette: Palette,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            variant: FieldVariant::default(),
            count: 50,
            compact_ratio: 0.5,
            compact_breakpoint: 769.0,
            min_size: 1.5,
            max_size: 4.0,
            min_rise_secs: 5.0,
            max_rise_secs: 12.0,
            frame_rate: 60.0,
            drift_spread: 0.3,
            margin: 20.0,
            link_distance: 120.0,
            link_max_opacity: 0.15,
            link_width: 0.5,
            particle_opacity: 0.6,
            link_color: Rgb::AMBER,
            palette: Palette::default(),
        }
    }
}

impl FieldConfig {
    /// Whether a viewport of this width uses the compact layout.
    pub fn is_compact(&self, width: f32) -> bool {
        width < self.compact_breakpoint
    }

    /// Particle count for a base `count`, reduced on compact layouts.
    pub fn population(&self, count: usize, compact: bool) -> usize {
        if compact {
            (count as f32 * self.compact_ratio.clamp(0.0, 1.0)).round() as usize
        } else {
            count
        }
    }
}
