//! Core types shared across the ember crates.
//!
//! Everything here is plain data: colors and palettes, viewport bounds,
//! animation speed presets and the particle field configuration. Rendering
//! and randomness live in `ember-field`.

mod bounds;
mod color;
mod field;
mod speed;

pub use bounds::Bounds;
pub use color::{Palette, PaletteEntry, Rgb};
pub use field::{FieldConfig, FieldVariant, MAX_PARTICLES};
pub use speed::AnimationSpeed;
