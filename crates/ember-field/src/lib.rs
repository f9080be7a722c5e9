//! Particle field animation for ember.
//!
//! A fixed population of particles drifts upward through a viewport,
//! respawning at the bottom when it leaves the top and wrapping across the
//! sides. The constellation variant also joins nearby particles with faint
//! lines. Fields are driven by a [`FrameLoop`] that the host ticks once per
//! frame and can stop through a [`StopHandle`].

mod chars;
mod color;
mod field;
mod particle;
mod random;
mod schedule;
mod state;
mod surface;

pub use color::{shade, to_color};
pub use field::{Link, Links, ParticleField, Population, link_opacity};
pub use particle::{ElementHandle, Particle};
pub use random::{RandomSource, SeededRandom, time_seed};
pub use schedule::{FRAME_INTERVAL_MS, FrameLoop, FrameStatus, MAX_CATCHUP_FRAMES, StopHandle};
pub use state::{FieldOptions, FieldState};
pub use surface::{
    Canvas2d, DrawCommand, ElementHost, GlyphLayer, Scene, SceneWidget, apply_transforms,
    draw_canvas,
};
