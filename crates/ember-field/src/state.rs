//! Particle field state management for the terminal.

use ember_core::{AnimationSpeed, Bounds, FieldConfig, FieldVariant, Rgb};
use log::debug;
use ratatui::{Frame, layout::Rect};

use crate::random::{SeededRandom, time_seed};
use crate::schedule::{FrameLoop, FrameStatus, StopHandle};
use crate::surface::{GlyphLayer, Scene, SceneWidget, apply_transforms, draw_canvas};

/// Terminal presentation settings for a [`FieldState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOptions {
    /// Seed for the first field; the clock is used when absent.
    pub seed: Option<u64>,
    pub speed: AnimationSpeed,
    /// Show a still field.
    pub reduced_motion: bool,
    /// Virtual pixels per terminal column.
    pub cell_width: f32,
    /// Virtual pixels per terminal row.
    pub cell_height: f32,
    pub background: Rgb,
    /// Alpha multiplier applied before compositing.
    pub contrast: f32,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            seed: None,
            speed: AnimationSpeed::default(),
            reduced_motion: false,
            cell_width: 8.0,
            cell_height: 16.0,
            background: Rgb::BLACK,
            contrast: 2.0,
        }
    }
}

/// Particle field animation state.
#[derive(Debug)]
pub struct FieldState {
    config: FieldConfig,
    options: FieldOptions,
    /// Scheduled loop, absent until there is an area to draw on.
    frame_loop: Option<FrameLoop>,
    /// Recorded canvas calls for the constellation variant.
    scene: Scene,
    /// Elements for the embers variant.
    glyphs: GlyphLayer,
    /// Seed of the current field.
    seed: u64,
    paused: bool,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
}

impl FieldState {
    /// Create a new field state.
    pub fn new(config: FieldConfig, options: FieldOptions) -> Self {
        Self {
            seed: options.seed.unwrap_or_else(time_seed),
            config,
            options,
            frame_loop: None,
            scene: Scene::default(),
            glyphs: GlyphLayer::default(),
            paused: false,
            last_width: 0,
            last_height: 0,
        }
    }

    /// Advance and render the field to the frame.
    pub fn render(&mut self, frame: &mut Frame, elapsed_ms: u64) {
        let area = frame.area();
        if !self.update(area, elapsed_ms) {
            return;
        }

        match self.config.variant {
            FieldVariant::Constellation => {
                let widget = SceneWidget::new(&self.scene)
                    .background(self.options.background)
                    .contrast(self.options.contrast);
                frame.render_widget(widget, area);
            }
            FieldVariant::Embers => frame.render_widget(&self.glyphs, area),
        }
    }

    /// Schedule, resize and tick the loop for `area`, then refresh the
    /// drawing surface. Returns false when there is nothing to draw.
    pub fn update(&mut self, area: Rect, elapsed_ms: u64) -> bool {
        let bounds = self.bounds_for(area);
        let dimensions_changed = area.width != self.last_width || area.height != self.last_height;
        self.last_width = area.width;
        self.last_height = area.height;

        if self.frame_loop.is_none() {
            let surface = (!area.is_empty()).then_some(bounds);
            self.frame_loop =
                FrameLoop::schedule(surface, self.config.clone(), SeededRandom::new(self.seed));
            let Some(frame_loop) = self.frame_loop.as_mut() else {
                return false;
            };
            frame_loop.set_speed(self.options.speed);
            frame_loop.set_paused(self.paused || self.options.reduced_motion);
            self.rebuild_glyphs();
        } else if dimensions_changed {
            if let Some(frame_loop) = self.frame_loop.as_mut() {
                frame_loop.resize(bounds);
            }
            if self.config.variant.uses_elements() {
                self.rebuild_glyphs();
            }
        }

        let Some(frame_loop) = self.frame_loop.as_mut() else {
            return false;
        };
        if frame_loop.tick(elapsed_ms) == FrameStatus::Stopped {
            return false;
        }

        let field = frame_loop.field();
        match self.config.variant {
            FieldVariant::Constellation => draw_canvas(field, &mut self.scene),
            FieldVariant::Embers => apply_transforms(field, &mut self.glyphs),
        }
        true
    }

    /// Switch between the constellation and embers variants.
    pub fn toggle_variant(&mut self) {
        self.config.variant = self.config.variant.toggle();
        debug!("field variant: {}", self.config.variant.name());
        self.reset();
    }

    /// Start over with a fresh seed.
    pub fn reseed(&mut self, seed: u64) {
        debug!("reseeding field with {seed}");
        self.seed = seed;
        self.reset();
    }

    /// Cycle through animation speeds.
    pub fn cycle_speed(&mut self) {
        self.options.speed = self.options.speed.next();
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.set_speed(self.options.speed);
        }
    }

    /// Pause or resume. Has no visible effect under reduced motion.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.set_paused(self.paused || self.options.reduced_motion);
        }
    }

    /// Stop the frame loop for good.
    pub fn stop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.as_ref() {
            frame_loop.stop();
        }
    }

    /// Handle to stop the current loop, if one is scheduled.
    pub fn stop_handle(&self) -> Option<StopHandle> {
        self.frame_loop.as_ref().map(FrameLoop::stop_handle)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn variant(&self) -> FieldVariant {
        self.config.variant
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.options.speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of live particles, zero before scheduling.
    pub fn particle_count(&self) -> usize {
        self.frame_loop.as_ref().map_or(0, |l| l.field().len())
    }

    /// Whether a viewport of `area` uses the compact layout.
    pub fn is_compact(&self, area: Rect) -> bool {
        self.config.is_compact(self.bounds_for(area).width)
    }

    fn bounds_for(&self, area: Rect) -> Bounds {
        Bounds::from_cells(
            area.width,
            area.height,
            self.options.cell_width,
            self.options.cell_height,
        )
    }

    /// Drop the current loop; the next update schedules a new one.
    fn reset(&mut self) {
        self.stop();
        self.frame_loop = None;
        self.scene = Scene::default();
        self.glyphs = GlyphLayer::default();
        self.last_width = 0;
        self.last_height = 0;
    }

    fn rebuild_glyphs(&mut self) {
        self.glyphs = match self.frame_loop.as_ref() {
            Some(frame_loop) if self.config.variant.uses_elements() => GlyphLayer::for_field(
                frame_loop.field(),
                self.options.cell_width,
                self.options.cell_height,
                self.options.background,
                self.options.contrast,
            ),
            _ => GlyphLayer::default(),
        };
    }
}

impl Drop for FieldState {
    fn drop(&mut self) {
        self.stop();
    }
}
