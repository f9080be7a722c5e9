//! Frame loop driving a particle field from host frame times.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use ember_core::{AnimationSpeed, Bounds, FieldConfig};
use log::info;

use crate::field::ParticleField;
use crate::random::{RandomSource, SeededRandom};

/// Length of one nominal frame (60 fps).
pub const FRAME_INTERVAL_MS: f32 = 1000.0 / 60.0;

/// Upper bound on frames advanced by a single tick after a stall.
pub const MAX_CATCHUP_FRAMES: f32 = 4.0;

/// Cancellation token for a [`FrameLoop`].
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop. Idempotent.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            info!("frame loop stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The host should keep requesting frames.
    Continue,
    /// The loop has been stopped; no more frames will step.
    Stopped,
}

/// A scheduled particle field.
///
/// The host calls [`FrameLoop::tick`] once per display refresh with a
/// monotonically increasing time. Dropping the loop stops its handle.
#[derive(Debug)]
pub struct FrameLoop<R = SeededRandom> {
    field: ParticleField<R>,
    stop: StopHandle,
    speed: AnimationSpeed,
    paused: bool,
    last_frame_ms: Option<u64>,
    frames: u64,
}

impl<R: RandomSource> FrameLoop<R> {
    /// Build a field on `surface` and schedule it.
    ///
    /// Returns `None` without doing anything when there is no surface to
    /// draw on.
    pub fn schedule(surface: Option<Bounds>, config: FieldConfig, rng: R) -> Option<Self> {
        let bounds = surface?;
        Some(Self::from_field(ParticleField::new(config, bounds, rng)))
    }

    pub fn from_field(field: ParticleField<R>) -> Self {
        Self {
            field,
            stop: StopHandle::new(),
            speed: AnimationSpeed::default(),
            paused: false,
            last_frame_ms: None,
            frames: 0,
        }
    }

    /// Run one frame at host time `frame_time_ms`.
    ///
    /// The first tick only establishes the time base. Later ticks advance
    /// the field by the elapsed time in nominal frames, scaled by the
    /// speed and capped at [`MAX_CATCHUP_FRAMES`].
    pub fn tick(&mut self, frame_time_ms: u64) -> FrameStatus {
        if self.stop.is_stopped() {
            return FrameStatus::Stopped;
        }

        let elapsed = match self.last_frame_ms {
            Some(last) => frame_time_ms.saturating_sub(last) as f32 / FRAME_INTERVAL_MS,
            None => 0.0,
        };
        self.last_frame_ms = Some(frame_time_ms);

        if !self.paused {
            let frames = elapsed.min(MAX_CATCHUP_FRAMES) * self.speed.multiplier();
            self.field.advance(frames);
        }
        self.frames += 1;
        FrameStatus::Continue
    }

    /// Resize the underlying field.
    pub fn resize(&mut self, bounds: Bounds) {
        self.field.resize(bounds);
    }
}

impl<R> FrameLoop<R> {
    /// A handle that stops this loop from anywhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Number of ticks run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl<R> Drop for FrameLoop<R> {
    fn drop(&mut self) {
        self.stop.stop();
    }
}

#[cfg(test)]
mod tests {
    use ember_core::FieldConfig;

    use super::*;

    fn scheduled() -> FrameLoop {
        FrameLoop::schedule(
            Some(Bounds::new(800.0, 600.0)),
            FieldConfig::default(),
            SeededRandom::new(12),
        )
        .expect("surface present")
    }

    fn ys(frame_loop: &FrameLoop) -> Vec<f32> {
        frame_loop.field().particles().iter().map(|p| p.y).collect()
    }

    #[test]
    fn test_no_surface_schedules_nothing() {
        let frame_loop =
            FrameLoop::schedule(None, FieldConfig::default(), SeededRandom::new(1));
        assert!(frame_loop.is_none());
    }

    #[test]
    fn test_first_tick_sets_time_base() {
        let mut frame_loop = scheduled();
        let before = ys(&frame_loop);
        assert_eq!(frame_loop.tick(5_000), FrameStatus::Continue);
        assert_eq!(ys(&frame_loop), before);
        assert_eq!(frame_loop.frame_count(), 1);
    }

    #[test]
    fn test_tick_matches_stepping() {
        let mut frame_loop = scheduled();
        let mut reference = frame_loop.field().clone();

        frame_loop.tick(0);
        frame_loop.tick(100); // 6 nominal frames, capped at 4
        reference.advance(MAX_CATCHUP_FRAMES);
        assert_eq!(frame_loop.field().particles(), reference.particles());
    }

    #[test]
    fn test_speed_scales_advance() {
        let mut slow = scheduled();
        slow.set_speed(AnimationSpeed::Slow);
        let mut reference = slow.field().clone();

        slow.tick(0);
        slow.tick(50);
        reference.advance(50.0 / FRAME_INTERVAL_MS * 0.5);
        assert_eq!(slow.field().particles(), reference.particles());
    }

    #[test]
    fn test_paused_loop_does_not_move() {
        let mut frame_loop = scheduled();
        frame_loop.set_paused(true);
        let before = ys(&frame_loop);
        frame_loop.tick(0);
        frame_loop.tick(16);
        assert_eq!(ys(&frame_loop), before);
        assert_eq!(frame_loop.tick(32), FrameStatus::Continue);
    }

    #[test]
    fn test_stop_handle_ends_loop() {
        let mut frame_loop = scheduled();
        let handle = frame_loop.stop_handle();
        frame_loop.tick(0);

        handle.stop();
        handle.stop();
        let before = ys(&frame_loop);
        assert_eq!(frame_loop.tick(16), FrameStatus::Stopped);
        assert_eq!(ys(&frame_loop), before);
        assert!(frame_loop.is_stopped());
    }

    #[test]
    fn test_drop_stops_handle() {
        let frame_loop = scheduled();
        let handle = frame_loop.stop_handle();
        assert!(!handle.is_stopped());
        drop(frame_loop);
        assert!(handle.is_stopped());
    }
}
