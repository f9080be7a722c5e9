//! The particle field: population, per-frame drift and the wrap policy.

use ember_core::{Bounds, FieldConfig, FieldVariant};
use log::debug;

use crate::particle::{ElementHandle, Particle};
use crate::random::{RandomSource, SeededRandom};

/// How many particles to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    /// Base count on wide layouts.
    pub count: usize,
    /// Compact layouts keep only `compact_ratio` of the base count.
    pub compact: bool,
}

/// A fixed population of particles drifting upward inside a viewport.
#[derive(Debug, Clone)]
pub struct ParticleField<R = SeededRandom> {
    config: FieldConfig,
    bounds: Bounds,
    particles: Vec<Particle>,
    rng: R,
    /// Set when the field was created on an empty viewport.
    collapsed: bool,
}

impl<R: RandomSource> ParticleField<R> {
    /// Create a field whose population follows the configured count and
    /// the compact breakpoint.
    pub fn new(config: FieldConfig, bounds: Bounds, rng: R) -> Self {
        let population = Population {
            count: config.count,
            compact: config.is_compact(bounds.width),
        };
        Self::init(config, bounds, population, rng)
    }

    /// Create a field with an explicit population.
    ///
    /// Empty viewports collapse every particle onto the origin with zero
    /// rise speed; the population is respawned on the first resize to a
    /// non-empty viewport.
    pub fn init(config: FieldConfig, bounds: Bounds, population: Population, mut rng: R) -> Self {
        let count = config.population(population.count, population.compact);
        let particles = (0..count)
            .map(|i| spawn(&config, bounds, i, &mut rng))
            .collect();

        debug!(
            "particle field: {count} particles ({}), {}x{}",
            config.variant.name(),
            bounds.width,
            bounds.height
        );

        Self {
            collapsed: bounds.is_empty(),
            config,
            bounds,
            particles,
            rng,
        }
    }

    /// Advance exactly one frame.
    pub fn step(&mut self) {
        self.advance(1.0);
    }

    /// Advance by a (possibly fractional) number of frames.
    ///
    /// The wrap policy runs even when nothing moves, so the field is always
    /// left in wrapped form.
    pub fn advance(&mut self, frames: f32) {
        let frames = if frames.is_finite() { frames.max(0.0) } else { 0.0 };
        let Bounds { width, height } = self.bounds;
        let margin = self.config.margin;

        for p in &mut self.particles {
            p.y += p.vy * frames;
            p.x += p.vx * frames;

            // Rising out of the top respawns at the bottom at a new x.
            if p.y < -margin {
                p.y = height + margin;
                p.x = self.rng.next_unit() * width;
            }
            if p.x < -margin {
                p.x = width + margin;
            }
            if p.x > width + margin {
                p.x = -margin;
            }
        }
    }

    /// Store new viewport bounds. Positions are not rescaled.
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        debug!(
            "particle field resized to {}x{}",
            bounds.width, bounds.height
        );
        self.bounds = bounds;

        if self.collapsed && !bounds.is_empty() {
            self.collapsed = false;
            let config = &self.config;
            let rng = &mut self.rng;
            for (i, p) in self.particles.iter_mut().enumerate() {
                *p = spawn(config, bounds, i, rng);
            }
        }
    }
}

impl<R> ParticleField<R> {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn variant(&self) -> FieldVariant {
        self.config.variant
    }

    /// Every pair of particles close enough to be joined by a line.
    ///
    /// This compares every unordered pair, which is fine for the few dozen
    /// particles a field holds. Configs are capped at
    /// [`MAX_PARTICLES`](ember_core::MAX_PARTICLES); going past that would
    /// want a spatial grid instead.
    pub fn links(&self) -> Links<'_> {
        Links {
            particles: &self.particles,
            threshold: self.config.link_distance,
            max_opacity: self.config.link_max_opacity,
            i: 0,
            j: 1,
        }
    }
}

/// Create particle `index` with the draw order color, size, rise time,
/// x, y, horizontal drift.
fn spawn<R: RandomSource>(
    config: &FieldConfig,
    bounds: Bounds,
    index: usize,
    rng: &mut R,
) -> Particle {
    let color = config.palette.pick(rng.next_unit());
    let size = rng.between(config.min_size, config.max_size);
    let rise_secs = rng.between(config.min_rise_secs, config.max_rise_secs);
    let rise_frames = rise_secs * config.frame_rate;
    let speed = if rise_frames > 0.0 {
        bounds.height / rise_frames
    } else {
        0.0
    };
    let x = rng.next_unit() * bounds.width;
    let y = rng.next_unit() * bounds.height;
    let vx = (rng.next_unit() - 0.5) * config.drift_spread;

    Particle {
        x,
        y,
        vx,
        vy: -speed,
        size,
        color,
        handle: config
            .variant
            .uses_elements()
            .then_some(ElementHandle(index)),
    }
}

/// A line between two nearby particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Index of the first particle.
    pub a: usize,
    /// Index of the second particle, always greater than `a`.
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// Iterator over the constellation pass. See [`ParticleField::links`].
#[derive(Debug, Clone)]
pub struct Links<'a> {
    particles: &'a [Particle],
    threshold: f32,
    max_opacity: f32,
    i: usize,
    j: usize,
}

impl Iterator for Links<'_> {
    type Item = Link;

    fn next(&mut self) -> Option<Link> {
        if self.threshold <= 0.0 {
            return None;
        }
        let n = self.particles.len();
        while self.i < n {
            while self.j < n {
                let (a, b) = (self.i, self.j);
                self.j += 1;
                let distance = self.particles[a].distance_to(&self.particles[b]);
                if distance < self.threshold {
                    return Some(Link {
                        a,
                        b,
                        distance,
                        opacity: link_opacity(distance, self.threshold, self.max_opacity),
                    });
                }
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }
}

/// Opacity of a line between particles `distance` apart.
///
/// `max_opacity` at zero distance, falling linearly to zero at
/// `threshold`. Non-positive thresholds never draw.
pub fn link_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    if threshold <= 0.0 || !distance.is_finite() || distance >= threshold {
        return 0.0;
    }
    (1.0 - distance.max(0.0) / threshold) * max_opacity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Sequence;

    fn wide() -> Population {
        Population {
            count: 50,
            compact: false,
        }
    }

    fn single(x: f32, y: f32, vx: f32, vy: f32) -> ParticleField<Sequence> {
        let config = FieldConfig::default();
        let mut field = ParticleField::init(
            config,
            Bounds::new(800.0, 600.0),
            Population {
                count: 1,
                compact: false,
            },
            Sequence::new(&[0.25]),
        );
        let p = &mut field.particles[0];
        p.x = x;
        p.y = y;
        p.vx = vx;
        p.vy = vy;
        field
    }

    #[test]
    fn test_init_population_inside_viewport() {
        let field = ParticleField::init(
            FieldConfig::default(),
            Bounds::new(800.0, 600.0),
            wide(),
            SeededRandom::new(1),
        );
        assert_eq!(field.len(), 50);
        for p in field.particles() {
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!(p.vy < 0.0, "particles always rise");
            assert!(p.vx.abs() <= 0.15);
            assert!((1.5..4.0).contains(&p.size));
            assert!(p.handle.is_none());
        }
    }

    #[test]
    fn test_compact_population() {
        let field = ParticleField::init(
            FieldConfig::default(),
            Bounds::new(800.0, 600.0),
            Population {
                count: 50,
                compact: true,
            },
            SeededRandom::new(1),
        );
        assert_eq!(field.len(), 25);

        let narrow = ParticleField::new(
            FieldConfig::default(),
            Bounds::new(640.0, 384.0),
            SeededRandom::new(1),
        );
        assert_eq!(narrow.len(), 25);
    }

    #[test]
    fn test_same_seed_same_field() {
        let make = || {
            ParticleField::init(
                FieldConfig::default(),
                Bounds::new(800.0, 600.0),
                wide(),
                SeededRandom::new(99),
            )
        };
        assert_eq!(make().particles(), make().particles());
    }

    #[test]
    fn test_spawn_draw_order() {
        // color, size, rise, x, y, drift
        let field = ParticleField::init(
            FieldConfig::default(),
            Bounds::new(800.0, 600.0),
            Population {
                count: 1,
                compact: false,
            },
            Sequence::new(&[0.7, 0.0, 0.0, 0.5, 0.25, 1.0]),
        );
        let p = &field.particles()[0];
        assert_eq!(p.color, ember_core::Rgb::WHITE);
        assert_eq!(p.size, 1.5);
        assert_eq!(p.vy, -2.0); // 600 / (5s * 60fps)
        assert_eq!(p.x, 400.0);
        assert_eq!(p.y, 150.0);
        assert!((p.vx - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_element_variant_assigns_handles() {
        let config = FieldConfig {
            variant: FieldVariant::Embers,
            ..FieldConfig::default()
        };
        let field = ParticleField::init(
            config,
            Bounds::new(800.0, 600.0),
            Population {
                count: 4,
                compact: false,
            },
            SeededRandom::new(3),
        );
        let handles: Vec<_> = field.particles().iter().map(|p| p.handle).collect();
        assert_eq!(
            handles,
            (0..4).map(|i| Some(ElementHandle(i))).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_step_without_wrap() {
        let mut field = single(100.0, 5.0, 0.0, -2.0);
        field.step();
        assert_eq!(field.particles()[0].y, 3.0);
        assert_eq!(field.particles()[0].x, 100.0);
    }

    #[test]
    fn test_vertical_respawn_randomizes_x() {
        let mut field = single(100.0, -19.0, 0.1, -2.0);
        field.step();
        let p = &field.particles()[0];
        assert_eq!(p.y, 620.0);
        assert_eq!(p.x, 200.0); // 0.25 * 800
        assert_eq!(p.vx, 0.1);
        assert_eq!(p.vy, -2.0);
    }

    #[test]
    fn test_example_sequence_wraps_after_crossing_margin() {
        let mut field = single(100.0, 5.0, 0.0, -2.0);
        field.step();
        assert_eq!(field.particles()[0].y, 3.0);
        // 3 -> -19 after 11 frames, still inside the margin
        for _ in 0..11 {
            field.step();
        }
        assert_eq!(field.particles()[0].y, -19.0);
        field.step();
        assert_eq!(field.particles()[0].y, 620.0);
    }

    #[test]
    fn test_horizontal_wrap_keeps_y() {
        let mut right = single(819.5, 300.0, 1.0, 0.0);
        right.step();
        assert_eq!(right.particles()[0].x, -20.0);
        assert_eq!(right.particles()[0].y, 300.0);

        let mut left = single(-19.5, 300.0, -1.0, 0.0);
        left.step();
        assert_eq!(left.particles()[0].x, 820.0);
        assert_eq!(left.particles()[0].y, 300.0);
    }

    #[test]
    fn test_bounds_invariant_over_many_frames() {
        let mut field = ParticleField::init(
            FieldConfig {
                drift_spread: 12.0,
                ..FieldConfig::default()
            },
            Bounds::new(800.0, 600.0),
            wide(),
            SeededRandom::new(5),
        );
        for _ in 0..2000 {
            field.step();
            for p in field.particles() {
                assert!(p.x >= -20.0 && p.x <= 820.0, "x out of range: {}", p.x);
                assert!(p.y >= -20.0 && p.y <= 620.0, "y out of range: {}", p.y);
            }
        }
    }

    #[test]
    fn test_zero_viewport_collapses_then_respawns() {
        let mut field = ParticleField::init(
            FieldConfig::default(),
            Bounds::new(0.0, 0.0),
            Population {
                count: 10,
                compact: false,
            },
            SeededRandom::new(11),
        );
        for _ in 0..10 {
            field.step();
        }
        for p in field.particles() {
            assert_eq!(p.y, 0.0);
            assert_eq!(p.vy, 0.0);
            assert!(p.x >= -20.0 && p.x <= 20.0);
        }

        field.resize(Bounds::new(800.0, 600.0));
        assert!(field.particles().iter().all(|p| p.vy < 0.0));
    }

    #[test]
    fn test_resize_keeps_positions() {
        let mut field = ParticleField::init(
            FieldConfig::default(),
            Bounds::new(800.0, 600.0),
            wide(),
            SeededRandom::new(2),
        );
        let before = field.particles().to_vec();
        field.resize(Bounds::new(400.0, 300.0));
        assert_eq!(field.particles(), &before[..]);
        assert_eq!(field.bounds(), Bounds::new(400.0, 300.0));
    }

    #[test]
    fn test_shrunk_viewport_particles_rise_back_in() {
        let mut field = single(700.0, 500.0, 0.0, -2.0);
        field.resize(Bounds::new(400.0, 300.0));

        // past the new right edge: wraps on the next frame, y untouched
        field.step();
        assert_eq!(field.particles()[0].x, -20.0);
        assert_eq!(field.particles()[0].y, 498.0);

        // below the new bottom edge there is no rule; it keeps rising
        for _ in 0..89 {
            field.step();
        }
        assert_eq!(field.particles()[0].y, 320.0);

        for _ in 0..1000 {
            field.step();
            let p = &field.particles()[0];
            assert!(p.y >= -20.0 && p.y <= 320.0, "y out of range: {}", p.y);
            assert!(p.x >= -20.0 && p.x <= 420.0, "x out of range: {}", p.x);
        }
    }

    #[test]
    fn test_link_opacity_curve() {
        assert_eq!(link_opacity(0.0, 120.0, 0.15), 0.15);
        assert_eq!(link_opacity(120.0, 120.0, 0.15), 0.0);
        assert_eq!(link_opacity(500.0, 120.0, 0.15), 0.0);
        assert!((link_opacity(60.0, 120.0, 0.15) - 0.075).abs() < 1e-6);
        assert_eq!(link_opacity(10.0, 0.0, 0.15), 0.0);

        let mut last = f32::MAX;
        for d in 0..=120 {
            let o = link_opacity(d as f32, 120.0, 0.15);
            assert!(o <= last);
            last = o;
        }
    }

    #[test]
    fn test_links_only_close_pairs() {
        let mut field = ParticleField::init(
            FieldConfig::default(),
            Bounds::new(800.0, 600.0),
            Population {
                count: 3,
                compact: false,
            },
            SeededRandom::new(4),
        );
        let coords = [(0.0, 0.0), (30.0, 40.0), (500.0, 500.0)];
        for (p, (x, y)) in field.particles.iter_mut().zip(coords) {
            p.x = x;
            p.y = y;
        }

        let links: Vec<Link> = field.links().collect();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert_eq!(links[0].distance, 50.0);
        assert!((links[0].opacity - (1.0 - 50.0 / 120.0) * 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_links_visit_every_pair_once() {
        let mut field = ParticleField::init(
            FieldConfig::default(),
            Bounds::new(800.0, 600.0),
            Population {
                count: 5,
                compact: false,
            },
            SeededRandom::new(4),
        );
        for p in &mut field.particles {
            p.x = 10.0;
            p.y = 10.0;
        }
        let pairs: Vec<(usize, usize)> = field.links().map(|l| (l.a, l.b)).collect();
        assert_eq!(pairs.len(), 10);
        assert!(pairs.iter().all(|(a, b)| a < b));
    }
}
