//! Drawing a particle field onto a host surface.
//!
//! The constellation variant draws onto a [`Canvas2d`]; the embers variant
//! pushes positions to externally owned elements through an
//! [`ElementHost`].

mod glyphs;
mod scene;

pub use glyphs::GlyphLayer;
pub use scene::{DrawCommand, Scene, SceneWidget};

use ember_core::{Bounds, Rgb};

use crate::field::ParticleField;
use crate::particle::ElementHandle;

/// A 2D raster surface.
pub trait Canvas2d {
    /// Wipe the surface.
    fn clear(&mut self, bounds: Bounds);

    /// Fill a circle centered on `(x, y)`.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32);

    /// Stroke a straight line.
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32);
}

/// Owner of one visual element per particle.
pub trait ElementHost {
    /// Move the element behind `handle` to `(x, y)`.
    fn set_transform(&mut self, handle: ElementHandle, x: f32, y: f32);
}

/// Redraw the whole field: links first, then dots on top.
pub fn draw_canvas<R>(field: &ParticleField<R>, canvas: &mut impl Canvas2d) {
    let config = field.config();
    canvas.clear(field.bounds());

    if config.variant.draws_links() {
        let particles = field.particles();
        for link in field.links() {
            let (a, b) = (&particles[link.a], &particles[link.b]);
            canvas.stroke_line(
                (a.x, a.y),
                (b.x, b.y),
                config.link_width,
                config.link_color,
                link.opacity,
            );
        }
    }

    for p in field.particles() {
        canvas.fill_circle(p.x, p.y, p.radius(), p.color, config.particle_opacity);
    }
}

/// Push every particle position to its element. Particles without a
/// handle are skipped.
pub fn apply_transforms<R>(field: &ParticleField<R>, host: &mut impl ElementHost) {
    for p in field.particles() {
        if let Some(handle) = p.handle {
            host.set_transform(handle, p.x, p.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use ember_core::{FieldConfig, FieldVariant};

    use super::*;
    use crate::field::Population;
    use crate::random::SeededRandom;

    fn field(variant: FieldVariant, count: usize) -> ParticleField {
        ParticleField::init(
            FieldConfig {
                variant,
                ..FieldConfig::default()
            },
            Bounds::new(800.0, 600.0),
            Population {
                count,
                compact: false,
            },
            SeededRandom::new(8),
        )
    }

    #[derive(Default)]
    struct Recorder(Vec<(ElementHandle, f32, f32)>);

    impl ElementHost for Recorder {
        fn set_transform(&mut self, handle: ElementHandle, x: f32, y: f32) {
            self.0.push((handle, x, y));
        }
    }

    #[test]
    fn test_draw_canvas_order() {
        let field = field(FieldVariant::Constellation, 20);
        let mut scene = Scene::default();
        draw_canvas(&field, &mut scene);

        let commands = scene.commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));

        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, field.links().count());

        // dots come last
        let dots = &commands[1 + lines..];
        assert_eq!(dots.len(), 20);
        assert!(dots.iter().all(|c| matches!(c, DrawCommand::Circle { .. })));
    }

    #[test]
    fn test_embers_variant_draws_no_links() {
        let field = field(FieldVariant::Embers, 20);
        let mut scene = Scene::default();
        draw_canvas(&field, &mut scene);
        assert!(
            !scene
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Line { .. }))
        );
    }

    #[test]
    fn test_apply_transforms() {
        let field = field(FieldVariant::Embers, 6);
        let mut host = Recorder::default();
        apply_transforms(&field, &mut host);
        assert_eq!(host.0.len(), 6);
        for ((handle, x, y), p) in host.0.iter().zip(field.particles()) {
            assert_eq!(Some(*handle), p.handle);
            assert_eq!((*x, *y), (p.x, p.y));
        }

        let mut none = Recorder::default();
        apply_transforms(&self::field(FieldVariant::Constellation, 6), &mut none);
        assert!(none.0.is_empty());
    }
}
