//! One terminal glyph per particle.

use ember_core::{FieldConfig, Rgb};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use super::ElementHost;
use crate::chars::glyph_for_size;
use crate::color::shade;
use crate::field::ParticleField;
use crate::particle::ElementHandle;

#[derive(Debug, Clone, PartialEq)]
struct Glyph {
    ch: char,
    color: Color,
    /// Last transform, in virtual pixels.
    position: Option<(f32, f32)>,
}

/// Element host that places one styled glyph per particle on the terminal.
///
/// Elements are styled once when the layer is built and only moved
/// afterwards, the same way positioned page elements would be.
#[derive(Debug, Clone, Default)]
pub struct GlyphLayer {
    glyphs: Vec<Glyph>,
    cell_width: f32,
    cell_height: f32,
}

impl GlyphLayer {
    /// Build one element per particle handle.
    pub fn for_field<R>(
        field: &ParticleField<R>,
        cell_width: f32,
        cell_height: f32,
        background: Rgb,
        contrast: f32,
    ) -> Self {
        let config: &FieldConfig = field.config();
        let mut glyphs = Vec::new();
        for p in field.particles() {
            let Some(ElementHandle(index)) = p.handle else {
                continue;
            };
            if glyphs.len() <= index {
                glyphs.resize(
                    index + 1,
                    Glyph {
                        ch: ' ',
                        color: Color::Reset,
                        position: None,
                    },
                );
            }
            glyphs[index] = Glyph {
                ch: glyph_for_size(p.size, config.min_size, config.max_size),
                color: shade(p.color, config.particle_opacity * contrast, background),
                position: None,
            };
        }
        Self {
            glyphs,
            cell_width,
            cell_height,
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Terminal cell an element currently occupies, relative to the layer
    /// origin. `None` when off screen or never placed.
    pub fn cell(&self, handle: ElementHandle) -> Option<(u16, u16)> {
        let (x, y) = self.glyphs.get(handle.0)?.position?;
        if x < 0.0 || y < 0.0 || self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return None;
        }
        let col = (x / self.cell_width).floor();
        let row = (y / self.cell_height).floor();
        if col > u16::MAX as f32 || row > u16::MAX as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }
}

impl ElementHost for GlyphLayer {
    fn set_transform(&mut self, handle: ElementHandle, x: f32, y: f32) {
        if let Some(glyph) = self.glyphs.get_mut(handle.0) {
            glyph.position = Some((x, y));
        }
    }
}

impl Widget for &GlyphLayer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, glyph) in self.glyphs.iter().enumerate() {
            let Some((col, row)) = self.cell(ElementHandle(index)) else {
                continue;
            };
            if col >= area.width || row >= area.height {
                continue;
            }
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_char(glyph.ch).set_fg(glyph.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ember_core::{Bounds, FieldVariant};

    use super::*;
    use crate::field::Population;
    use crate::random::SeededRandom;
    use crate::surface::apply_transforms;

    fn embers(count: usize) -> ParticleField {
        ParticleField::init(
            FieldConfig {
                variant: FieldVariant::Embers,
                ..FieldConfig::default()
            },
            Bounds::new(80.0, 48.0),
            Population {
                count,
                compact: false,
            },
            SeededRandom::new(21),
        )
    }

    #[test]
    fn test_layer_has_one_glyph_per_particle() {
        let field = embers(7);
        let layer = GlyphLayer::for_field(&field, 8.0, 16.0, Rgb::BLACK, 1.0);
        assert_eq!(layer.len(), 7);
        assert_eq!(layer.cell(ElementHandle(0)), None);
    }

    #[test]
    fn test_transforms_map_to_cells() {
        let field = embers(3);
        let mut layer = GlyphLayer::for_field(&field, 8.0, 16.0, Rgb::BLACK, 1.0);
        layer.set_transform(ElementHandle(0), 17.0, 33.0);
        layer.set_transform(ElementHandle(1), -3.0, 10.0);
        assert_eq!(layer.cell(ElementHandle(0)), Some((2, 2)));
        assert_eq!(layer.cell(ElementHandle(1)), None);
        assert_eq!(layer.cell(ElementHandle(9)), None);
    }

    #[test]
    fn test_render_places_glyphs() {
        let field = embers(5);
        let mut layer = GlyphLayer::for_field(&field, 8.0, 16.0, Rgb::BLACK, 1.0);
        apply_transforms(&field, &mut layer);

        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        (&layer).render(area, &mut buf);

        let placed = buf.content().iter().filter(|c| c.symbol() != " ").count();
        assert!(placed >= 1 && placed <= 5);
    }
}
