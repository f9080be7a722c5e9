//! Pointer-driven effects.

use ember_core::Rgb;
use ember_field::to_color;
use ratatui::{
    buffer::Buffer,
    layout::{Offset, Position, Rect},
    widgets::Widget,
};

/// Terminal rows are about twice as tall as columns are wide.
const CELL_ASPECT: f32 = 2.0;

/// Offset pulling an element toward the pointer.
pub fn magnetic_offset(pointer: (f32, f32), center: (f32, f32), strength: f32) -> (f32, f32) {
    (
        (pointer.0 - center.0) * strength,
        (pointer.1 - center.1) * strength,
    )
}

/// Tracks the magnetic pull on one element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Magnet {
    offset: (f32, f32),
}

impl Magnet {
    /// Follow the pointer while it is over `target`; snap back otherwise.
    pub fn track(&mut self, pointer: Position, target: Rect, strength: f32) {
        if !target.contains(pointer) {
            self.release();
            return;
        }
        let center = (
            target.x as f32 + target.width as f32 / 2.0,
            target.y as f32 + target.height as f32 / 2.0,
        );
        let pointer = (pointer.x as f32 + 0.5, pointer.y as f32 + 0.5);
        self.offset = magnetic_offset(pointer, center, strength);
    }

    pub fn release(&mut self) {
        self.offset = (0.0, 0.0);
    }

    /// Offset rounded to whole cells.
    pub fn offset(&self) -> Offset {
        Offset {
            x: self.offset.0.round() as i32,
            y: self.offset.1.round() as i32,
        }
    }

    /// `target` moved by the offset, kept inside `area`.
    pub fn apply(&self, target: Rect, area: Rect) -> Rect {
        target.offset(self.offset()).clamp(area)
    }
}

/// Soft light under the pointer, brightening the field background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    center: Option<Position>,
    /// Reach in columns.
    radius: f32,
    /// Alpha right under the pointer.
    intensity: f32,
    color: Rgb,
    background: Rgb,
}

impl Glow {
    pub fn new(radius: f32, intensity: f32, color: Rgb, background: Rgb) -> Self {
        Self {
            center: None,
            radius,
            intensity,
            color,
            background,
        }
    }

    /// Move to `pointer`, or go dark when it is outside `area`.
    pub fn follow(&mut self, pointer: Position, area: Rect) {
        self.center = area.contains(pointer).then_some(pointer);
    }

    pub fn clear(&mut self) {
        self.center = None;
    }

    /// Cell the glow is centered on, if lit.
    pub fn center(&self) -> Option<Position> {
        self.center
    }

    /// Alpha of the glow at `cell`, fading quadratically to zero at the
    /// radius.
    pub fn alpha_at(&self, cell: Position) -> f32 {
        let Some(center) = self.center else {
            return 0.0;
        };
        if self.radius <= 0.0 {
            return 0.0;
        }
        let dx = cell.x as f32 - center.x as f32;
        let dy = (cell.y as f32 - center.y as f32) * CELL_ASPECT;
        let distance = dx.hypot(dy);
        if distance >= self.radius {
            return 0.0;
        }
        let falloff = 1.0 - distance / self.radius;
        self.intensity * falloff * falloff
    }
}

impl Widget for &Glow {
    /// Recolors cell backgrounds only, leaving glyphs on top untouched.
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.center.is_none() || self.intensity <= 0.0 {
            return;
        }
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let position = Position::new(x, y);
                let alpha = self.alpha_at(position);
                if alpha <= 0.0 {
                    continue;
                }
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_bg(to_color(self.color.over(self.background, alpha)));
                }
            }
        }
    }
}
