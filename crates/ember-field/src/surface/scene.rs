//! Recorded canvas draw calls and their terminal rendering.

use ember_core::{Bounds, Rgb};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Line as CanvasLine, Points},
    },
};

use super::Canvas2d;
use crate::color::{shade, to_color};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Bounds),
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
        alpha: f32,
    },
}

/// A canvas that records draw calls for a later paint.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    bounds: Bounds,
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl Canvas2d for Scene {
    fn clear(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(bounds));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color,
            alpha,
        });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
            alpha,
        });
    }
}

/// Paints a [`Scene`] onto a braille canvas.
///
/// Terminals have no alpha channel, so every color is composited over the
/// background first. `contrast` scales all alphas, since the faint lines
/// that read well on a monitor vanish in a terminal.
#[derive(Debug, Clone, Copy)]
pub struct SceneWidget<'a> {
    scene: &'a Scene,
    background: Rgb,
    contrast: f32,
}

impl<'a> SceneWidget<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            background: Rgb::BLACK,
            contrast: 1.0,
        }
    }

    pub fn background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }
}

impl Widget for SceneWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bounds = self.scene.bounds();
        if bounds.is_empty() || area.is_empty() {
            return;
        }
        let height = bounds.height as f64;
        // canvas y grows upward
        let flip = |(x, y): (f32, f32)| (x as f64, height - y as f64);

        Canvas::default()
            .background_color(to_color(self.background))
            .marker(Marker::Braille)
            .x_bounds([0.0, bounds.width as f64])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for command in self.scene.commands() {
                    if let DrawCommand::Line {
                        from, to, color, alpha, ..
                    } = *command
                    {
                        let (x1, y1) = flip(from);
                        let (x2, y2) = flip(to);
                        let color = shade(color, alpha * self.contrast, self.background);
                        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
                    }
                }
                ctx.layer();
                for command in self.scene.commands() {
                    if let DrawCommand::Circle {
                        x, y, color, alpha, ..
                    } = *command
                    {
                        let coords = [flip((x, y))];
                        ctx.draw(&Points {
                            coords: &coords,
                            color: shade(color, alpha * self.contrast, self.background),
                        });
                    }
                }
            })
            .render(area, buf);
    }
}
