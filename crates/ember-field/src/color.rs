//! Color conversion for terminal rendering.

use ember_core::Rgb;
use ratatui::style::Color;

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Composite `color` at `alpha` over `background` and convert.
pub fn shade(color: Rgb, alpha: f32, background: Rgb) -> Color {
    to_color(color.over(background, alpha))
}
