//! Character constants for particle glyphs.

/// Glyphs for particles, smallest first.
pub const EMBER_CHARS: &[char] = &['·', '•', '✦'];

/// Pick a glyph by where `size` falls in `[min, max)`.
pub fn glyph_for_size(size: f32, min: f32, max: f32) -> char {
    let span = max - min;
    let t = if span > 0.0 {
        ((size - min) / span).clamp(0.0, 0.999)
    } else {
        0.0
    };
    EMBER_CHARS[(t * EMBER_CHARS.len() as f32) as usize]
}
