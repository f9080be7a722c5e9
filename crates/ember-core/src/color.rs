//! Colors and weighted palettes.

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// The warm amber used for embers and constellation lines.
    pub const AMBER: Rgb = Rgb::new(232, 148, 74);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Composite `self` at `alpha` over `background`.
    pub fn over(self, background: Rgb, alpha: f32) -> Rgb {
        let a = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Rgb::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// A palette color together with its selection weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: Rgb,
    pub weight: f32,
}

/// A small set of colors chosen by weighted random selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Default for Palette {
    /// Mostly amber with some white.
    fn default() -> Self {
        Self::new(vec![
            PaletteEntry {
                color: Rgb::AMBER,
                weight: 0.6,
            },
            PaletteEntry {
                color: Rgb::WHITE,
                weight: 0.4,
            },
        ])
    }
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Sum of all positive weights.
    pub fn total_weight(&self) -> f32 {
        self.entries.iter().map(|e| e.weight.max(0.0)).sum()
    }

    /// Pick a color from a uniform sample in `[0, 1)`.
    ///
    /// The sample is scaled by the total weight and matched against the
    /// running sum of weights. Empty palettes yield white; palettes whose
    /// weights are all zero yield their first color.
    pub fn pick(&self, sample: f32) -> Rgb {
        let Some(first) = self.entries.first() else {
            return Rgb::WHITE;
        };
        let total = self.total_weight();
        if total <= 0.0 {
            return first.color;
        }

        let target = sample.clamp(0.0, 1.0) * total;
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.weight.max(0.0);
            if target < cumulative {
                return entry.color;
            }
        }
        // sample == 1.0 or rounding at the top end
        self.entries
            .iter()
            .rev()
            .find(|e| e.weight > 0.0)
            .map_or(first.color, |e| e.color)
    }
}
