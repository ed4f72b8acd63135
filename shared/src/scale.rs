use serde::{Deserialize, Serialize};

use crate::colors::Rgba;

/// Two-stop gradient a value is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub start: Rgba,
    pub end: Rgba,
}

impl ColorRange {
    pub const fn new(start: Rgba, end: Rgba) -> Self {
        Self { start, end }
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self {
            start: Rgba::rgba(254, 93, 33, 0.2),
            end: Rgba::rgba(254, 93, 33, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    #[default]
    Rgb,
    Hsl,
}

/// Linear value → color mapping over an observed `[min, max]` domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
    range: ColorRange,
    space: ColorSpace,
}

impl ColorScale {
    pub fn new((min, max): (f64, f64), range: ColorRange) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
            range,
            space: ColorSpace::Rgb,
        }
    }

    pub fn with_space(mut self, space: ColorSpace) -> Self {
        self.space = space;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Position of `value` inside the domain, clamped to `0..=1`.
    ///
    /// A single-valued domain puts everything at the end stop; non-finite input
    /// sits at the start stop.
    pub fn position(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        if self.max <= self.min {
            return 1.0;
        }
        let span = self.max - self.min;
        let t = if span.is_finite() {
            (value - self.min) / span
        } else {
            // Extremes further apart than f64::MAX; halving is exact for these.
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        if t.is_nan() {
            return 0.0;
        }
        t.clamp(0.0, 1.0)
    }

    pub fn map(&self, value: f64) -> Rgba {
        let t = self.position(value);
        match self.space {
            ColorSpace::Rgb => self.range.start.lerp(self.range.end, t),
            ColorSpace::Hsl => self.range.start.lerp_hsl(self.range.end, t),
        }
    }
}
