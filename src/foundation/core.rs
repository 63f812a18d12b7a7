use crate::foundation::error::{SynthError, SynthResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rec. 601 luma, rounded.
    pub fn luma(self) -> u8 {
        let y = 0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b);
        y.round().clamp(0.0, 255.0) as u8
    }

    /// Gray color with every channel set to this color's luma.
    pub fn to_gray(self) -> Self {
        let y = self.luma();
        Self::new(y, y, y)
    }

    /// Fully opaque premultiplied RGBA8 pixel.
    pub fn to_rgba8_opaque(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Half-open `[min, max)` range of sample counts drawn per generated image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CountRange {
    /// Inclusive lower bound.
    pub min: usize,
    /// Exclusive upper bound.
    pub max: usize,
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 0, max: 4 }
    }
}

impl CountRange {
    /// Create a validated range with `min < max`.
    pub fn new(min: usize, max: usize) -> SynthResult<Self> {
        let out = Self { min, max };
        out.validate()?;
        Ok(out)
    }

    /// Reject empty ranges.
    pub fn validate(self) -> SynthResult<()> {
        if self.min >= self.max {
            return Err(SynthError::validation(format!(
                "count range must satisfy min < max (got [{}, {}))",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Range containing exactly `n`; `usize::MAX` has no exclusive upper bound and is rejected.
    pub fn exactly(n: usize) -> SynthResult<Self> {
        let max = n.checked_add(1).ok_or_else(|| {
            SynthError::validation(format!("count range cannot contain exactly {n}"))
        })?;
        Ok(Self { min: n, max })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
