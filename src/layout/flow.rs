use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Size};
use crate::foundation::error::{SynthError, SynthResult};
use crate::layers::layer::Group;

/// Placement of content inside a larger extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowAlign {
    /// Flush with the start edge.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Flush with the end edge.
    End,
}

/// Flow layout configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLayoutConfig {
    /// Gap in pixels between neighbouring fragments on one line.
    pub space: f64,
    /// Gap in pixels between lines.
    pub line_space: f64,
    /// Wrap length in pixels along the flow direction; `None` keeps a single line.
    pub length: Option<f64>,
    /// Flow top-to-bottom with lines advancing left-to-right.
    pub vertical: bool,
    /// Alignment of each line within the longest line.
    pub align: FlowAlign,
    /// Alignment of each fragment across its line.
    pub line_align: FlowAlign,
}

impl Default for FlowLayoutConfig {
    fn default() -> Self {
        Self {
            space: 0.0,
            line_space: 0.0,
            length: None,
            vertical: false,
            align: FlowAlign::Start,
            line_align: FlowAlign::Center,
        }
    }
}

impl FlowLayoutConfig {
    /// Check spacing and wrap length.
    pub fn validate(&self) -> SynthResult<()> {
        for (name, v) in [("layout.space", self.space), ("layout.line_space", self.line_space)] {
            if !v.is_finite() || v < 0.0 {
                return Err(SynthError::validation(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        if let Some(len) = self.length
            && (!len.is_finite() || len <= 0.0)
        {
            return Err(SynthError::validation(format!(
                "layout.length must be finite and > 0 (got {len})"
            )));
        }
        Ok(())
    }
}

/// Arranges group members left-to-right (or top-to-bottom), wrapping on overflow.
///
/// Positions depend only on member sizes and configuration, so re-applying the layout to an
/// arranged group leaves it unchanged.
#[derive(Clone, Debug)]
pub struct FlowLayout {
    cfg: FlowLayoutConfig,
    max_extent_px: f64,
}

struct Line {
    members: Vec<(usize, f64)>,
    main_len: f64,
    thickness: f64,
}

impl FlowLayout {
    /// Build a layout that refuses arrangements larger than `max_extent_px` on either axis.
    pub fn new(cfg: &FlowLayoutConfig, max_extent_px: u32) -> SynthResult<Self> {
        cfg.validate()?;
        if max_extent_px == 0 {
            return Err(SynthError::validation("max_extent_px must be > 0"));
        }
        Ok(Self {
            cfg: cfg.clone(),
            max_extent_px: f64::from(max_extent_px),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &FlowLayoutConfig {
        &self.cfg
    }

    /// Reposition every member of `group` in place.
    pub fn apply(&self, group: &mut Group) -> SynthResult<()> {
        let sizes: Vec<Size> = group.layers.iter().map(|l| l.size()).collect();
        let positions = self.arrange(&sizes)?;
        for (layer, p) in group.layers.iter_mut().zip(positions) {
            layer.topleft = p;
        }
        Ok(())
    }

    fn arrange(&self, sizes: &[Size]) -> SynthResult<Vec<Point>> {
        let vertical = self.cfg.vertical;
        let main = |s: &Size| if vertical { s.height } else { s.width };
        let cross = |s: &Size| if vertical { s.width } else { s.height };

        let mut lines: Vec<Line> = Vec::new();
        for (idx, size) in sizes.iter().enumerate() {
            let m = main(size);
            let wrap = match (self.cfg.length, lines.last()) {
                (Some(len), Some(line)) => {
                    !line.members.is_empty() && line.main_len + self.cfg.space + m > len
                }
                _ => false,
            };
            if wrap || lines.is_empty() {
                lines.push(Line {
                    members: Vec::new(),
                    main_len: 0.0,
                    thickness: 0.0,
                });
            }
            let Some(line) = lines.last_mut() else {
                continue;
            };
            let at = if line.members.is_empty() {
                0.0
            } else {
                line.main_len + self.cfg.space
            };
            line.members.push((idx, at));
            line.main_len = at + m;
            line.thickness = line.thickness.max(cross(size));
        }

        let longest = lines.iter().map(|l| l.main_len).fold(0.0, f64::max);
        let total_cross = lines.iter().map(|l| l.thickness).sum::<f64>()
            + (lines.len().saturating_sub(1) as f64) * self.cfg.line_space;
        if longest > self.max_extent_px || total_cross > self.max_extent_px {
            return Err(SynthError::layout(format!(
                "arranged group {longest}x{total_cross}px exceeds max extent {}px",
                self.max_extent_px
            )));
        }

        let mut out = vec![Point::ORIGIN; sizes.len()];
        let mut line_cross = 0.0;
        for line in &lines {
            let line_off = align_offset(longest, line.main_len, self.cfg.align);
            for &(idx, at) in &line.members {
                let m = (line_off + at).round();
                let c = (line_cross
                    + align_offset(line.thickness, cross(&sizes[idx]), self.cfg.line_align))
                .round();
                out[idx] = if vertical {
                    Point::new(c, m)
                } else {
                    Point::new(m, c)
                };
            }
            line_cross += line.thickness + self.cfg.line_space;
        }
        Ok(out)
    }
}

fn align_offset(container: f64, content: f64, align: FlowAlign) -> f64 {
    let rem = (container - content).max(0.0);
    match align {
        FlowAlign::Start => 0.0,
        FlowAlign::Center => rem * 0.5,
        FlowAlign::End => rem,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/flow.rs"]
mod tests;
