use crate::effects::composite::over_at;
use crate::foundation::core::{Point, Rect, Rgb8, Size};
use crate::foundation::error::{SynthError, SynthResult};
use crate::render::raster::Raster;

/// A raster placed in a shared floating-point coordinate frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Pixels, premultiplied RGBA8.
    pub raster: Raster,
    /// Position of the raster's top-left corner.
    pub topleft: Point,
}

impl Layer {
    /// Layer at the origin.
    pub fn new(raster: Raster) -> Self {
        Self {
            raster,
            topleft: Point::ORIGIN,
        }
    }

    /// Opaque rectangle of `size` (rounded up to whole pixels, at least 1x1) filled with `color`.
    pub fn rect(size: Size, color: Rgb8) -> SynthResult<Self> {
        if !size.is_finite() {
            return Err(SynthError::layout("rect layer size must be finite"));
        }
        let w = size.width.ceil().max(1.0) as u32;
        let h = size.height.ceil().max(1.0) as u32;
        Ok(Self::new(Raster::filled(w, h, color.to_rgba8_opaque())?))
    }

    /// Pixel size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.raster.width), f64::from(self.raster.height))
    }

    /// Occupied rectangle.
    pub fn bbox(&self) -> Rect {
        Rect::from_origin_size(self.topleft, self.size())
    }
}

/// Ordered layers; insertion order is draw order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    /// Member layers, first drawn first.
    pub layers: Vec<Layer>,
}

impl Group {
    /// Group over `layers`.
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Union of member rectangles; an empty group is a zero rect at the origin.
    pub fn bbox(&self) -> Rect {
        let mut it = self.layers.iter().map(Layer::bbox);
        match it.next() {
            Some(first) => it.fold(first, |acc, r| acc.union(r)),
            None => Rect::ZERO,
        }
    }

    /// Bounding size.
    pub fn size(&self) -> Size {
        self.bbox().size()
    }

    /// Bounding top-left.
    pub fn topleft(&self) -> Point {
        self.bbox().origin()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// `true` when the group has no members.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Source-over composite of `layers` (bottom first) onto a transparent canvas covering their union.
///
/// Layer positions are rounded to whole pixels relative to the union's top-left.
pub fn flatten<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> SynthResult<Raster> {
    let layers: Vec<&Layer> = layers.into_iter().collect();
    let Some(bbox) = layers
        .iter()
        .map(|l| l.bbox())
        .reduce(|acc, r| acc.union(r))
    else {
        return Raster::transparent(0, 0);
    };
    if !bbox.is_finite() {
        return Err(SynthError::layout("layer bounds are not finite"));
    }

    let origin = bbox.origin();
    let w = bbox.width().ceil().max(0.0) as u32;
    let h = bbox.height().ceil().max(0.0) as u32;
    let mut canvas = Raster::transparent(w, h)?;
    for layer in layers {
        let ox = (layer.topleft.x - origin.x).round() as i64;
        let oy = (layer.topleft.y - origin.y).round() as i64;
        over_at(&mut canvas, &layer.raster, ox, oy)?;
    }
    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/layers/layer.rs"]
mod tests;
