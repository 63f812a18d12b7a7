use crate::foundation::error::{SynthError, SynthResult};

/// Row-major premultiplied RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes of premultiplied RGBA8.
    pub data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> SynthResult<Self> {
        let len = buffer_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Raster filled with one premultiplied pixel value.
    pub fn filled(width: u32, height: u32, rgba8_premul: [u8; 4]) -> SynthResult<Self> {
        let len = buffer_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: rgba8_premul.repeat(len / 4),
        })
    }

    /// Wrap an existing premultiplied buffer, checking its length.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> SynthResult<Self> {
        let len = buffer_len(width, height)?;
        if data.len() != len {
            return Err(SynthError::evaluation(format!(
                "raster buffer has {} bytes, expected {len} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from straight-alpha RGBA8 (e.g. a decoded image file).
    pub fn from_rgba8_straight(width: u32, height: u32, mut data: Vec<u8>) -> SynthResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_rgba8_premul(width, height, data)
    }

    /// `true` when the raster holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Copy the first three channels into an RGB image, dropping alpha.
    pub fn to_rgb8(&self) -> image::RgbImage {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        image::RgbImage::from_raw(self.width, self.height, out).unwrap_or_default()
    }

    pub(crate) fn to_rgba_image(&self) -> SynthResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| SynthError::evaluation("raster buffer does not match its dimensions"))
    }

    pub(crate) fn from_rgba_image(img: image::RgbaImage) -> SynthResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba8_premul(w, h, img.into_raw())
    }
}

fn buffer_len(width: u32, height: u32) -> SynthResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SynthError::evaluation("raster buffer size overflow"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
