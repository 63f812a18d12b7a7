use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::raster::Raster;

pub(crate) type PremulRgba8 = [u8; 4];

/// Premultiplied source-over with an extra opacity factor.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Linear mix of `a` towards `b` by `t`.
pub(crate) fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255(u16::from(a[i]), it);
        let bv = mul_div255(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

/// Composite `src` over `dst` with `src`'s top-left at `(ox, oy)` in `dst` pixel space.
///
/// Pixels falling outside `dst` are clipped.
pub(crate) fn over_at(dst: &mut Raster, src: &Raster, ox: i64, oy: i64) -> SynthResult<()> {
    if src.data.len() != (src.width as usize) * (src.height as usize) * 4 {
        return Err(SynthError::evaluation(
            "over_at expects src matching width*height*4",
        ));
    }
    let dw = i64::from(dst.width);
    let dh = i64::from(dst.height);
    for sy in 0..src.height {
        let y = oy + i64::from(sy);
        if y < 0 || y >= dh {
            continue;
        }
        for sx in 0..src.width {
            let x = ox + i64::from(sx);
            if x < 0 || x >= dw {
                continue;
            }
            let s = src.pixel(sx, sy);
            if s[3] == 0 {
                continue;
            }
            let di = dst.index(x as u32, y as u32);
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            dst.data[di..di + 4].copy_from_slice(&over(d, s, 1.0));
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
