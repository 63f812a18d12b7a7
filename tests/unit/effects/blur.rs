use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn kernel_sums_to_one_in_q16() {
    for (radius, sigma) in [(1, 0.3), (3, 1.0), (6, 2.0)] {
        let k = gaussian_kernel_q16(radius, sigma).unwrap();
        assert_eq!(k.len(), (2 * radius + 1) as usize);
        assert_eq!(k.iter().sum::<u32>(), 65536);
    }
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1, 1.0).is_err());
}

#[test]
fn zero_sigma_effect_is_identity() {
    let mut rng = StdRng::seed_from_u64(0);
    let blur = GaussianBlur::new(&BlurConfig {
        prob: 1.0,
        sigma: [0.0, 0.0],
    })
    .unwrap();
    let mut src = Raster::filled(4, 4, [0, 0, 0, 255]).unwrap();
    src.data[0] = 255;
    assert_eq!(blur.apply(&src, &mut rng).unwrap(), src);
}

#[test]
fn effect_softens_hard_edges() {
    let mut rng = StdRng::seed_from_u64(0);
    let blur = GaussianBlur::new(&BlurConfig {
        prob: 1.0,
        sigma: [1.5, 1.5],
    })
    .unwrap();
    let mut src = Raster::filled(8, 1, [0, 0, 0, 255]).unwrap();
    for x in 4..8 {
        let i = src.index(x, 0);
        src.data[i..i + 3].copy_from_slice(&[255, 255, 255]);
    }
    let out = blur.apply(&src, &mut rng).unwrap();
    let left = out.pixel(3, 0)[0];
    let right = out.pixel(4, 0)[0];
    assert!(left > 0 && left < 128, "left={left}");
    assert!(right > 128 && right < 255, "right={right}");
    assert!(out.data.chunks_exact(4).all(|px| px[3] == 255));
}
