use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn checker() -> Raster {
    let mut data = Vec::new();
    for i in 0..16u32 {
        let v = if i % 2 == 0 { 255 } else { 0 };
        data.extend_from_slice(&[v, 0, 0, 255]);
    }
    Raster::from_rgba8_premul(4, 4, data).unwrap()
}

#[test]
fn data_scales_texture_and_keeps_offset_inside() {
    let cfg = TextureConfig {
        scale: [2.0, 2.0],
        alpha: [0.5, 0.5],
        ..TextureConfig::default()
    };
    let catalog = TextureCatalog::from_rasters(&cfg, vec![checker()]).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..20 {
        let tex = catalog.data(&catalog.sample(&mut rng).unwrap()).unwrap();
        assert_eq!((tex.raster.width, tex.raster.height), (8, 8));
        assert_eq!(tex.alpha, 0.5);
        assert!(tex.offset.0 < 8 && tex.offset.1 < 8);
    }
}

#[test]
fn grayscale_texture_has_equal_channels() {
    let cfg = TextureConfig {
        grayscale: 1.0,
        ..TextureConfig::default()
    };
    let catalog = TextureCatalog::from_rasters(&cfg, vec![checker()]).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let tex = catalog.data(&catalog.sample(&mut rng).unwrap()).unwrap();
    for px in tex.raster.data.chunks_exact(4) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }
}

#[test]
fn empty_catalog_is_a_sampling_error() {
    let catalog = TextureCatalog::from_rasters(&TextureConfig::default(), Vec::new()).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        catalog.sample(&mut rng).unwrap_err(),
        SynthError::Sampling(_)
    ));
}

#[test]
fn load_decodes_png_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.png");
    image::RgbaImage::from_pixel(3, 2, image::Rgba([200, 190, 180, 255]))
        .save(&path)
        .unwrap();
    let cfg = TextureConfig {
        paths: vec![path],
        ..TextureConfig::default()
    };
    let catalog = TextureCatalog::load(&cfg).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let tex = catalog.data(&catalog.sample(&mut rng).unwrap()).unwrap();
    assert_eq!(tex.raster.pixel(0, 0), [200, 190, 180, 255]);
}

#[test]
fn alpha_outside_unit_range_is_rejected() {
    let cfg = TextureConfig {
        alpha: [0.5, 1.5],
        ..TextureConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn scaled_textures_are_cached_per_size() {
    let cfg = TextureConfig {
        scale: [2.0, 2.0],
        ..TextureConfig::default()
    };
    let catalog = TextureCatalog::from_rasters(&cfg, vec![checker()]).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let first = catalog.data(&catalog.sample(&mut rng).unwrap()).unwrap();
    for _ in 0..10 {
        let again = catalog.data(&catalog.sample(&mut rng).unwrap()).unwrap();
        assert!(Arc::ptr_eq(&first.raster, &again.raster));
    }
    assert_eq!(catalog.cached_scales(), 1);
}

#[test]
fn unscaled_texture_is_not_copied_or_cached() {
    let catalog = TextureCatalog::from_rasters(&TextureConfig::default(), vec![checker()]).unwrap();
    let mut rng = StdRng::seed_from_u64(12);
    let a = catalog.data(&catalog.sample(&mut rng).unwrap()).unwrap();
    let b = catalog.data(&catalog.sample(&mut rng).unwrap()).unwrap();
    assert!(Arc::ptr_eq(&a.raster, &b.raster));
    assert_eq!(catalog.cached_scales(), 0);
}

#[test]
fn grayscale_draw_leaves_cached_texture_colored() {
    let catalog = TextureCatalog::from_rasters(&TextureConfig::default(), vec![checker()]).unwrap();
    let pick = TexturePick {
        index: 0,
        alpha: 1.0,
        grayscale: true,
        scale: 1.0,
        phase: [0.0, 0.0],
    };
    let gray = catalog.data(&pick).unwrap();
    assert_eq!(gray.raster.pixel(0, 0)[0], gray.raster.pixel(0, 0)[1]);

    let color = catalog
        .data(&TexturePick {
            grayscale: false,
            ..pick
        })
        .unwrap();
    assert_eq!(color.raster.pixel(0, 0), [255, 0, 0, 255]);
}
