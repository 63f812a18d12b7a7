use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn fake(family: &str) -> PreparedFont {
    PreparedFont {
        family: family.to_string(),
        path: PathBuf::new(),
        bytes: Arc::new(vec![0u8; 4]),
    }
}

#[test]
fn sample_respects_size_range_and_bold_probability() {
    let cfg = FontConfig {
        size: [20.0, 30.0],
        bold: 1.0,
        ..FontConfig::default()
    };
    let catalog = FontCatalog::from_fonts(&cfg, vec![fake("a"), fake("b")]).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..50 {
        let pick = catalog.sample(&mut rng).unwrap();
        assert!((20.0..=30.0).contains(&pick.size_px));
        assert!(pick.bold);
        let spec = catalog.data(&pick).unwrap();
        assert_eq!(spec.size_px, pick.size_px);
        assert!(spec.family == "a" || spec.family == "b");
    }
}

#[test]
fn empty_catalog_is_a_sampling_error() {
    let catalog = FontCatalog::from_fonts(&FontConfig::default(), Vec::new()).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        catalog.sample(&mut rng).unwrap_err(),
        SynthError::Sampling(_)
    ));
}

#[test]
fn data_rejects_out_of_range_pick() {
    let catalog = FontCatalog::from_fonts(&FontConfig::default(), vec![fake("a")]).unwrap();
    let pick = FontPick {
        index: 3,
        size_px: 12.0,
        bold: false,
    };
    assert!(catalog.data(&pick).is_err());
}

#[test]
fn load_scans_directories_for_font_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.ttf"), b"fontb").unwrap();
    std::fs::write(dir.path().join("a.OTF"), b"fonta").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

    let cfg = FontConfig {
        paths: vec![dir.path().to_path_buf()],
        ..FontConfig::default()
    };
    let catalog = FontCatalog::load(&cfg).unwrap();
    assert_eq!(catalog.len(), 2);
    let families: Vec<_> = catalog.fonts.iter().map(|f| f.family.as_str()).collect();
    assert_eq!(families, ["a", "b"]);
}

#[test]
fn invalid_size_range_is_rejected() {
    let cfg = FontConfig {
        size: [40.0, 10.0],
        ..FontConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn debug_output_omits_font_bytes() {
    let s = format!("{:?}", fake("mono"));
    assert!(s.contains("bytes_len"));
    assert!(s.contains("mono"));
}
