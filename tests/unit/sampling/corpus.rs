use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn fixed_corpus_returns_its_line() {
    let corpus = LineCorpus::from_lines(&CorpusConfig::default(), ["hello"]).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        let pick = corpus.sample(&mut rng).unwrap();
        assert_eq!(corpus.data(&pick).unwrap(), "hello");
    }
}

#[test]
fn empty_corpus_is_a_sampling_error() {
    let corpus = LineCorpus::from_lines(&CorpusConfig::default(), ["", "   "]).unwrap();
    assert!(corpus.is_empty());
    let mut rng = StdRng::seed_from_u64(0);
    let err = corpus.sample(&mut rng).unwrap_err();
    assert!(matches!(err, SynthError::Sampling(_)));
}

#[test]
fn lines_with_tabs_and_short_lines_are_skipped() {
    let cfg = CorpusConfig {
        min_length: 3,
        ..CorpusConfig::default()
    };
    let corpus = LineCorpus::from_lines(&cfg, ["ab", "a\tb c", "abc", "abcd"]).unwrap();
    assert_eq!(corpus.len(), 2);
}

#[test]
fn long_lines_are_cut_to_length_window() {
    let cfg = CorpusConfig {
        min_length: 2,
        max_length: 4,
        ..CorpusConfig::default()
    };
    let line = "abcdefghijklmnop";
    let corpus = LineCorpus::from_lines(&cfg, [line]).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let text = corpus.data(&corpus.sample(&mut rng).unwrap()).unwrap();
        let n = text.chars().count();
        assert!((2..=4).contains(&n), "{text}");
        assert!(line.contains(&text));
    }
}

#[test]
fn textcase_is_applied() {
    let cfg = CorpusConfig {
        textcase: vec![TextCase::Upper],
        ..CorpusConfig::default()
    };
    let corpus = LineCorpus::from_lines(&cfg, ["MiXed"]).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(corpus.sample(&mut rng).unwrap().text, "MIXED");
    assert_eq!(TextCase::Capitalize.apply("hELLO"), "Hello");
    assert_eq!(TextCase::Lower.apply("ABC"), "abc");
}

#[test]
fn augmentation_draws_from_charset() {
    let cfg = CorpusConfig {
        augmentation: 1.0,
        augmentation_charset: "xy".to_string(),
        augmentation_length: [3, 3],
        ..CorpusConfig::default()
    };
    let corpus = LineCorpus::from_lines(&cfg, ["hello"]).unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    let text = corpus.sample(&mut rng).unwrap().text;
    assert_eq!(text.chars().count(), 3);
    assert!(text.chars().all(|c| c == 'x' || c == 'y'));
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = CorpusConfig {
        min_length: 0,
        ..CorpusConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = CorpusConfig {
        augmentation: 0.5,
        augmentation_charset: "a\tb".to_string(),
        ..CorpusConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn load_reads_files_and_reports_missing_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    std::fs::write(&path, "alpha\nbeta\r\n\ngamma\n").unwrap();
    let cfg = CorpusConfig {
        paths: vec![path],
        ..CorpusConfig::default()
    };
    let corpus = LineCorpus::load(&cfg).unwrap();
    assert_eq!(corpus.len(), 3);

    let missing = CorpusConfig {
        paths: vec![dir.path().join("nope.txt")],
        ..CorpusConfig::default()
    };
    let err = LineCorpus::load(&missing).unwrap_err();
    assert!(err.to_string().contains("nope.txt"));
}
