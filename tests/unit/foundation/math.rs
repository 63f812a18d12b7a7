use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn sample_seed_is_stable_and_index_sensitive() {
    assert_eq!(sample_seed(7, 1500), sample_seed(7, 1500));
    assert_ne!(sample_seed(7, 1500), sample_seed(7, 1501));
    assert_ne!(sample_seed(7, 1500), sample_seed(8, 1500));
}

#[test]
fn degenerate_ranges_return_lower_bound() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(uniform_f64(&mut rng, [2.5, 2.5]), 2.5);
    assert_eq!(uniform_u32(&mut rng, [3, 3]), 3);
}

#[test]
fn chance_respects_extremes() {
    let mut rng = StdRng::seed_from_u64(2);
    assert!((0..1000).all(|_| !chance(&mut rng, 0.0)));
    assert!((0..1000).all(|_| chance(&mut rng, 1.0)));
}

#[test]
fn validation_helpers_reject_bad_input() {
    assert!(check_prob("p", 1.5).is_err());
    assert!(check_prob("p", f64::NAN).is_err());
    check_prob("p", 0.25).unwrap();
    assert!(check_range_f64("r", [2.0, 1.0], 0.0, 10.0).is_err());
    assert!(check_weights("w", &[1.0], 2).is_err());
    assert!(check_weights("w", &[0.0, 0.0], 2).is_err());
    check_weights("w", &[], 3).unwrap();
}
