use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn median(k: [u32; 2]) -> MedianBlur {
    MedianBlur::new(&MedianConfig { prob: 1.0, k }).unwrap()
}

#[test]
fn removes_isolated_speckle() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut src = Raster::filled(5, 5, [20, 20, 20, 255]).unwrap();
    let i = src.index(2, 2);
    src.data[i..i + 4].copy_from_slice(&[250, 250, 250, 255]);
    let out = median([1, 1]).apply(&src, &mut rng).unwrap();
    assert_eq!(out, Raster::filled(5, 5, [20, 20, 20, 255]).unwrap());
}

#[test]
fn preserves_straight_edges() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut src = Raster::filled(6, 6, [0, 0, 0, 255]).unwrap();
    for y in 0..6 {
        for x in 3..6 {
            let i = src.index(x, y);
            src.data[i..i + 3].copy_from_slice(&[200, 200, 200]);
        }
    }
    assert_eq!(median([1, 1]).apply(&src, &mut rng).unwrap(), src);
}

#[test]
fn zero_radius_is_identity() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut src = Raster::filled(3, 3, [1, 2, 3, 255]).unwrap();
    src.data[0] = 99;
    assert_eq!(median([0, 0]).apply(&src, &mut rng).unwrap(), src);
}

#[test]
fn radius_range_is_validated() {
    assert!(MedianBlur::new(&MedianConfig { prob: 1.0, k: [2, 1] }).is_err());
    assert!(MedianBlur::new(&MedianConfig { prob: 1.0, k: [1, 40] }).is_err());
}
