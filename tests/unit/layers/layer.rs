use super::*;

fn solid(w: u32, h: u32, px: [u8; 4], x: f64, y: f64) -> Layer {
    Layer {
        raster: Raster::filled(w, h, px).unwrap(),
        topleft: Point::new(x, y),
    }
}

#[test]
fn group_bbox_is_union_of_members() {
    let g = Group::new(vec![
        solid(4, 2, [0, 0, 0, 255], 2.0, 1.0),
        solid(3, 5, [0, 0, 0, 255], 8.0, 0.0),
    ]);
    assert_eq!(g.bbox(), Rect::new(2.0, 0.0, 11.0, 5.0));
    assert_eq!(g.topleft(), Point::new(2.0, 0.0));
    assert_eq!(g.size(), Size::new(9.0, 5.0));
}

#[test]
fn empty_group_is_zero_rect() {
    let g = Group::default();
    assert!(g.is_empty());
    assert_eq!(g.bbox(), Rect::ZERO);
}

#[test]
fn rect_layer_rounds_up_and_never_collapses() {
    let l = Layer::rect(Size::new(2.2, 0.0), Rgb8::new(9, 8, 7)).unwrap();
    assert_eq!((l.raster.width, l.raster.height), (3, 1));
    assert_eq!(l.raster.pixel(0, 0), [9, 8, 7, 255]);
}

#[test]
fn flatten_draws_later_layers_on_top() {
    let bottom = solid(4, 4, [0, 0, 255, 255], 10.0, 10.0);
    let top = solid(2, 2, [255, 0, 0, 255], 11.0, 11.0);
    let out = flatten([&bottom, &top]).unwrap();
    assert_eq!((out.width, out.height), (4, 4));
    assert_eq!(out.pixel(0, 0), [0, 0, 255, 255]);
    assert_eq!(out.pixel(1, 1), [255, 0, 0, 255]);
    assert_eq!(out.pixel(3, 3), [0, 0, 255, 255]);
}

#[test]
fn flatten_of_nothing_is_empty() {
    let out = flatten(std::iter::empty()).unwrap();
    assert!(out.is_empty());
}
