use super::*;

fn grid() -> GridSize {
    GridSize::new(1024.0).unwrap()
}

fn bar() -> CharacterGlyph {
    let mut outline = kurbo::BezPath::new();
    outline.move_to((200.0, 700.0));
    outline.line_to((800.0, 700.0));
    CharacterGlyph::new(
        '一',
        vec![outline],
        vec![vec![Point::new(200.0, 700.0), Point::new(800.0, 700.0)]],
    )
    .unwrap()
}

#[test]
fn no_points_means_no_hint() {
    let cfg = LocatorConfig::default();
    assert_eq!(locate_error(&[], None, grid(), &cfg), None);
    assert_eq!(locate_error(&[], Some(&bar()), grid(), &cfg), None);
}

#[test]
fn without_glyph_the_hint_wraps_the_centroid() {
    let drawn = [Point::new(100.0, 100.0), Point::new(300.0, 300.0)];
    let hint = locate_error(&drawn, None, grid(), &LocatorConfig::default()).unwrap();
    assert_eq!(hint.center(), Point::new(200.0, 200.0));
    assert!((hint.radius - 0.28 * 1024.0).abs() < 1e-9);
}

#[test]
fn with_glyph_the_hint_targets_the_farthest_point() {
    // Reference outline points sit at (200, 200) and (800, 200) in surface space.
    let drawn = [
        Point::new(200.0, 210.0),
        Point::new(500.0, 210.0),
        Point::new(800.0, 210.0),
    ];
    let hint = locate_error(&drawn, Some(&bar()), grid(), &LocatorConfig::default()).unwrap();
    assert_eq!(hint.center(), Point::new(500.0, 210.0));
    assert!((hint.radius - 0.22 * 1024.0).abs() < 1e-9);
}

#[test]
fn large_miss_scales_the_radius() {
    let drawn = [Point::new(200.0, 200.0), Point::new(200.0, 900.0)];
    let hint = locate_error(&drawn, Some(&bar()), grid(), &LocatorConfig::default()).unwrap();
    assert_eq!(hint.center(), Point::new(200.0, 900.0));
    assert!((hint.radius - 0.55 * 700.0).abs() < 1e-9);
}

#[test]
fn close_attempt_falls_back_to_centroid() {
    let drawn = [Point::new(200.0, 200.0), Point::new(800.0, 200.0)];
    let hint = locate_error(&drawn, Some(&bar()), grid(), &LocatorConfig::default()).unwrap();
    assert_eq!(hint.center(), Point::new(500.0, 200.0));
    assert!((hint.radius - 0.28 * 1024.0).abs() < 1e-9);
}

#[test]
fn radius_is_always_positive() {
    let small = GridSize::new(10.0).unwrap();
    let hint = locate_error(&[Point::new(1.0, 1.0)], None, small, &LocatorConfig::default())
        .unwrap();
    assert!(hint.radius > 0.0);
}

#[test]
fn config_rejects_non_positive_radius() {
    let cfg = LocatorConfig {
        min_radius_frac: 0.0,
        ..LocatorConfig::default()
    };
    assert!(cfg.validate().is_err());
    assert!(LocatorConfig::default().validate().is_ok());
}
