use super::*;

#[test]
fn grid_size_rejects_non_positive_and_non_finite() {
    assert!(GridSize::new(0.0).is_err());
    assert!(GridSize::new(-4.0).is_err());
    assert!(GridSize::new(f64::NAN).is_err());
    assert!(GridSize::new(f64::INFINITY).is_err());
    assert_eq!(GridSize::new(200.0).unwrap().px(), 200.0);
}

#[test]
fn grid_fraction_scales_linearly() {
    let g = GridSize::new(400.0).unwrap();
    assert_eq!(g.fraction(0.25), 100.0);
    assert_eq!(g.fraction(0.0), 0.0);
}

#[test]
fn pair_conversion_preserves_order() {
    let pts = points_from_pairs(&[[1.0, 2.0], [3.5, -1.0]]);
    assert_eq!(pts, vec![Point::new(1.0, 2.0), Point::new(3.5, -1.0)]);
    assert_eq!(pairs_from_points(&pts), vec![[1.0, 2.0], [3.5, -1.0]]);
}
