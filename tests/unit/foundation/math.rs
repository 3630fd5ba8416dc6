use super::*;

#[test]
fn polyline_length_sums_segments() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(3.0, 4.0),
        Point::new(3.0, 10.0),
    ];
    assert_eq!(polyline_length(&pts), 11.0);
    assert_eq!(polyline_length(&pts[..1]), 0.0);
}

#[test]
fn centroid_of_empty_is_none() {
    assert!(centroid(&[]).is_none());
    let c = centroid(&[Point::new(0.0, 0.0), Point::new(4.0, 2.0)]).unwrap();
    assert_eq!(c, Point::new(2.0, 1.0));
}

#[test]
fn nearest_distance_against_empty_set_is_infinite() {
    assert!(nearest_distance(Point::ORIGIN, &[]).is_infinite());
    let set = [Point::new(10.0, 0.0), Point::new(0.0, 5.0)];
    assert_eq!(nearest_distance(Point::ORIGIN, &set), 5.0);
}

#[test]
fn farthest_from_picks_worst_candidate() {
    let reference = [Point::new(0.0, 0.0)];
    let candidates = [
        Point::new(1.0, 0.0),
        Point::new(0.0, 7.0),
        Point::new(2.0, 2.0),
    ];
    let (p, d) = farthest_from(&candidates, &reference).unwrap();
    assert_eq!(p, Point::new(0.0, 7.0));
    assert_eq!(d, 7.0);
    assert!(farthest_from(&[], &reference).is_none());
}

#[test]
fn polyline_distance_measures_to_segments_not_vertices() {
    let line = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
    assert_eq!(distance_to_polyline(Point::new(50.0, 3.0), &line), 3.0);
    assert_eq!(distance_to_polyline(Point::new(-4.0, 3.0), &line), 5.0);
    assert_eq!(distance_to_polyline(Point::new(1.0, 1.0), &line[..1]), 2f64.sqrt());
    assert!(distance_to_polyline(Point::ORIGIN, &[]).is_infinite());
}

#[test]
fn zero_length_segment_falls_back_to_point_distance() {
    let line = [Point::new(2.0, 2.0), Point::new(2.0, 2.0)];
    assert_eq!(distance_to_polyline(Point::new(2.0, 6.0), &line), 4.0);
}
