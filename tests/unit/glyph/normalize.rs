use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn baseline_maps_to_top_edge_and_origin_below_it() {
    let g = GridSize::new(1024.0).unwrap();
    assert!(close(
        glyph_to_surface(Point::new(0.0, 900.0), g),
        Point::new(0.0, 0.0)
    ));
    assert!(close(
        glyph_to_surface(Point::new(1024.0, 0.0), g),
        Point::new(1024.0, 900.0)
    ));
}

#[test]
fn scales_with_grid_size() {
    let g = GridSize::new(256.0).unwrap();
    let p = glyph_to_surface(Point::new(512.0, 388.0), g);
    assert!(close(p, Point::new(128.0, 128.0)));
}

#[test]
fn surface_round_trip_is_identity() {
    for grid in [1.0, 97.5, 300.0, 4096.0] {
        let g = GridSize::new(grid).unwrap();
        for p in [
            Point::new(0.0, 0.0),
            Point::new(12.25, 80.0),
            Point::new(-3.0, 5000.0),
            Point::new(grid, grid),
        ] {
            let back = glyph_to_surface(surface_to_glyph(p, g), g);
            assert!((back.x - p.x).abs() < 1e-6);
            assert!((back.y - p.y).abs() < 1e-6);
        }
    }
}

#[test]
fn affine_agrees_with_point_mapping() {
    let g = GridSize::new(333.0).unwrap();
    let xf = glyph_to_surface_affine(g);
    for p in [Point::new(10.0, 20.0), Point::new(900.0, 1.0)] {
        assert!(close(xf * p, glyph_to_surface(p, g)));
    }
}

#[test]
fn outline_points_include_control_points() {
    let g = GridSize::new(1024.0).unwrap();
    let path = BezPath::from_svg("M 0 900 Q 100 800 200 900 Z").unwrap();
    let pts = outline_points_to_surface(&path, g);
    assert_eq!(pts.len(), 3);
    assert!(close(pts[0], Point::new(0.0, 0.0)));
    assert!(close(pts[1], Point::new(100.0, 100.0)));
    assert!(close(pts[2], Point::new(200.0, 0.0)));
}
