use super::*;
use crate::glyph::normalize::glyph_to_surface;

fn grid() -> GridSize {
    GridSize::new(1024.0).unwrap()
}

fn san() -> Arc<CharacterGlyph> {
    let medians = vec![
        vec![Point::new(200.0, 700.0), Point::new(800.0, 700.0)],
        vec![Point::new(250.0, 500.0), Point::new(750.0, 500.0)],
        vec![Point::new(150.0, 250.0), Point::new(850.0, 250.0)],
    ];
    let strokes = medians
        .iter()
        .map(|m| {
            let mut p = kurbo::BezPath::new();
            p.move_to(m[0]);
            p.line_to(m[1]);
            p
        })
        .collect();
    Arc::new(CharacterGlyph::new('三', strokes, medians).unwrap())
}

fn trace_along(session: &mut TracerSession, median: &[Point], jitter: f64) -> StrokeOutcome {
    let a = glyph_to_surface(median[0], grid());
    let b = glyph_to_surface(median[1], grid());
    session.begin_gesture(Point::new(a.x + jitter, a.y + jitter));
    for i in 1..=8 {
        let t = f64::from(i) / 8.0;
        session.extend_gesture(Point::new(
            a.x + (b.x - a.x) * t + jitter,
            a.y + (b.y - a.y) * t - jitter,
        ));
    }
    session.end_gesture(&ValidatorConfig::default())
}

#[test]
fn three_matching_strokes_complete_the_character() {
    let glyph = san();
    let mut s = TracerSession::new('三', Some(glyph.clone()), grid());
    assert_eq!(s.total_strokes(), 3);

    let mut outcomes = Vec::new();
    for m in &glyph.medians {
        outcomes.push(trace_along(&mut s, m, 20.0));
    }
    assert_eq!(
        outcomes,
        vec![
            StrokeOutcome::Accepted {
                stroke_index: 0,
                character_complete: false
            },
            StrokeOutcome::Accepted {
                stroke_index: 1,
                character_complete: false
            },
            StrokeOutcome::Accepted {
                stroke_index: 2,
                character_complete: true
            },
        ]
    );
    assert!(s.is_complete());
    assert_eq!(s.rejections(), 0);
    assert_eq!(s.committed().len(), 3);
    assert!(!s.is_drawing());
}

#[test]
fn rejection_keeps_stroke_index_and_retains_points() {
    let glyph = san();
    let mut s = TracerSession::new('三', Some(glyph.clone()), grid());

    // Second stroke first: starts far from the expected one.
    let out = trace_along(&mut s, &glyph.medians[2], 0.0);
    assert!(matches!(
        out,
        StrokeOutcome::Rejected {
            stroke_index: 0,
            ..
        }
    ));
    assert_eq!(s.stroke_index(), 0);
    assert!(s.committed().is_empty());
    assert_eq!(s.last_rejected().unwrap().len(), 9);
    assert!(s.live_points().is_empty());

    let out = trace_along(&mut s, &glyph.medians[0], 0.0);
    assert!(matches!(out, StrokeOutcome::Accepted { stroke_index: 0, .. }));
    assert!(s.last_rejected().is_none());
}

#[test]
fn missing_glyph_accepts_any_single_stroke() {
    let mut s = TracerSession::new('龘', None, grid());
    assert_eq!(s.total_strokes(), 1);
    s.begin_gesture(Point::new(3.0, 3.0));
    let out = s.end_gesture(&ValidatorConfig::default());
    assert_eq!(
        out,
        StrokeOutcome::Accepted {
            stroke_index: 0,
            character_complete: true
        }
    );
    assert!(s.is_complete());
    assert_eq!(s.end_gesture(&ValidatorConfig::default()), StrokeOutcome::Ignored);
}

#[test]
fn strokeless_glyph_falls_back_like_a_missing_one() {
    let empty = Arc::new(CharacterGlyph::new('〇', vec![], vec![]).unwrap());
    let mut s = TracerSession::new('〇', Some(empty), grid());
    assert_eq!(s.total_strokes(), 1);
    s.begin_gesture(Point::new(500.0, 500.0));
    assert_eq!(
        s.end_gesture(&ValidatorConfig::default()),
        StrokeOutcome::Accepted {
            stroke_index: 0,
            character_complete: true
        }
    );
}

#[test]
fn glyph_arriving_late_replaces_the_fallback() {
    let mut s = TracerSession::new('三', None, grid());
    assert_eq!(s.total_strokes(), 1);
    s.attach_glyph(Some(san()));
    assert_eq!(s.total_strokes(), 3);
    assert!(s.expected_median().is_some());
}

#[test]
fn glyph_is_not_attached_after_completion() {
    let mut s = TracerSession::new('三', None, grid());
    s.submit_stroke(vec![Point::new(1.0, 1.0)], &ValidatorConfig::default());
    assert!(s.is_complete());
    s.attach_glyph(Some(san()));
    assert!(s.glyph().is_none());
    assert!(s.is_complete());
}

#[test]
fn repeat_clears_committed_strokes() {
    let glyph = san();
    let mut s = TracerSession::new('三', Some(glyph.clone()), grid());
    trace_along(&mut s, &glyph.medians[0], 0.0);
    s.begin_gesture(Point::new(1.0, 1.0));
    s.repeat();
    assert_eq!(s.stroke_index(), 0);
    assert!(s.committed().is_empty());
    assert!(!s.is_drawing());
}

#[test]
fn unjudged_strokes_accumulate_on_the_canvas() {
    let mut s = TracerSession::new('三', Some(san()), grid());
    s.begin_gesture(Point::new(1.0, 1.0));
    s.extend_gesture(Point::new(5.0, 1.0));
    assert_eq!(s.end_gesture_unjudged(), Some(1));
    s.begin_gesture(Point::new(9.0, 9.0));
    assert_eq!(s.end_gesture_unjudged(), Some(2));
    assert_eq!(s.end_gesture_unjudged(), None);
    assert_eq!(s.canvas_points().len(), 3);
    assert_eq!(s.stroke_index(), 0);

    let taken = s.take_canvas();
    assert_eq!(taken.len(), 2);
    assert!(s.committed().is_empty());
}
