use super::*;
use crate::practice::engine::{Event, PracticeEngine};
use crate::practice::opts::{PracticeMode, PracticeOpts};

fn grid() -> GridSize {
    GridSize::new(64.0).unwrap()
}

fn engine_with_stroke() -> PracticeEngine {
    let mut e = PracticeEngine::new(PracticeOpts {
        mode: PracticeMode::Tested,
        grid: grid(),
        ..PracticeOpts::default()
    })
    .unwrap();
    e.start_word("一").unwrap();
    e.handle(Event::GestureStart(Point::new(10.0, 40.0)));
    e.handle(Event::GestureMove(Point::new(54.0, 40.0)));
    e.handle(Event::GestureEnd);
    e
}

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "hanzi_tracer_{tag}_{}_{}",
        std::process::id(),
        nanos
    ))
}

#[test]
fn committed_strokes_are_inked_over_white() {
    let snap = engine_with_stroke().snapshot();
    let img = render_snapshot(&snap, None, grid()).unwrap();
    assert_eq!((img.width, img.height), (64, 64));
    assert_eq!(img.data.len(), 64 * 64 * 4);

    assert_eq!(img.pixel(5, 20), Some([255, 255, 255, 255]));
    let [r, g, b, a] = img.pixel(20, 40).unwrap();
    assert_eq!(a, 255);
    assert!(r < 100 && g < 100 && b < 100, "expected ink, got {r},{g},{b}");
    assert_eq!(img.pixel(64, 0), None);
}

#[test]
fn rejects_unrepresentable_grids() {
    let snap = engine_with_stroke().snapshot();
    let huge = GridSize::new(100_000.0).unwrap();
    assert!(render_snapshot(&snap, None, huge).is_err());
    let tiny = GridSize::new(0.2).unwrap();
    assert!(render_snapshot(&snap, None, tiny).is_err());
}

#[test]
fn png_round_trips_through_image() {
    let snap = engine_with_stroke().snapshot();
    let img = render_snapshot(&snap, None, grid()).unwrap();
    let dir = temp_dir("png");
    let path = dir.join("nested").join("snap.png");
    save_png(&img, &path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 64));
    assert_eq!(decoded.get_pixel(5, 20).0, [255, 255, 255, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pixel_lookup_on_the_largest_side_does_not_overflow() {
    let img = SnapshotImage {
        width: u32::from(u16::MAX),
        height: u32::from(u16::MAX),
        data: vec![7; 8],
    };
    assert_eq!(img.pixel(1, 0), Some([7; 4]));
    // Row offset exceeds u32 range; lookup falls outside the buffer instead of wrapping.
    assert_eq!(img.pixel(u32::from(u16::MAX) - 1, u32::from(u16::MAX) - 1), None);
}
