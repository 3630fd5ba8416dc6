use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "hanzi_tracer_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

const DICT: &str = r#"{"character":"一","strokes":["M 100 400 L 900 400 L 900 360 L 100 360 Z"],"medians":[[[100,380],[900,380]]]}

{"character":"丨","strokes":["M 480 800 L 520 800 L 520 0 L 480 0 Z"],"medians":[[[500,800],[500,0]]]}
"#;

#[test]
fn jsonl_skips_blank_lines_and_indexes_by_character() {
    let p = JsonlGlyphProvider::from_reader(DICT.as_bytes()).unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(p.fetch('一').unwrap().unwrap().stroke_count(), 1);
    assert!(p.fetch('二').unwrap().is_none());
}

#[test]
fn jsonl_reports_the_bad_line() {
    let text = format!("{DICT}{{\"character\":\"x\"\n");
    let err = JsonlGlyphProvider::from_reader(text.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 4"), "{err}");
}

#[test]
fn memory_provider_collects_from_iterator() {
    let g = CharacterGlyph::new('口', vec![], vec![]).unwrap();
    let p: MemoryGlyphProvider = std::iter::once(g).collect();
    assert!(p.fetch('口').unwrap().is_some());
    assert!(p.fetch('日').unwrap().is_none());
}

#[test]
fn dir_provider_reads_per_character_files() {
    let dir = temp_dir("dir_provider");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("一.json"),
        r#"{"strokes":["M 100 400 L 900 400 Z"],"medians":[[[100,380],[900,380]]]}"#,
    )
    .unwrap();
    std::fs::write(dir.join("坏.json"), "not json").unwrap();

    let p = DirGlyphProvider::new(&dir);
    let g = p.fetch('一').unwrap().unwrap();
    assert_eq!(g.character, '一');
    assert!(p.fetch('二').unwrap().is_none());
    assert!(p.fetch('坏').is_err());

    std::fs::remove_dir_all(&dir).ok();
}
