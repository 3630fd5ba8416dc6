use super::*;

const TWO_STROKES: &str = r#"{
  "character": "二",
  "strokes": [
    "M 300 600 L 700 600 L 700 560 L 300 560 Z",
    "M 200 200 L 800 200 L 800 160 L 200 160 Z"
  ],
  "medians": [
    [[300, 580], [700, 580]],
    [[200, 180], [800, 180]]
  ]
}"#;

#[test]
fn parses_record_with_outlines_and_medians() {
    let g = CharacterGlyph::from_json(TWO_STROKES, None).unwrap();
    assert_eq!(g.character, '二');
    assert_eq!(g.stroke_count(), 2);
    assert_eq!(
        g.median(1).unwrap(),
        &[Point::new(200.0, 180.0), Point::new(800.0, 180.0)]
    );
    assert!(g.median(2).is_none());
    assert!(!g.strokes[0].elements().is_empty());
}

#[test]
fn mismatched_stroke_and_median_counts_are_rejected() {
    let json = r#"{"character":"一","strokes":["M 0 0 L 10 0"],"medians":[]}"#;
    let err = CharacterGlyph::from_json(json, None).unwrap_err();
    assert!(err.to_string().contains("1 strokes but 0 medians"));
}

#[test]
fn fallback_character_fills_missing_field() {
    let json = r#"{"strokes":[],"medians":[]}"#;
    let g = CharacterGlyph::from_json(json, Some('口')).unwrap();
    assert_eq!(g.character, '口');
    assert!(CharacterGlyph::from_json(json, None).is_err());
}

#[test]
fn multi_character_label_is_rejected() {
    let json = r#"{"character":"你好","strokes":[],"medians":[]}"#;
    assert!(CharacterGlyph::from_json(json, None).is_err());
}

#[test]
fn invalid_path_data_names_the_stroke() {
    let json = r#"{"character":"一","strokes":["M 0 0 X"],"medians":[[[0,0],[1,1]]]}"#;
    let err = CharacterGlyph::from_json(json, None).unwrap_err();
    assert!(err.to_string().contains("stroke 0"));
}

#[test]
fn record_conversion_keeps_medians() {
    let g = CharacterGlyph::from_json(TWO_STROKES, None).unwrap();
    let rec = g.to_record();
    assert_eq!(rec.character.as_deref(), Some("二"));
    assert_eq!(rec.medians[0], vec![[300.0, 580.0], [700.0, 580.0]]);
    assert_eq!(rec.strokes.len(), 2);
}

#[test]
fn single_point_median_is_rejected() {
    let json = r#"{"character":"丶","strokes":["M 0 0 L 10 0"],"medians":[[[5,5]]]}"#;
    let err = CharacterGlyph::from_json(json, None).unwrap_err();
    assert!(err.to_string().contains("median 0"));
}

#[test]
fn strokeless_glyph_has_no_reference() {
    let g = CharacterGlyph::new('口', vec![], vec![]).unwrap();
    assert!(!g.has_reference());
    assert!(CharacterGlyph::from_json(TWO_STROKES, None).unwrap().has_reference());
}
