use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TracerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TracerError::glyph("x").to_string().contains("glyph error:"));
    assert!(TracerError::config("x").to_string().contains("config error:"));
    assert!(
        TracerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TracerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
