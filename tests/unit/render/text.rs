use super::*;

#[test]
fn truncate_counts_characters_not_bytes() {
    assert_eq!(truncate_label("Alice", 21), "Alice");
    assert_eq!(truncate_label("abcdef", 3), "abc");
    assert_eq!(truncate_label("Дмитрий", 3), "Дми");
    assert_eq!(truncate_label("", 3), "");
    assert_eq!(truncate_label("abc", 0), "");
}

#[test]
fn missing_font_is_a_render_failure() {
    let err = LabelFont::load(Path::new("target/does-not-exist/font.ttf")).unwrap_err();
    assert!(matches!(err, WheelError::RenderFailure(_)));
}

#[test]
fn empty_font_bytes_are_rejected() {
    let err = LabelFont::from_bytes(Vec::new()).unwrap_err();
    assert!(matches!(err, WheelError::RenderFailure(_)));
}
