use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WheelError::invalid_configuration("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        WheelError::render_failure("x")
            .to_string()
            .contains("render failure:")
    );
    assert!(
        WheelError::export_failure("x")
            .to_string()
            .contains("export failure:")
    );
    assert!(
        WheelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(WheelError::Cancelled.to_string(), "render job cancelled");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WheelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
