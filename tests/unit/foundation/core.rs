use super::*;

#[test]
fn normalize_degrees_wraps_into_half_open_turn() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(430.0), 70.0);
    assert_eq!(normalize_degrees(-90.0), 270.0);
    let tiny = normalize_degrees(-1e-18);
    assert!((0.0..360.0).contains(&tiny));
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frames_to_secs(15) - 0.5).abs() < 1e-12);
}

#[test]
fn canvas_square_bounds() {
    assert!(Canvas::square(8).is_err());
    assert!(Canvas::square(Canvas::MAX_SIDE + 1).is_err());
    let c = Canvas::square(500).unwrap();
    assert_eq!(c.center(), Point::new(250.0, 250.0));
    assert_eq!(c.rgba_len(), 500 * 500 * 4);
}

#[test]
fn premul_conversion_scales_color_by_alpha() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
}
