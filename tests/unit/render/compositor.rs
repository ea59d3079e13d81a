use super::*;
use crate::geometry::segments::compute_segments;
use crate::wheel::style::WheelStyle;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn layers(opts: &CompositorOpts, n: usize) -> WheelLayers {
    let segments = compute_segments(n).unwrap();
    let labels: Vec<String> = (0..n).map(|i| i.to_string()).collect();
    let style = WheelStyle::random(&mut StdRng::seed_from_u64(3), n, 4);
    compose_layers(&LayerScene::new(opts, &segments, &labels, &style)).unwrap()
}

#[test]
fn layer_order_is_fixed() {
    assert_eq!(
        WheelLayer::ORDER,
        [
            WheelLayer::Gradient,
            WheelLayer::Segments,
            WheelLayer::Shadow,
            WheelLayer::Depth,
            WheelLayer::Twinkle,
            WheelLayer::Glow,
        ]
    );
}

#[test]
fn default_blur_sizes_follow_segment_size_and_canvas() {
    assert_eq!(default_shadow_blur_px(5, 1.0), 36);
    assert_eq!(default_shadow_blur_px(10, 1.0), 18);
    assert_eq!(default_shadow_blur_px(10, 0.5), 9);

    let opts = CompositorOpts::new(Canvas::square(500).unwrap(), 5);
    assert_eq!(opts.glow.blur_px, 50);
    assert_eq!(opts.radius_px(), 200.0);
}

#[test]
fn plain_disables_every_overlay() {
    let opts = CompositorOpts::new(Canvas::square(64).unwrap(), 5).plain();
    for layer in [
        WheelLayer::Shadow,
        WheelLayer::Depth,
        WheelLayer::Twinkle,
        WheelLayer::Glow,
    ] {
        assert_eq!(layer.opacity(&opts), 0.0);
    }
    assert!(!opts.textures);
    assert!(opts.labels.is_none());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let base = CompositorOpts::new(Canvas::square(64).unwrap(), 5);
    assert!(base.validate().is_ok());

    let mut o = base.clone();
    o.wheel_radius = 0.7;
    assert!(matches!(
        o.validate(),
        Err(WheelError::InvalidConfiguration(_))
    ));

    let mut o = base.clone();
    o.glow.opacity = 1.5;
    assert!(o.validate().is_err());

    let mut o = base.clone();
    o.glow.blur_px = 64;
    assert!(o.validate().is_ok());
    o.glow.blur_px = 3_000_000_000;
    assert!(matches!(
        o.validate(),
        Err(WheelError::InvalidConfiguration(_))
    ));

    let mut o = base;
    o.pointer_blur_px = 65;
    assert!(matches!(
        o.validate(),
        Err(WheelError::InvalidConfiguration(_))
    ));
}

#[test]
fn frame_at_zero_is_wheel_plus_pointer() {
    let opts = CompositorOpts::new(Canvas::square(64).unwrap(), 5);
    let l = layers(&opts, 5);
    let frame = render_frame(&l, 0.0).unwrap();
    assert_eq!((frame.width, frame.height), (64, 64));
    assert!(frame.premultiplied);

    let mut expected = l.wheel().to_vec();
    over_in_place(&mut expected, l.pointer(), 1.0).unwrap();
    assert_eq!(frame.data, expected);

    let turned = render_frame(&l, 90.0).unwrap();
    assert_ne!(turned.data, frame.data);
    assert_eq!(turned.data.len(), frame.data.len());
}

#[test]
fn full_turn_renders_like_zero() {
    let opts = CompositorOpts::new(Canvas::square(48).unwrap(), 5).plain();
    let l = layers(&opts, 5);
    assert_eq!(
        render_frame(&l, 360.0).unwrap().data,
        render_frame(&l, 0.0).unwrap().data
    );
}

#[test]
fn non_finite_angle_is_a_render_failure() {
    let opts = CompositorOpts::new(Canvas::square(32).unwrap(), 5).plain();
    let l = layers(&opts, 5);
    assert!(matches!(
        render_frame(&l, f64::NAN),
        Err(WheelError::RenderFailure(_))
    ));
}

#[test]
fn wheel_layer_is_empty_outside_the_disc() {
    let opts = CompositorOpts::new(Canvas::square(64).unwrap(), 5);
    let l = layers(&opts, 5);
    assert_eq!(&l.wheel()[0..4], &[0, 0, 0, 0]);
    let last = l.wheel().len() - 4;
    assert_eq!(&l.wheel()[last..], &[0, 0, 0, 0]);
}
