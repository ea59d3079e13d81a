use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, BlurSpec::from_radius(0)).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, BlurSpec::from_radius(3)).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, BlurSpec::from_radius(2)).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 8);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    let err = blur_rgba8_premul(&[0u8; 12], 2, 2, BlurSpec::from_radius(1)).unwrap_err();
    assert!(matches!(err, WheelError::RenderFailure(_)));
}

#[test]
fn blur_is_deterministic() {
    let (w, h) = (16u32, 16u32);
    let src: Vec<u8> = (0..(w * h * 4)).map(|i| (i * 37 % 251) as u8).collect();
    let spec = BlurSpec::from_radius(5);
    let a = blur_rgba8_premul(&src, w, h, spec).unwrap();
    let b = blur_rgba8_premul(&src, w, h, spec).unwrap();
    assert_eq!(a, b);
}

#[test]
fn oversized_radius_is_an_error_not_a_panic() {
    let src = vec![0u8; 4 * 4 * 4];
    let err = blur_rgba8_premul(&src, 4, 4, BlurSpec::from_radius(3_000_000_000)).unwrap_err();
    assert!(matches!(err, WheelError::InvalidConfiguration(_)));
    assert!(blur_rgba8_premul(&src, 4, 4, BlurSpec::from_radius(MAX_BLUR_RADIUS)).is_ok());
}
