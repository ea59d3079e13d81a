use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_in_place_rejects_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn patch_is_clipped_to_destination() {
    let mut dst = vec![0u8; 2 * 2 * 4];
    let src = [255u8, 0, 0, 255].repeat(4);
    over_patch_in_place(&mut dst, 2, 2, &src, 2, 2, 1, -1).unwrap();
    // Only the bottom-left source pixel lands on dst (1, 0).
    assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
    assert_eq!(&dst[4..8], &[255, 0, 0, 255]);
    assert_eq!(&dst[8..16], &[0u8; 8]);
}

#[test]
fn mask_scales_by_coverage() {
    let mut dst = vec![200u8, 100, 50, 200, 200, 100, 50, 200];
    let mask = vec![0u8, 0, 0, 255, 0, 0, 0, 0];
    mask_in_place(&mut dst, &mask).unwrap();
    assert_eq!(&dst[0..4], &[200, 100, 50, 200]);
    assert_eq!(&dst[4..8], &[0, 0, 0, 0]);
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}
