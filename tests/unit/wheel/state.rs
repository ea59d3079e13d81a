use super::*;
use crate::foundation::core::Canvas;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{i}")).collect()
}

fn opts(n: usize) -> CompositorOpts {
    CompositorOpts::new(Canvas::square(48).unwrap(), n).plain()
}

#[test]
fn fewer_than_five_participants_is_invalid() {
    let err = Wheel::new(names(4), opts(4), &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(err, WheelError::InvalidConfiguration(_)));
}

#[test]
fn rotate_normalizes_and_accumulates() {
    let mut wheel = Wheel::new(names(5), opts(5), &mut StdRng::seed_from_u64(1)).unwrap();
    let angles: Vec<f64> = [30.0, 400.0, 725.0]
        .into_iter()
        .map(|d| wheel.rotate(d).unwrap())
        .collect();
    assert_eq!(angles, vec![30.0, 70.0, 75.0]);
    assert_eq!(wheel.cumulative_rotation(), 1155.0);

    wheel.rotate(-80.0).unwrap();
    assert_eq!(wheel.current_angle(), 355.0);
    assert!(wheel.rotate(f64::INFINITY).is_err());
}

#[test]
fn styling_is_fixed_by_the_seed() {
    let a = Wheel::new(names(6), opts(6), &mut StdRng::seed_from_u64(9)).unwrap();
    let b = Wheel::new(names(6), opts(6), &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(a.style(), b.style());
}

#[test]
fn style_length_must_match() {
    let style = WheelStyle::random(&mut StdRng::seed_from_u64(2), 6, 0);
    let err = Wheel::with_style(names(5), style, opts(5)).unwrap_err();
    assert!(matches!(err, WheelError::InvalidConfiguration(_)));
}

#[test]
fn render_depends_only_on_angle() {
    let mut wheel = Wheel::new(names(5), opts(5), &mut StdRng::seed_from_u64(4)).unwrap();
    wheel.rotate(123.0).unwrap();
    let first = wheel.render().unwrap();
    wheel.rotate(360.0).unwrap();
    let again = wheel.render().unwrap();
    assert_eq!(first, again);
    assert_eq!(wheel.render_at(123.0).unwrap(), first);
}

#[test]
fn winner_reads_the_inverted_angle() {
    let mut wheel = Wheel::new(names(5), opts(5), &mut StdRng::seed_from_u64(4)).unwrap();
    assert_eq!(wheel.winner().unwrap(), 0);
    wheel.set_angle(10.0).unwrap();
    assert_eq!(wheel.winner().unwrap(), 4);
    wheel.set_angle(300.0).unwrap();
    assert_eq!(wheel.winner().unwrap(), 0);
    wheel.set_angle(100.0).unwrap();
    assert_eq!(wheel.winner().unwrap(), 3);
}
