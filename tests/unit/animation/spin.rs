use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn uniform_deltas_stay_in_range() {
    let deltas = SpinProfile::default()
        .plan(200, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(deltas.len(), 200);
    for d in deltas {
        assert!((360.0..720.0).contains(&d));
        assert_ne!(d, 360.0);
    }
}

#[test]
fn plan_is_reproducible_from_the_seed() {
    let p = SpinProfile::default();
    let a = p.plan(20, &mut StdRng::seed_from_u64(1)).unwrap();
    let b = p.plan(20, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn decelerating_deltas_never_increase() {
    let p = SpinProfile::Decelerating {
        initial_deg: 90.0,
        final_deg: 5.0,
    };
    let deltas = p.plan(50, &mut StdRng::seed_from_u64(8)).unwrap();
    assert!(deltas.windows(2).all(|w| w[0] >= w[1]));
    assert!(deltas.iter().all(|d| (5.0..90.0).contains(d)));
}

#[test]
fn empty_or_bad_ranges_are_rejected() {
    for p in [
        SpinProfile::Uniform {
            min_deg: 10.0,
            max_deg: 10.0,
        },
        SpinProfile::Uniform {
            min_deg: 0.0,
            max_deg: 10.0,
        },
        SpinProfile::Decelerating {
            initial_deg: 5.0,
            final_deg: 50.0,
        },
        SpinProfile::Uniform {
            min_deg: 1.0,
            max_deg: f64::INFINITY,
        },
    ] {
        assert!(matches!(
            p.plan(3, &mut StdRng::seed_from_u64(0)),
            Err(WheelError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn profile_json_is_tagged() {
    let p: SpinProfile =
        serde_json::from_str(r#"{"kind":"decelerating","initial_deg":720,"final_deg":10}"#)
            .unwrap();
    assert_eq!(
        p,
        SpinProfile::Decelerating {
            initial_deg: 720.0,
            final_deg: 10.0
        }
    );
}

#[test]
fn oversized_plan_is_rejected_before_allocating() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        SpinProfile::default().plan(u64::MAX, &mut rng),
        Err(WheelError::InvalidConfiguration(_))
    ));
    let plan = SpinProfile::default()
        .plan(MAX_DURATION_FRAMES, &mut rng)
        .unwrap();
    assert_eq!(plan.len() as u64, MAX_DURATION_FRAMES);
}
