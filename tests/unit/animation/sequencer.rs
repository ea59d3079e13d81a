use super::*;
use crate::foundation::core::{Canvas, normalize_degrees};
use crate::render::compositor::CompositorOpts;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn wheel(seed: u64) -> Wheel {
    let names = ["A", "B", "C", "D", "E"].map(String::from).to_vec();
    let opts = CompositorOpts::new(Canvas::square(32).unwrap(), 5).plain();
    Wheel::new(names, opts, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn spec(frames: u64) -> AnimationSpec {
    AnimationSpec {
        duration_frames: frames,
        fps: 30,
        loop_count: 1,
    }
}

#[test]
fn produces_exactly_duration_frames_in_order() {
    let mut seq = Sequencer::new(wheel(1), spec(10), SpinProfile::default()).unwrap();
    assert_eq!(seq.state(), SequencerState::Idle);

    let out = seq
        .run(&mut StdRng::seed_from_u64(2), &CancelToken::new())
        .unwrap();
    assert_eq!(seq.state(), SequencerState::Done);
    assert_eq!(out.frames.len(), 10);
    assert!(out.winner_index < 5);

    let mut prev_cumulative = 0.0;
    for (i, f) in out.frames.iter().enumerate() {
        assert_eq!(f.index, FrameIndex(i as u64));
        assert!(f.cumulative_rotation > prev_cumulative);
        let diff = (normalize_degrees(f.cumulative_rotation) - f.angle).abs();
        assert!(diff < 1e-6 || 360.0 - diff < 1e-6);
        prev_cumulative = f.cumulative_rotation;
    }

    let mut angles: Vec<f64> = out.frames.iter().map(|f| f.angle).collect();
    angles.sort_by(f64::total_cmp);
    angles.dedup();
    assert_eq!(angles.len(), 10);
}

#[test]
fn winner_recomputes_from_the_last_frame() {
    let mut seq = Sequencer::new(wheel(1), spec(6), SpinProfile::default()).unwrap();
    let out = seq
        .run(&mut StdRng::seed_from_u64(3), &CancelToken::new())
        .unwrap();
    let last = out.frames.last().unwrap();
    assert_eq!(last.angle, out.final_angle);
    assert_eq!(
        winner_index(seq.wheel().segments(), last.angle).unwrap(),
        out.winner_index
    );
    assert_eq!(seq.wheel().winner().unwrap(), out.winner_index);
}

#[test]
fn parallel_matches_sequential() {
    let run = |threading: RenderThreading| {
        let mut seq = Sequencer::new(wheel(7), spec(8), SpinProfile::default())
            .unwrap()
            .with_threading(threading);
        seq.run(&mut StdRng::seed_from_u64(7), &CancelToken::new())
            .unwrap()
    };
    let a = run(RenderThreading::default());
    let b = run(RenderThreading {
        parallel: true,
        threads: Some(2),
    });
    assert_eq!(a.winner_index, b.winner_index);
    assert_eq!(a.final_angle, b.final_angle);
    assert_eq!(a.frames.len(), b.frames.len());
    for (fa, fb) in a.frames.iter().zip(&b.frames) {
        assert_eq!(fa.index, fb.index);
        assert_eq!(fa.angle, fb.angle);
        assert_eq!(fa.image, fb.image);
    }
}

#[test]
fn cancelled_run_discards_frames() {
    let token = CancelToken::new();
    token.cancel();
    let mut seq = Sequencer::new(wheel(1), spec(5), SpinProfile::default()).unwrap();
    let err = seq.run(&mut StdRng::seed_from_u64(2), &token).unwrap_err();
    assert!(matches!(err, WheelError::Cancelled));
    assert_eq!(seq.state(), SequencerState::Idle);
}

#[test]
fn failed_run_rolls_the_wheel_back_and_can_be_retried() {
    // The parallel path resolves every angle before it checks for cancellation.
    let threading = RenderThreading {
        parallel: true,
        threads: Some(2),
    };
    let mut seq = Sequencer::new(wheel(1), spec(5), SpinProfile::default())
        .unwrap()
        .with_threading(threading);

    let token = CancelToken::new();
    token.cancel();
    let err = seq.run(&mut StdRng::seed_from_u64(2), &token).unwrap_err();
    assert!(matches!(err, WheelError::Cancelled));
    assert_eq!(seq.state(), SequencerState::Idle);
    assert_eq!(seq.wheel().current_angle(), 0.0);
    assert_eq!(seq.wheel().cumulative_rotation(), 0.0);

    let retried = seq
        .run(&mut StdRng::seed_from_u64(2), &CancelToken::new())
        .unwrap();
    let fresh = Sequencer::new(wheel(1), spec(5), SpinProfile::default())
        .unwrap()
        .with_threading(threading)
        .run(&mut StdRng::seed_from_u64(2), &CancelToken::new())
        .unwrap();
    assert_eq!(retried.final_angle, fresh.final_angle);
    assert_eq!(retried.winner_index, fresh.winner_index);
    assert_eq!(
        retried.frames.last().unwrap().cumulative_rotation,
        fresh.frames.last().unwrap().cumulative_rotation
    );
}

#[test]
fn zero_frames_or_zero_threads_is_invalid() {
    assert!(matches!(
        Sequencer::new(wheel(1), spec(0), SpinProfile::default()),
        Err(WheelError::InvalidConfiguration(_))
    ));

    let mut seq = Sequencer::new(wheel(1), spec(2), SpinProfile::default())
        .unwrap()
        .with_threading(RenderThreading {
            parallel: true,
            threads: Some(0),
        });
    assert!(matches!(
        seq.run(&mut StdRng::seed_from_u64(1), &CancelToken::new()),
        Err(WheelError::InvalidConfiguration(_))
    ));
}

#[test]
fn second_run_is_rejected() {
    let mut seq = Sequencer::new(wheel(1), spec(2), SpinProfile::default()).unwrap();
    seq.run(&mut StdRng::seed_from_u64(1), &CancelToken::new())
        .unwrap();
    assert!(
        seq.run(&mut StdRng::seed_from_u64(1), &CancelToken::new())
            .is_err()
    );
}
