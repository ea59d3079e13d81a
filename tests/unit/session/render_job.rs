use super::*;
use crate::geometry::segments::{compute_segments, winner_index};

fn config(names: &[&str], seed: u64) -> JobConfig {
    let mut cfg = JobConfig {
        participants: names.iter().map(|s| s.to_string()).collect(),
        seed: Some(seed),
        ..JobConfig::default()
    };
    cfg.animation.duration_frames = 6;
    cfg.animation.fps = 30;
    cfg.animation.loop_count = 1;
    cfg.style.size = 64;
    cfg
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wheelspin-session-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

const FIVE: [&str; 5] = ["A", "B", "C", "D", "E"];

#[test]
fn run_writes_gif_and_resolves_winner() {
    let out = scratch("run").join("spin.gif");
    let res = RenderJob::new(config(&FIVE, 11), &out).run().unwrap();

    assert_eq!(res.artifact_path, out);
    assert_eq!(res.frame_count, 6);
    assert_eq!(res.seed, 11);
    assert!(res.winner_index < 5);
    assert_eq!(res.winner_name, FIVE[res.winner_index]);
    assert!(res.bytes > 0);
    assert_eq!(std::fs::metadata(&out).unwrap().len(), res.bytes);

    let segments = compute_segments(5).unwrap();
    assert_eq!(
        winner_index(&segments, res.final_angle).unwrap(),
        res.winner_index
    );
}

#[test]
fn same_seed_same_outcome() {
    let dir = scratch("seeded");
    let a = RenderJob::new(config(&FIVE, 99), dir.join("a.gif"))
        .run()
        .unwrap();
    let b = RenderJob::new(config(&FIVE, 99), dir.join("b.gif"))
        .run()
        .unwrap();
    assert_eq!(a.winner_index, b.winner_index);
    assert_eq!(a.final_angle, b.final_angle);
    assert_eq!(
        std::fs::read(dir.join("a.gif")).unwrap(),
        std::fs::read(dir.join("b.gif")).unwrap()
    );
}

#[test]
fn too_few_participants_fail_before_rendering() {
    let out = scratch("four").join("spin.gif");
    let err = RenderJob::new(config(&FIVE[..4], 1), &out)
        .run()
        .unwrap_err();
    assert!(matches!(err, WheelError::InvalidConfiguration(_)));
    assert!(!out.exists());
}

#[test]
fn mp4_needs_even_canvas() {
    let out = scratch("odd").join("spin.mp4");
    let mut cfg = config(&FIVE, 1);
    cfg.style.size = 65;
    let err = RenderJob::new(cfg, &out).run().unwrap_err();
    assert!(matches!(err, WheelError::InvalidConfiguration(_)));
}

#[test]
fn format_override_beats_extension() {
    let job = RenderJob::new(config(&FIVE, 1), "spin.bin").with_format(ExportFormat::Gif);
    assert_eq!(job.format().unwrap(), ExportFormat::Gif);
    assert!(matches!(
        RenderJob::new(config(&FIVE, 1), "spin.bin").format(),
        Err(WheelError::InvalidConfiguration(_))
    ));
}

#[test]
fn cancelled_job_writes_nothing() {
    let out = scratch("cancel").join("spin.gif");
    let job = RenderJob::new(config(&FIVE, 3), &out);
    job.cancel_token().cancel();
    assert!(matches!(job.run(), Err(WheelError::Cancelled)));
    assert!(!out.exists());
}

#[test]
fn parallel_job_matches_sequential() {
    let dir = scratch("parallel");
    let seq = RenderJob::new(config(&FIVE, 5), dir.join("seq.gif"))
        .run()
        .unwrap();
    let mut cfg = config(&FIVE, 5);
    cfg.render.parallel = true;
    cfg.render.threads = Some(2);
    let par = RenderJob::new(cfg, dir.join("par.gif")).run().unwrap();
    assert_eq!(seq.winner_index, par.winner_index);
    assert_eq!(seq.final_angle, par.final_angle);
}

#[test]
fn single_frame_matches_canvas() {
    let job = RenderJob::new(config(&FIVE, 8), "unused.gif");
    let a = job.render_frame_at(45.0).unwrap();
    let b = job.render_frame_at(405.0).unwrap();
    assert_eq!((a.width, a.height), (64, 64));
    assert!(a.premultiplied);
    assert_eq!(a, b);
}

#[test]
fn unbounded_blur_or_length_fails_validation_instead_of_rendering() {
    let out = scratch("bounds").join("spin.gif");

    let mut cfg = config(&FIVE, 2);
    cfg.style.glow_blur_px = Some(3_000_000_000);
    assert!(matches!(
        RenderJob::new(cfg, &out).run(),
        Err(WheelError::InvalidConfiguration(_))
    ));

    let mut cfg = config(&FIVE, 2);
    cfg.animation.duration_frames = u64::MAX;
    assert!(matches!(
        RenderJob::new(cfg, &out).run(),
        Err(WheelError::InvalidConfiguration(_))
    ));
    assert!(!out.exists());
}
