use super::*;
use crate::encode::sink::InMemorySink;
use crate::render::frame::FrameRGBA;

fn frame(i: u64, side: u32) -> Frame {
    Frame {
        index: FrameIndex(i),
        angle: i as f64,
        cumulative_rotation: i as f64,
        image: FrameRGBA {
            width: side,
            height: side,
            data: vec![(i * 20) as u8; (side * side * 4) as usize],
            premultiplied: true,
        },
    }
}

fn spec(loop_count: u32) -> AnimationSpec {
    AnimationSpec {
        duration_frames: 3,
        fps: 10,
        loop_count,
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wheelspin-exporter-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn format_comes_from_the_extension() {
    assert_eq!(
        ExportFormat::from_path(Path::new("out/spin.GIF")).unwrap(),
        ExportFormat::Gif
    );
    assert_eq!(
        ExportFormat::from_path(Path::new("spin.mp4")).unwrap(),
        ExportFormat::Mp4
    );
    for bad in ["spin.webm", "spin"] {
        assert!(matches!(
            ExportFormat::from_path(Path::new(bad)),
            Err(WheelError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn mp4_unrolls_loops_and_gif_does_not() {
    assert_eq!(ExportFormat::Gif.passes(5), 1);
    assert_eq!(ExportFormat::Mp4.passes(0), 1);
    assert_eq!(ExportFormat::Mp4.passes(3), 3);
}

#[test]
fn sink_receives_every_frame_in_order() {
    let frames: Vec<Frame> = (0..3).map(|i| frame(i, 4)).collect();
    let mut sink = InMemorySink::new();
    let n = export_to_sink(&mut sink, &frames, &spec(0), 2).unwrap();
    assert_eq!(n, 6);
    assert!(sink.is_finished());
    let got: Vec<u8> = sink.frames().iter().map(|(_, f)| f.data[0]).collect();
    assert_eq!(got, vec![0, 20, 40, 0, 20, 40]);
    assert_eq!(sink.config().unwrap().fps.num, 10);
}

#[test]
fn empty_frame_list_is_an_export_failure() {
    let dir = scratch_dir("empty");
    let out = dir.join("spin.gif");
    let exporter = Exporter::new(ExportOpts::for_path(&out).unwrap());
    let err = exporter.export(&[], &spec(0)).unwrap_err();
    assert!(matches!(err, WheelError::ExportFailure(_)));
    assert!(!out.exists());
}

#[test]
fn out_of_order_frames_are_rejected() {
    let frames = vec![frame(1, 4), frame(0, 4)];
    let mut sink = InMemorySink::new();
    assert!(matches!(
        export_to_sink(&mut sink, &frames, &spec(0), 1),
        Err(WheelError::ExportFailure(_))
    ));
}

#[test]
fn mismatched_frame_removes_the_partial_file() {
    let dir = scratch_dir("mismatch");
    let out = dir.join("spin.gif");
    let frames = vec![frame(0, 8), frame(1, 6)];
    let err = Exporter::new(ExportOpts::for_path(&out).unwrap())
        .export(&frames, &spec(0))
        .unwrap_err();
    assert!(matches!(err, WheelError::ExportFailure(_)));
    assert!(!out.exists());
}

#[test]
fn unwritable_path_is_an_export_failure() {
    let dir = scratch_dir("unwritable");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let out = blocker.join("spin.gif");

    let frames = vec![frame(0, 4)];
    let err = Exporter::new(ExportOpts::for_path(&out).unwrap())
        .export(&frames, &spec(0))
        .unwrap_err();
    assert!(matches!(err, WheelError::ExportFailure(_)));
}

#[test]
fn gif_export_reports_size() {
    let dir = scratch_dir("gif");
    let out = dir.join("spin.gif");
    let frames: Vec<Frame> = (0..3).map(|i| frame(i, 8)).collect();
    let artifact = Exporter::new(ExportOpts::for_path(&out).unwrap())
        .export(&frames, &spec(1))
        .unwrap();
    assert_eq!(artifact.frames_written, 3);
    assert_eq!(artifact.format, ExportFormat::Gif);
    assert!(artifact.bytes > 0);
    assert_eq!(std::fs::metadata(&out).unwrap().len(), artifact.bytes);
}
