use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, RgbaImage};

use crate::effects::composite::flatten_premul_over_bg_to_opaque_rgba8;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame, ensure_parent_dir, remove_partial};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{WheelError, WheelResult};
use crate::render::frame::FrameRGBA;

/// Options for [`GifSink`] output.
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output GIF file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Palette quantization speed, `1` (best) to `30` (fastest).
    pub speed: i32,
}

impl GifSinkOpts {
    /// Create options for writing a GIF to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [255, 255, 255, 255],
            speed: 10,
        }
    }
}

type SharedIoError = Arc<Mutex<Option<io::Error>>>;

/// Keeps the first IO error, since the encoder writes its trailer on drop and discards failures.
struct ErrorTrackingWriter<W> {
    inner: W,
    error: SharedIoError,
}

impl<W: Write> ErrorTrackingWriter<W> {
    fn record<T>(&self, res: io::Result<T>) -> io::Result<T> {
        if let Err(e) = &res
            && e.kind() != io::ErrorKind::Interrupted
            && let Ok(mut slot) = self.error.lock()
            && slot.is_none()
        {
            *slot = Some(io::Error::new(e.kind(), e.to_string()));
        }
        res
    }
}

impl<W: Write> Write for ErrorTrackingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res = self.inner.write(buf);
        self.record(res)
    }

    fn flush(&mut self) -> io::Result<()> {
        let res = self.inner.flush();
        self.record(res)
    }
}

type GifOut = BufWriter<ErrorTrackingWriter<Box<dyn Write + Send>>>;

/// Sink that writes an animated GIF with one palette per frame.
pub struct GifSink {
    opts: GifSinkOpts,
    encoder: Option<GifEncoder<GifOut>>,
    write_error: SharedIoError,
    cfg: Option<SinkConfig>,
    delay: Delay,
    scratch: Vec<u8>,
    last_idx: Option<FrameIndex>,
    created: bool,
}

impl GifSink {
    /// Create a new sink; nothing is written until `begin`.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            write_error: SharedIoError::default(),
            cfg: None,
            delay: Delay::from_numer_denom_ms(0, 1),
            scratch: Vec::new(),
            last_idx: None,
            created: false,
        }
    }

    fn start(&mut self, out: Box<dyn Write + Send>, cfg: SinkConfig) -> WheelResult<()> {
        self.write_error = SharedIoError::default();
        let writer = ErrorTrackingWriter {
            inner: out,
            error: Arc::clone(&self.write_error),
        };
        let mut encoder =
            GifEncoder::new_with_speed(BufWriter::new(writer), self.opts.speed.clamp(1, 30));
        if let Some(repeat) = gif_repeat(cfg.loop_count) {
            encoder
                .set_repeat(repeat)
                .map_err(|e| WheelError::export_failure(format!("failed to set gif loop: {e}")))?;
        }

        self.delay = frame_delay(cfg.fps);
        self.scratch = vec![0u8; cfg.frame_len()];
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }
}

/// GIF repeat setting for a loop count. `None` leaves the loop extension out (play once).
pub fn gif_repeat(loop_count: u32) -> Option<Repeat> {
    match loop_count {
        0 => Some(Repeat::Infinite),
        1 => None,
        n => Some(Repeat::Finite(u16::try_from(n - 1).unwrap_or(u16::MAX))),
    }
}

/// Per-frame delay for `fps`.
pub fn frame_delay(fps: Fps) -> Delay {
    Delay::from_numer_denom_ms(1000 * fps.den, fps.num)
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> WheelResult<()> {
        cfg.validate()?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(WheelError::export_failure(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let file = File::create(&self.opts.out_path).map_err(|e| {
            WheelError::export_failure(format!(
                "failed to create '{}': {e}",
                self.opts.out_path.display()
            ))
        })?;
        self.created = true;
        self.start(Box::new(file), cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WheelResult<()> {
        check_frame(self.cfg.as_ref(), self.last_idx, idx, frame)?;
        self.last_idx = Some(idx);

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(
                &mut self.scratch,
                &frame.data,
                self.opts.bg_rgba,
            )?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(encoder) = self.encoder.as_mut() else {
            return Err(WheelError::export_failure("gif sink is already finalized"));
        };
        let img = RgbaImage::from_raw(frame.width, frame.height, self.scratch.clone())
            .ok_or_else(|| WheelError::export_failure("gif frame buffer has the wrong size"))?;
        encoder
            .encode_frame(image::Frame::from_parts(img, 0, 0, self.delay))
            .map_err(|e| WheelError::export_failure(format!("failed to encode gif frame: {e}")))?;
        Ok(())
    }

    fn end(&mut self) -> WheelResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| WheelError::export_failure("gif sink not started"))?;
        // The trailer is written and the buffer flushed when the encoder drops.
        drop(encoder);
        self.cfg = None;
        let failed = self.write_error.lock().ok().and_then(|mut slot| slot.take());
        match failed {
            Some(e) => Err(WheelError::export_failure(format!(
                "failed to write '{}': {e}",
                self.opts.out_path.display()
            ))),
            None => Ok(()),
        }
    }

    fn abort(&mut self) {
        drop(self.encoder.take());
        self.cfg = None;
        if self.created {
            remove_partial(&self.opts.out_path);
            self.created = false;
        }
    }
}
