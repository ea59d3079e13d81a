use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use wheelspin::effects::composite::flatten_premul_over_bg_to_opaque_rgba8;
use wheelspin::{ExportFormat, JobConfig, RenderJob};

#[derive(Parser, Debug)]
#[command(name = "wheelspin", version, about = "Render prize-wheel spin animations")]
struct Cli {
    /// Log debug events (per-frame steps).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spin the wheel and write a GIF or MP4 (MP4 requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the wheel at one fixed angle as a PNG.
    Frame(FrameArgs),
}

/// Job inputs shared by both commands. Flags override values from `--config`.
#[derive(Args, Debug)]
struct JobArgs {
    /// JSON job file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Participant names, comma separated or repeated.
    #[arg(short, long, value_delimiter = ',')]
    participants: Vec<String>,

    /// Seed for styling and spin.
    #[arg(long)]
    seed: Option<u64>,

    /// Square canvas side in pixels.
    #[arg(long)]
    size: Option<u32>,

    /// Font used for participant labels.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Output path (.gif or .mp4).
    #[arg(long)]
    out: PathBuf,

    /// Output format. Defaults to the extension of `--out`.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// Number of frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Loop count (0 = forever).
    #[arg(long = "loop")]
    loop_count: Option<u32>,

    /// Render frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Wheel rotation in degrees (clockwise).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Gif,
    Mp4,
}

impl From<FormatChoice> for ExportFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Gif => ExportFormat::Gif,
            FormatChoice::Mp4 => ExportFormat::Mp4,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_job(args: &JobArgs) -> anyhow::Result<JobConfig> {
    let mut cfg = match &args.config {
        Some(path) => JobConfig::from_path(path)
            .with_context(|| format!("load job config '{}'", path.display()))?,
        None => JobConfig::default(),
    };
    if !args.participants.is_empty() {
        cfg.participants = args
            .participants
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if let Some(size) = args.size {
        cfg.style.size = size;
    }
    if args.font.is_some() {
        cfg.style.font = args.font.clone();
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_job(&args.job)?;
    if let Some(frames) = args.frames {
        cfg.animation.duration_frames = frames;
    }
    if let Some(fps) = args.fps {
        cfg.animation.fps = fps;
    }
    if let Some(loop_count) = args.loop_count {
        cfg.animation.loop_count = loop_count;
    }
    if args.parallel {
        cfg.render.parallel = true;
    }
    if args.threads.is_some() {
        cfg.render.threads = args.threads;
    }

    let mut job = RenderJob::new(cfg, &args.out);
    if let Some(format) = args.format {
        job = job.with_format(format.into());
    }
    let res = job.run()?;

    eprintln!(
        "wrote {} ({} frames, {} bytes)",
        res.artifact_path.display(),
        res.frame_count,
        res.bytes
    );
    println!("{}\t{}", res.winner_index, res.winner_name);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_job(&args.job)?;
    let bg = cfg.style.background;
    let frame = RenderJob::new(cfg, &args.out).render_frame_at(args.angle)?;

    let mut rgba = vec![0u8; frame.data.len()];
    flatten_premul_over_bg_to_opaque_rgba8(&mut rgba, &frame.data, bg)?;
    write_png(&args.out, &rgba, frame.width, frame.height)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_png(path: &Path, rgba: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
