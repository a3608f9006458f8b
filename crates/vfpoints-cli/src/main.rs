//! vfpoints CLI: command-line interface for laser-point trajectory repair.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use vfpoints::project;
use vfpoints::{
    encode_runs, FrameStack, RepairConfig, RepairInput, Repairer, RunCounts, VisibilityClass,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

#[derive(Parser)]
#[command(name = "vfpoints")]
#[command(about = "Repair tracked laser-point trajectories in laryngoscopy video")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Repair tracked points of one recording.
    Repair(CliRepairArgs),

    /// Print the run labeling of a class string (e.g. VSSUV).
    Runs {
        /// Per-frame classes: V/S/U or 2/1/0.
        #[arg(long)]
        classes: String,

        /// Longest gap that is still interpolated.
        #[arg(long, default_value = "5")]
        max_gap: usize,
    },

    /// Print the default repair configuration as JSON.
    PrintConfig,
}

#[derive(Debug, Clone, Args)]
struct CliRepairArgs {
    /// Directory of video frames (sorted by file name).
    #[arg(long)]
    frames: PathBuf,

    /// Tracked points (frame-indexed JSON).
    #[arg(long)]
    points: PathBuf,

    /// Visibility labels (frame-indexed JSON).
    #[arg(long)]
    labels: PathBuf,

    /// Path to write repaired points (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Path to write per-frame run labels (JSON).
    #[arg(long)]
    out_labels: Option<PathBuf>,

    /// Directory of vocal-fold masks; points off the folds are dropped.
    #[arg(long)]
    vocalfold_masks: Option<PathBuf>,

    /// Directory of glottis masks; points inside the glottis are dropped.
    #[arg(long)]
    glottis_masks: Option<PathBuf>,

    /// Repair configuration (JSON). Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Longest gap that is still interpolated.
    #[arg(long)]
    max_gap: Option<usize>,

    /// Half-size of the refinement window in pixels.
    #[arg(long)]
    window_radius: Option<usize>,

    /// Temporal smoothing kernel size (odd).
    #[arg(long)]
    kernel_size: Option<usize>,

    /// Temporal smoothing sigma in frames.
    #[arg(long)]
    sigma: Option<f64>,

    /// Minimum resolved samples before a track is smoothed.
    #[arg(long)]
    min_smooth_samples: Option<usize>,

    /// Disable temporal smoothing.
    #[arg(long)]
    no_smooth: bool,

    /// Leave leading/trailing unresolved frames empty.
    #[arg(long)]
    no_border_fill: bool,
}

impl CliRepairArgs {
    fn to_config(&self) -> CliResult<RepairConfig> {
        let mut config = match &self.config {
            Some(path) => RepairConfig::from_json_file(path)?,
            None => RepairConfig::default(),
        };
        if let Some(v) = self.max_gap {
            config.runs.max_gap = v;
        }
        if let Some(v) = self.window_radius {
            config.window.radius = v;
        }
        if let Some(v) = self.kernel_size {
            config.smoothing.kernel_size = v;
        }
        if let Some(v) = self.sigma {
            config.smoothing.sigma = v;
        }
        if let Some(v) = self.min_smooth_samples {
            config.smoothing.min_valid_samples = v;
        }
        if self.no_smooth {
            config.smoothing.enable = false;
        }
        if self.no_border_fill {
            config.border_fill = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Repair(args) => run_repair(&args),
        Commands::Runs { classes, max_gap } => run_runs(&classes, max_gap),
        Commands::PrintConfig => run_print_config(),
    }
}

// ── print-config ───────────────────────────────────────────────────────

fn run_print_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&RepairConfig::default())?);
    Ok(())
}

// ── runs ───────────────────────────────────────────────────────────────

fn parse_classes(raw: &str) -> CliResult<Vec<VisibilityClass>> {
    raw.trim()
        .chars()
        .map(|c| {
            VisibilityClass::from_char(c)
                .ok_or_else(|| -> CliError { format!("invalid class character '{}'", c).into() })
        })
        .collect()
}

fn run_runs(raw: &str, max_gap: usize) -> CliResult<()> {
    let classes = parse_classes(raw)?;
    let labels = encode_runs(&classes, max_gap);
    let counts = RunCounts::from_labels(&labels);

    let rendered: String = labels.iter().map(|l| l.as_char()).collect();
    println!("classes:  {}", raw.trim());
    println!("runs:     {}", rendered);
    println!(
        "counts:   visible={} interpolate={} unrecoverable={}",
        counts.visible, counts.interpolate, counts.unrecoverable
    );
    Ok(())
}

// ── repair ─────────────────────────────────────────────────────────────

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load every image in `dir`, sorted by file name, as 8-bit luma.
fn load_frame_dir(dir: &Path) -> CliResult<FrameStack> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| -> CliError { format!("Failed to read {}: {}", dir.display(), e).into() })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_image(p))
        .collect();
    paths.sort();

    let frames = paths
        .iter()
        .map(|path| {
            image::open(path)
                .map(|img| img.to_luma8())
                .map_err(|e| -> CliError {
                    format!("Failed to open image {}: {}", path.display(), e).into()
                })
        })
        .collect::<CliResult<Vec<_>>>()?;

    let stack = FrameStack::new(frames)?;
    let [w, h] = stack.dimensions();
    tracing::info!("Loaded {} frames ({}x{}) from {}", stack.len(), w, h, dir.display());
    Ok(stack)
}

fn run_repair(args: &CliRepairArgs) -> CliResult<()> {
    let config = args.to_config()?;

    let video = load_frame_dir(&args.frames)?;
    let detections = project::read_points_json(&args.points)?;
    tracing::info!(
        "Loaded {} markers over {} frames from {}",
        detections.n_markers(),
        detections.n_frames(),
        args.points.display()
    );
    let classes =
        project::read_labels_json(&args.labels, detections.markers(), detections.n_frames())?;

    let vocalfold = args.vocalfold_masks.as_deref().map(load_frame_dir).transpose()?;
    let glottis = args.glottis_masks.as_deref().map(load_frame_dir).transpose()?;

    let mut input = RepairInput::new(&detections, &classes, &video);
    if let Some(masks) = &vocalfold {
        input = input.with_vocalfold_masks(masks);
    }
    if let Some(masks) = &glottis {
        input = input.with_glottis_masks(masks);
    }

    let result = Repairer::with_config(config).repair(&input)?;
    tracing::info!("Stats: {}", serde_json::to_string(&result.stats)?);

    project::write_points_json(&args.out, &result.tracks)?;
    tracing::info!("Repaired points written to {}", args.out.display());

    if let Some(path) = &args.out_labels {
        project::write_run_labels_json(path, &result.tracks, &result.labels)?;
        tracing::info!("Run labels written to {}", path.display());
    }

    Ok(())
}
