use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roi_model::{Point2D, RegionOfInterest, Side};
use roi_session::{
    apply_navigation, is_valid_point, side_file_name, AnnotationSession, ClassificationMode,
    NavigationAction, ScanCursor, SCAN_FILE_EXTENSION,
};
use roi_storage::{load_roi, load_session, roi_sidecar_path, save_roi, save_session, Preferences, Storage};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "ruler-cli")]
#[command(about = "Inspect and edit per-side ROI files for profile scans")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write an empty ROI document.
    Init {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print a machine-readable summary of an ROI document.
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Classify scan points against one side's ROI.
    Classify {
        #[arg(value_name = "ROI")]
        roi: PathBuf,
        #[arg(long)]
        side: Side,
        /// JSON array of {"x", "y"} points.
        #[arg(long, value_name = "FILE")]
        points: PathBuf,
        /// Count points inside a support rectangle as inside.
        #[arg(long)]
        with_support: bool,
    },
    /// Add a vertex to one side's polygon.
    AddPoint {
        #[arg(value_name = "ROI")]
        roi: PathBuf,
        #[arg(long)]
        side: Side,
        #[arg(long, allow_negative_numbers = true, value_parser = parse_coordinate)]
        x: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = parse_coordinate)]
        y: f64,
    },
    /// Move a vertex, addressed by its position in the side's canonical order.
    MovePoint {
        #[arg(value_name = "ROI")]
        roi: PathBuf,
        #[arg(long)]
        side: Side,
        #[arg(long)]
        index: usize,
        #[arg(long, allow_negative_numbers = true, value_parser = parse_coordinate)]
        x: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = parse_coordinate)]
        y: f64,
    },
    /// Resolve scan and ROI file names for a file/line position.
    Locate {
        /// Scan directory; defaults to the configured one.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        file: u32,
        #[arg(long, default_value_t = 0)]
        line: u32,
        /// Store the directory as the configured scan directory.
        #[arg(long)]
        remember: bool,
    },
    /// Print the effective preferences.
    Prefs,
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct SideSummary {
    polygon_vertices: usize,
    support_rects: usize,
    closed: bool,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    left: SideSummary,
    top: SideSummary,
    right: SideSummary,
}

#[derive(Debug, Serialize)]
struct SidePolygonOutput<'a> {
    side: Side,
    polygon: &'a [Point2D],
}

#[derive(Debug, Serialize)]
struct SideFilesOutput {
    left: String,
    top: String,
    right: String,
}

#[derive(Debug, Serialize)]
struct LocateOutput {
    status: String,
    file_index: u32,
    line_index: u32,
    files: SideFilesOutput,
    roi: String,
}

#[derive(Debug, Serialize)]
struct PrefsOutput<'a> {
    root: String,
    preferences: &'a Preferences,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Init { file, force } => run_init(&file, force),
        Commands::Info { file } => run_info(&file),
        Commands::Classify { roi, side, points, with_support } => {
            run_classify(&roi, side, &points, with_support)
        }
        Commands::AddPoint { roi, side, x, y } => run_add_point(&roi, side, Point2D::new(x, y)),
        Commands::MovePoint { roi, side, index, x, y } => {
            run_move_point(&roi, side, index, Point2D::new(x, y))
        }
        Commands::Locate { dir, file, line, remember } => run_locate(dir, file, line, remember),
        Commands::Prefs => run_prefs(),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_init(file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        anyhow::bail!("file already exists: {} (use --force to overwrite)", file.display());
    }

    save_roi(file, &RegionOfInterest::new())
        .with_context(|| format!("failed to write ROI to {}", file.display()))?;
    println!("{}", file.display());

    Ok(())
}

fn run_info(file: &Path) -> Result<()> {
    ensure_file_exists(file)?;

    let roi = load_roi(file).with_context(|| format!("failed to load ROI from {}", file.display()))?;
    let summary = |side: Side| {
        let region = roi.side(side);
        SideSummary {
            polygon_vertices: region.polygon.len(),
            support_rects: region.support.len(),
            closed: region.polygon.is_closed_ring(),
        }
    };

    let payload =
        InfoOutput { left: summary(Side::Left), top: summary(Side::Top), right: summary(Side::Right) };
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

fn run_classify(roi: &Path, side: Side, points: &Path, with_support: bool) -> Result<()> {
    let session = open_session(roi)?;

    let text = fs::read_to_string(points)
        .with_context(|| format!("failed to read points from {}", points.display()))?;
    let points: Vec<Point2D> = serde_json::from_str(&text)
        .context("points file must be a JSON array of {\"x\", \"y\"} objects")?;

    let total = points.len();
    let valid: Vec<Point2D> = points.into_iter().filter(|&point| is_valid_point(point)).collect();
    if valid.len() < total {
        log::info!("dropped {} non-positive point(s)", total - valid.len());
    }

    let mode = if with_support {
        ClassificationMode::PolygonOrSupport
    } else {
        load_preferences()?.classification
    };

    let classified = session.classify_scan_points_with(side, &valid, mode);
    println!("{}", serde_json::to_string_pretty(&classified)?);

    Ok(())
}

fn run_add_point(roi: &Path, side: Side, position: Point2D) -> Result<()> {
    let mut session = open_session(roi)?;

    session.arm_add();
    session.place_point(side, position).context("point placement was not armed")?;

    save_session(roi, &session)
        .with_context(|| format!("failed to save ROI to {}", roi.display()))?;
    print_side_polygon(&session, side)
}

fn run_move_point(roi: &Path, side: Side, index: usize, position: Point2D) -> Result<()> {
    let mut session = open_session(roi)?;

    let point = session
        .point_at(side, index)
        .with_context(|| format!("no vertex {index} on side {side}"))?;
    session.move_point(side, point.id, position)?;

    save_session(roi, &session)
        .with_context(|| format!("failed to save ROI to {}", roi.display()))?;
    print_side_polygon(&session, side)
}

fn run_locate(dir: Option<PathBuf>, file: u32, line: u32, remember: bool) -> Result<()> {
    let storage = storage()?;
    let mut preferences = storage.load_preferences().context("failed to read preferences")?;

    let directory = dir
        .or_else(|| preferences.scan_directory.clone())
        .context("no scan directory given and none configured")?;

    let layout = preferences.layout;
    let mut cursor = ScanCursor::default();
    apply_navigation(&mut cursor, layout, NavigationAction::OpenDirectory { path: directory.clone() });
    apply_navigation(&mut cursor, layout, NavigationAction::SetFile { index: file });
    apply_navigation(&mut cursor, layout, NavigationAction::SetLine { index: line });

    let base = cursor.base_name().context("scan directory is not set")?;
    let side_file =
        |side: Side| side_file_name(&base, side, SCAN_FILE_EXTENSION).display().to_string();

    let payload = LocateOutput {
        status: cursor.status_message(),
        file_index: cursor.file_index,
        line_index: cursor.line_index,
        files: SideFilesOutput {
            left: side_file(Side::Left),
            top: side_file(Side::Top),
            right: side_file(Side::Right),
        },
        roi: roi_sidecar_path(&base).display().to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);

    if remember {
        preferences.scan_directory = Some(directory);
        storage.save_preferences(&preferences).context("failed to save preferences")?;
    }

    Ok(())
}

fn run_prefs() -> Result<()> {
    let storage = storage()?;
    let preferences = storage.load_preferences().context("failed to read preferences")?;

    let payload = PrefsOutput { root: storage.root().display().to_string(), preferences: &preferences };
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

fn storage() -> Result<Storage> {
    if let Some(root) = std::env::var_os("RULER_DATA_DIR") {
        return Ok(Storage::with_root(root));
    }

    Storage::from_default_project().context("failed to resolve preferences directory")
}

fn load_preferences() -> Result<Preferences> {
    storage()?.load_preferences().context("failed to read preferences")
}

fn open_session(path: &Path) -> Result<AnnotationSession> {
    ensure_file_exists(path)?;

    let mut session = AnnotationSession::new();
    load_session(path, &mut session)
        .with_context(|| format!("failed to load ROI from {}", path.display()))?;

    Ok(session)
}

fn print_side_polygon(session: &AnnotationSession, side: Side) -> Result<()> {
    let payload = SidePolygonOutput { side, polygon: session.polygon(side).vertices() };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn parse_coordinate(value: &str) -> Result<f64, String> {
    let parsed: f64 = value.parse().map_err(|error| format!("{error}"))?;
    if !parsed.is_finite() {
        return Err(format!("coordinate must be a finite number, got {value}"));
    }

    Ok(parsed)
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
