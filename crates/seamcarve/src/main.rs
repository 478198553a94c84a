//! seamcarve: narrow an image file to a target width by seam carving.
//!
//! Decodes the input image, removes the cheapest vertical seam until the
//! requested width is reached, writes the result, and prints per-stage
//! diagnostics. Optionally writes the input's energy map and its first
//! seam as separate images for inspection.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin seamcarve -- <INPUT> --width <N> [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use image::Rgb;
use seamcarve_pipeline::{CarveConfig, CarveError, CarveStep, Clock, RgbImage, remove};
use tracing_subscriber::EnvFilter;

/// Colour used to draw the seam in `--seam-out` images.
const SEAM_COLOUR: Rgb<u8> = Rgb([255, 0, 0]);

/// Content-aware image narrowing.
///
/// Repeatedly removes the connected top-to-bottom path of pixels with the
/// least visual energy until the image is `--width` pixels wide.
#[derive(Parser)]
#[command(name = "seamcarve", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Target width in pixels.
    #[arg(
        long,
        required_unless_present = "config_json",
        value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..)
    )]
    width: Option<u32>,

    /// Where to write the carved image; the format follows the extension.
    ///
    /// Defaults to `<input stem>-carved.png` next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the input's energy map as a grayscale image.
    #[arg(long)]
    energy_out: Option<PathBuf>,

    /// Write the input with its first seam painted red.
    #[arg(long)]
    seam_out: Option<PathBuf>,

    /// Full carve config as a JSON string.
    ///
    /// When provided, `--width` is ignored. The JSON must be a valid
    /// `CarveConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Log each removed seam to stderr.
    #[arg(short, long)]
    verbose: bool,
}

/// Build a [`CarveConfig`] from CLI arguments.
///
/// `--config-json` wins over `--width` when both are given.
fn config_from_cli(cli: &Cli) -> Result<CarveConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }
    cli.width
        .map(CarveConfig::new)
        .ok_or_else(|| "Either --width or --config-json is required".to_string())
}

/// `<dir>/<stem>-carved.png` for an input at `<dir>/<stem>.<ext>`.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}-carved.png"))
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "seamcarve=debug,seamcarve_pipeline=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli)?;

    let image_bytes = std::fs::read(&cli.input)
        .map_err(|e| format!("Error reading {}: {e}", cli.input.display()))?;
    eprintln!(
        "Image: {} ({} bytes)",
        cli.input.display(),
        image_bytes.len(),
    );

    let image = seamcarve_pipeline::decode_rgb(&image_bytes)
        .map_err(|e| format!("Error decoding {}: {e}", cli.input.display()))?;

    if let Some(ref path) = cli.energy_out {
        let energy = seamcarve_pipeline::energy::estimate(&image)
            .map_err(|e| format!("Energy error: {e}"))?;
        let gray = energy.to_gray_image();
        gray.save(path)
            .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
        eprintln!("Energy map written to {}", path.display());
    }

    if let Some(ref path) = cli.seam_out {
        let painted = paint_first_seam(&image).map_err(|e| format!("Seam error: {e}"))?;
        painted
            .save(path)
            .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
        eprintln!("Seam overlay written to {}", path.display());
    }

    let (result, diagnostics) =
        seamcarve_pipeline::carve_to_width_with_diagnostics(&image, &config, &StdClock)
            .map_err(|e| format!("Carve error: {e}"))?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));
    result
        .image
        .save(&output)
        .map_err(|e| format!("Error writing {}: {e}", output.display()))?;
    eprintln!("Output written to {} ({})", output.display(), result.dimensions());

    if cli.json {
        let json = serde_json::to_string_pretty(&diagnostics)
            .map_err(|e| format!("Error serializing diagnostics: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", diagnostics.report());
    }

    Ok(())
}

/// Copy of `image` with the seam the first carving pass would remove
/// drawn in [`SEAM_COLOUR`].
fn paint_first_seam(image: &RgbImage) -> Result<RgbImage, CarveError> {
    let (mut painted, seam) = CarveStep::new(remove::try_clone_image(image)?)
        .estimate_energy()?
        .build_cost_table()?
        .recover_seam()?
        .into_parts();
    seam.paint(&mut painted, SEAM_COLOUR)?;
    Ok(painted)
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
