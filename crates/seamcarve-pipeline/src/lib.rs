//! seamcarve-pipeline: content-aware image narrowing (sans-IO).
//!
//! Narrows an image one column at a time by deleting the connected
//! top-to-bottom path of pixels whose removal disturbs the least
//! visual content. Each pass runs:
//!
//! energy estimation -> cost table -> seam recovery -> seam removal.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! images and byte slices. File handling lives in the `seamcarve` CLI.
//!
//! The `parallel` feature spreads energy rows and cost-table columns
//! over rayon's thread pool. Output is identical to the serial build;
//! `cargo test --features parallel` checks this.

pub mod cost;
pub mod decode;
pub mod diagnostics;
pub mod energy;
pub mod grid;
pub mod pipeline;
pub mod remove;
pub mod seam;
pub mod types;

pub use cost::CostTable;
pub use decode::decode_rgb;
pub use diagnostics::{CarveDiagnostics, Clock};
pub use energy::EnergyMap;
pub use grid::Grid;
pub use pipeline::CarveStep;
pub use seam::Seam;
pub use types::{BufferKind, CarveConfig, CarveError, CarveResult, Dimensions, GrayImage, RgbImage};

use diagnostics::{Accumulator, NullClock};

/// Carve `image` down to `config.target_width` columns.
///
/// Returns the input unchanged (zero seams removed) when it is already
/// at the target width.
///
/// # Errors
///
/// Returns [`CarveError::InvalidConfig`] if `target_width` is zero,
/// [`CarveError::EmptyImage`] if the image has no pixels,
/// [`CarveError::Upscale`] if the target is wider than the image, and
/// [`CarveError::Allocation`] if any intermediate buffer, or the
/// working copy of `image`, cannot be allocated.
pub fn carve_to_width(image: &RgbImage, config: &CarveConfig) -> Result<CarveResult, CarveError> {
    carve_to_width_with_diagnostics(image, config, &NullClock).map(|(result, _)| result)
}

/// Like [`carve_to_width`], also timing each stage with `clock`.
///
/// # Errors
///
/// Same as [`carve_to_width`].
pub fn carve_to_width_with_diagnostics<C: Clock>(
    image: &RgbImage,
    config: &CarveConfig,
    clock: &C,
) -> Result<(CarveResult, CarveDiagnostics), CarveError> {
    let run_start = clock.now();
    let source = Dimensions::of(image);
    let target = config.target_width;

    if target == 0 {
        return Err(CarveError::InvalidConfig(
            "target_width must be at least 1".to_string(),
        ));
    }
    if source.width == 0 || source.height == 0 {
        return Err(CarveError::EmptyImage);
    }
    if target > source.width {
        return Err(CarveError::Upscale {
            width: source.width,
            target,
        });
    }

    tracing::info!(%source, target, "carving");

    let mut acc = Accumulator::default();
    let mut current = remove::try_clone_image(image)?;

    while current.width() > target {
        let width = current.width();
        let pixels = Dimensions::of(&current).pixel_count();

        let t = clock.now();
        let energized = CarveStep::new(current).estimate_energy()?;
        acc.energy_time += clock.elapsed(&t);
        acc.pixels += pixels;
        acc.max_energy = acc.max_energy.max(energized.energy().max());

        let t = clock.now();
        let built = energized.build_cost_table()?;
        acc.cost_time += clock.elapsed(&t);

        let t = clock.now();
        let recovered = built.recover_seam()?;
        acc.seam_time += clock.elapsed(&t);
        let seam_cost = recovered.seam_cost();

        let t = clock.now();
        let carved = recovered.remove_seam()?;
        acc.removal_time += clock.elapsed(&t);
        acc.pixels_copied += carved.dimensions().pixel_count();

        tracing::debug!(width, seam_cost, "removed seam");
        acc.record_seam(seam_cost);
        current = carved.into_image();
    }

    let total_seam_cost = acc.total_cost;
    let seams_removed = acc.seams;
    let diagnostics = acc.finish(
        clock.elapsed(&run_start),
        source.width,
        source.height,
        current.width(),
    );

    tracing::info!(
        seams_removed,
        total_seam_cost,
        final_width = current.width(),
        "carving finished"
    );

    Ok((
        CarveResult {
            image: current,
            source,
            seams_removed,
            total_seam_cost,
        },
        diagnostics,
    ))
}
