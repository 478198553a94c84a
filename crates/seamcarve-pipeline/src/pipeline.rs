//! One carving pass, advanced stage by stage.
//!
//! [`carve_to_width`](crate::carve_to_width) runs whole passes in a
//! loop. [`CarveStep`] instead lets the caller drive a single pass and
//! inspect each intermediate before continuing:
//!
//! ```rust
//! # use seamcarve_pipeline::{CarveError, CarveStep, RgbImage};
//! # fn run(image: RgbImage) -> Result<(), CarveError> {
//! let energized = CarveStep::new(image).estimate_energy()?;
//! let gray = energized.energy().to_gray_image();
//! let recovered = energized.build_cost_table()?.recover_seam()?;
//! let seam = recovered.seam().clone();
//! let narrower = recovered.remove_seam()?.into_image();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state,
//! carrying the source image along, so stages cannot be skipped or run
//! out of order. The energy map is dropped once the cost table exists
//! and the cost table once the seam is recovered.

use crate::cost::{self, CostTable};
use crate::energy::{self, EnergyMap};
use crate::remove;
use crate::seam::{self, Seam};
use crate::types::{CarveError, Dimensions, RgbImage};

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// A carving pass before any processing has occurred.
#[must_use = "carving stages are consumed by advancing; call .estimate_energy() to continue"]
pub struct Pending {
    image: RgbImage,
}

impl Pending {
    /// The image this pass will narrow.
    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Compute the energy map and advance to [`EnergyEstimated`].
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::EmptyImage`] for an image without pixels
    /// and [`CarveError::Allocation`] if the map cannot be allocated.
    pub fn estimate_energy(self) -> Result<EnergyEstimated, CarveError> {
        let energy = energy::estimate(&self.image)?;
        Ok(EnergyEstimated {
            image: self.image,
            energy,
        })
    }
}

// ───────────────────────── Stage 1: Energy ───────────────────────────

/// A carving pass after energy estimation.
#[must_use = "carving stages are consumed by advancing; call .build_cost_table() to continue"]
pub struct EnergyEstimated {
    image: RgbImage,
    energy: EnergyMap,
}

impl EnergyEstimated {
    /// The per-pixel energy map.
    #[must_use]
    pub const fn energy(&self) -> &EnergyMap {
        &self.energy
    }

    /// Build the cost table and advance to [`CostBuilt`].
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::Allocation`] if the table cannot be
    /// allocated.
    pub fn build_cost_table(self) -> Result<CostBuilt, CarveError> {
        let cost = cost::build(&self.energy)?;
        Ok(CostBuilt {
            image: self.image,
            cost,
        })
    }
}

// ───────────────────────── Stage 2: Cost table ───────────────────────

/// A carving pass after the cost table is built.
#[must_use = "carving stages are consumed by advancing; call .recover_seam() to continue"]
pub struct CostBuilt {
    image: RgbImage,
    cost: CostTable,
}

impl CostBuilt {
    /// The cumulative cost table.
    #[must_use]
    pub const fn cost_table(&self) -> &CostTable {
        &self.cost
    }

    /// Recover the cheapest seam and advance to [`SeamRecovered`].
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::Allocation`] if the seam cannot be
    /// allocated.
    pub fn recover_seam(self) -> Result<SeamRecovered, CarveError> {
        let seam = seam::recover(&self.cost)?;
        let seam_cost = seam.cost(&self.cost).unwrap_or_default();
        Ok(SeamRecovered {
            image: self.image,
            seam,
            seam_cost,
        })
    }
}

// ───────────────────────── Stage 3: Seam ─────────────────────────────

/// A carving pass after seam recovery.
#[must_use = "carving stages are consumed by advancing; call .remove_seam() to continue"]
pub struct SeamRecovered {
    image: RgbImage,
    seam: Seam,
    seam_cost: f64,
}

impl SeamRecovered {
    /// The seam that will be removed.
    #[must_use]
    pub const fn seam(&self) -> &Seam {
        &self.seam
    }

    /// Cumulative cost of the seam.
    #[must_use]
    pub const fn seam_cost(&self) -> f64 {
        self.seam_cost
    }

    /// The image the seam runs through.
    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Stop before removal, returning the image and its seam.
    #[must_use]
    pub fn into_parts(self) -> (RgbImage, Seam) {
        (self.image, self.seam)
    }

    /// Delete the seam and advance to [`Carved`].
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::TooNarrow`] for a single-column image and
    /// [`CarveError::Allocation`] if the output cannot be allocated.
    pub fn remove_seam(self) -> Result<Carved, CarveError> {
        let image = remove::remove_seam(&self.image, &self.seam)?;
        Ok(Carved {
            image,
            seam: self.seam,
            seam_cost: self.seam_cost,
        })
    }
}

// ───────────────────────── Stage 4: Carved ───────────────────────────

/// A finished carving pass.
#[must_use = "call .into_image() to extract the narrowed image"]
pub struct Carved {
    image: RgbImage,
    seam: Seam,
    seam_cost: f64,
}

impl Carved {
    /// The narrowed image.
    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// The seam that was removed.
    #[must_use]
    pub const fn seam(&self) -> &Seam {
        &self.seam
    }

    /// Cumulative cost of the removed seam.
    #[must_use]
    pub const fn seam_cost(&self) -> f64 {
        self.seam_cost
    }

    /// Dimensions of the narrowed image.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }

    /// Consume the pass and return the narrowed image.
    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Entry point for the typed carving-pass API.
pub struct CarveStep;

impl CarveStep {
    /// Start a carving pass over `image`.
    ///
    /// No processing is performed until
    /// [`.estimate_energy()`](Pending::estimate_energy) is called.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(image: RgbImage) -> Pending {
        Pending { image }
    }

    /// Run a whole pass, returning the narrowed image and removed seam.
    ///
    /// # Errors
    ///
    /// Returns any error from the individual stages.
    pub fn run(image: RgbImage) -> Result<Carved, CarveError> {
        Self::new(image)
            .estimate_energy()?
            .build_cost_table()?
            .recover_seam()?
            .remove_seam()
    }
}
