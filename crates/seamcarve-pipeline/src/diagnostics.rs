//! Carving diagnostics: time spent and work done in each stage.
//!
//! A carving run repeats the four stages once per removed seam. The
//! diagnostics accumulate across all passes so the report shows where
//! the run as a whole spent its time.
//!
//! Timing goes through the [`Clock`] trait so this crate stays free of
//! platform time sources; the CLI supplies a `std::time::Instant`
//! clock.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// A clock that never advances. Used when diagnostics are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClock;

impl Clock for NullClock {
    type Instant = ();

    fn now(&self) {}

    fn elapsed(&self, _since: &()) -> Duration {
        Duration::ZERO
    }
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from one carving run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarveDiagnostics {
    /// Energy estimation, summed over all passes.
    pub energy: StageDiagnostics,
    /// Cost table construction, summed over all passes.
    pub cost_table: StageDiagnostics,
    /// Seam recovery, summed over all passes.
    pub seam_recovery: StageDiagnostics,
    /// Seam removal, summed over all passes.
    pub removal: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary of the run.
    pub summary: CarveSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Energy estimation metrics.
    Energy {
        /// Pixels whose energy was computed, over all passes.
        pixels: u64,
        /// Largest energy seen in any pass.
        max_energy: u8,
    },
    /// Cost table metrics.
    CostTable {
        /// Cells filled, over all passes.
        cells: u64,
    },
    /// Seam recovery metrics.
    SeamRecovery {
        /// Number of seams recovered.
        seams: u32,
        /// Cheapest seam cost.
        min_cost: f64,
        /// Most expensive seam cost.
        max_cost: f64,
        /// Sum of all seam costs.
        total_cost: f64,
    },
    /// Seam removal metrics.
    Removal {
        /// Columns removed.
        columns: u32,
        /// Pixels copied into narrowed images, over all passes.
        pixels_copied: u64,
    },
}

/// High-level summary of a carving run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarveSummary {
    /// Source image width in pixels.
    pub source_width: u32,
    /// Image height in pixels (unchanged by carving).
    pub height: u32,
    /// Width after carving.
    pub final_width: u32,
    /// Number of seams removed.
    pub seams_removed: u32,
}

impl CarveDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Carve Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} -> {}x{} ({} seams)",
            self.summary.source_width,
            self.summary.height,
            self.summary.final_width,
            self.summary.height,
            self.summary.seams_removed,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Energy", &self.energy),
            ("Cost Table", &self.cost_table),
            ("Seam Recovery", &self.seam_recovery),
            ("Removal", &self.removal),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Energy { pixels, max_energy } => {
            format!("{pixels} px, max={max_energy}")
        }
        StageMetrics::CostTable { cells } => format!("{cells} cells"),
        StageMetrics::SeamRecovery {
            seams,
            min_cost,
            max_cost,
            total_cost,
        } => {
            format!("{seams} seams, cost min={min_cost:.1} max={max_cost:.1} sum={total_cost:.1}")
        }
        StageMetrics::Removal {
            columns,
            pixels_copied,
        } => format!("{columns} cols, {pixels_copied} px copied"),
    }
}

/// Running totals for one carving run, turned into
/// [`CarveDiagnostics`] by [`Accumulator::finish`].
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    pub energy_time: Duration,
    pub cost_time: Duration,
    pub seam_time: Duration,
    pub removal_time: Duration,
    pub pixels: u64,
    pub max_energy: u8,
    pub seams: u32,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub total_cost: f64,
    pub pixels_copied: u64,
}

impl Accumulator {
    /// Record one seam's cost.
    pub fn record_seam(&mut self, cost: f64) {
        self.seams += 1;
        self.total_cost += cost;
        self.min_cost = Some(self.min_cost.map_or(cost, |m| m.min(cost)));
        self.max_cost = Some(self.max_cost.map_or(cost, |m| m.max(cost)));
    }

    pub fn finish(
        self,
        total_duration: Duration,
        source_width: u32,
        height: u32,
        final_width: u32,
    ) -> CarveDiagnostics {
        CarveDiagnostics {
            energy: StageDiagnostics {
                duration: self.energy_time,
                metrics: StageMetrics::Energy {
                    pixels: self.pixels,
                    max_energy: self.max_energy,
                },
            },
            cost_table: StageDiagnostics {
                duration: self.cost_time,
                metrics: StageMetrics::CostTable { cells: self.pixels },
            },
            seam_recovery: StageDiagnostics {
                duration: self.seam_time,
                metrics: StageMetrics::SeamRecovery {
                    seams: self.seams,
                    min_cost: self.min_cost.unwrap_or(0.0),
                    max_cost: self.max_cost.unwrap_or(0.0),
                    total_cost: self.total_cost,
                },
            },
            removal: StageDiagnostics {
                duration: self.removal_time,
                metrics: StageMetrics::Removal {
                    columns: self.seams,
                    pixels_copied: self.pixels_copied,
                },
            },
            total_duration,
            summary: CarveSummary {
                source_width,
                height,
                final_width,
                seams_removed: self.seams,
            },
        }
    }
}
