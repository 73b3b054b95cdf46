//! Glyph processing diagnostics: per-phase timing and counts.
//!
//! [`process_with_diagnostics`] runs the same phases as
//! [`process`](crate::process) and records how long each took and how
//! much geometry it produced. Timestamps come from the `web-time` crate,
//! so the same code measures on native targets and in the browser.
//!
//! Durations are serialized as fractional seconds (`f64`), since
//! `std::time::Duration` does not implement serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Instant;

use crate::assemble::{StrokeOutline, assemble};
use crate::fusion::fuse_connected;
use crate::path::Path;
use crate::stroke::StrokeDescriptor;
use crate::types::{GlyphResult, OutlineError, StyleConfig};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|_| serde::de::Error::custom("duration must be finite and non-negative"))
    }
}

/// Diagnostics collected from processing one glyph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyphDiagnostics {
    /// Phase 1: per-stroke outline assembly.
    pub assembly: PhaseDiagnostics,
    /// Phase 2: joint fusion (`None` when fusion is disabled).
    pub fusion: Option<PhaseDiagnostics>,
    /// Conversion of the final outlines into closed paths.
    pub path_conversion: PhaseDiagnostics,
    /// Wall-clock duration of the whole run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    pub summary: GlyphSummary,
}

/// Timing and counts for one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDiagnostics {
    /// Wall-clock duration of this phase (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    pub metrics: PhaseMetrics,
}

/// Phase-specific counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseMetrics {
    Assembly {
        /// Strokes assembled.
        stroke_count: usize,
        /// Boundary points across all sub-paths of all outlines.
        boundary_point_count: usize,
        /// Outlines with a shaped tail (hooks).
        tail_count: usize,
    },
    Fusion {
        outlines_before: usize,
        outlines_after: usize,
        fusion_count: usize,
    },
    PathConversion {
        path_count: usize,
        curve_count: usize,
        point_count: usize,
    },
}

/// Summary counts for the whole glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphSummary {
    pub stroke_count: usize,
    /// Outlines left after fusion.
    pub outline_count: usize,
    pub fusion_count: usize,
    /// Curves across all output paths.
    pub curve_count: usize,
    /// Control points across all output paths.
    pub point_count: usize,
}

impl GlyphDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Glyph Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Strokes: {}  |  Outlines: {}  |  Fusions: {}",
            self.summary.stroke_count, self.summary.outline_count, self.summary.fusion_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration)
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<18} {:>10} {:>10}  {}",
            "Phase", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        let mut phases = vec![("Assembly", &self.assembly)];
        if let Some(ref fusion) = self.fusion {
            phases.push(("Fusion", fusion));
        }
        phases.push(("Path Conversion", &self.path_conversion));

        for (name, phase) in phases {
            let ms = duration_ms(phase.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&phase.metrics);
            lines.push(format!("{name:<18} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Curves: {}  |  Points: {}",
            self.summary.curve_count, self.summary.point_count,
        ));
        lines.join("\n")
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn format_metrics(metrics: &PhaseMetrics) -> String {
    match metrics {
        PhaseMetrics::Assembly {
            stroke_count,
            boundary_point_count,
            tail_count,
        } => format!(
            "{stroke_count} strokes, {boundary_point_count} boundary pts, {tail_count} tails"
        ),
        PhaseMetrics::Fusion {
            outlines_before,
            outlines_after,
            fusion_count,
        } => format!("{outlines_before}->{outlines_after} outlines ({fusion_count} fused)"),
        PhaseMetrics::PathConversion {
            path_count,
            curve_count,
            point_count,
        } => format!("{path_count} paths, {curve_count} curves, {point_count} pts"),
    }
}

fn boundary_points(outline: &StrokeOutline) -> usize {
    outline.head.len() + outline.body_left.len() + outline.tail.len() + outline.body_right.len()
}

/// Run glyph processing and collect per-phase diagnostics.
///
/// # Errors
///
/// Same as [`process`](crate::process).
pub fn process_with_diagnostics(
    strokes: &[StrokeDescriptor],
    style: &StyleConfig,
) -> Result<(GlyphResult, GlyphDiagnostics), OutlineError> {
    style.validate()?;
    let total_start = Instant::now();

    let start = Instant::now();
    let outlines = strokes
        .iter()
        .map(|stroke| assemble(stroke, style))
        .collect::<Result<Vec<_>, _>>()?;
    let assembly = PhaseDiagnostics {
        duration: start.elapsed(),
        metrics: PhaseMetrics::Assembly {
            stroke_count: strokes.len(),
            boundary_point_count: outlines.iter().map(boundary_points).sum(),
            tail_count: outlines.iter().filter(|o| !o.tail.is_empty()).count(),
        },
    };

    let (outlines, fusion, fusion_count) = if style.fuse_connected {
        let start = Instant::now();
        let outlines_before = outlines.len();
        let (outlines, fusion_count) =
            fuse_connected(outlines, style.connect_epsilon, style.miter_reach())?;
        let phase = PhaseDiagnostics {
            duration: start.elapsed(),
            metrics: PhaseMetrics::Fusion {
                outlines_before,
                outlines_after: outlines.len(),
                fusion_count,
            },
        };
        (outlines, Some(phase), fusion_count)
    } else {
        (outlines, None, 0)
    };

    let start = Instant::now();
    let paths = outlines
        .iter()
        .map(StrokeOutline::to_path)
        .collect::<Result<Vec<_>, _>>()?;
    let curve_count = paths.iter().map(Path::len).sum();
    let point_count = paths.iter().map(Path::point_count).sum();
    let path_conversion = PhaseDiagnostics {
        duration: start.elapsed(),
        metrics: PhaseMetrics::PathConversion {
            path_count: paths.len(),
            curve_count,
            point_count,
        },
    };

    let summary = GlyphSummary {
        stroke_count: strokes.len(),
        outline_count: outlines.len(),
        fusion_count,
        curve_count,
        point_count,
    };
    debug!(?summary, "processed glyph");

    let diagnostics = GlyphDiagnostics {
        assembly,
        fusion,
        path_conversion,
        total_duration: total_start.elapsed(),
        summary,
    };
    Ok((GlyphResult { outlines, paths }, diagnostics))
}
