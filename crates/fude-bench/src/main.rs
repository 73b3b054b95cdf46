//! fude-bench: CLI tool for stroke style experimentation and diagnostics.
//!
//! Builds a glyph from KAGE-style stroke records with configurable style
//! parameters, printing per-phase diagnostics. Useful for:
//!
//! - Comparing curve offset strategies (`sampled` vs `control-polygon`)
//! - Tuning width, turn size, fitting tolerance and sample count
//! - Measuring phase durations and curve counts
//! - Inspecting the generated drawing sequences or SVG
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin fude-bench -- [OPTIONS] <STROKES>...
//! ```
//!
//! Each stroke is a colon-separated numeric record (`1:0:0:20:32:180:32`);
//! several records may be joined with `$`. Set `RUST_LOG=fude_outline=debug`
//! to trace assembly and fusion decisions on stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use fude_outline::diagnostics::{GlyphDiagnostics, process_with_diagnostics};
use fude_outline::{CurveOffsetMethod, StrokeDescriptor, StyleConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stroke style experimentation and diagnostics for fude.
///
/// Turns stroke records into filled glyph outlines and prints per-phase
/// timing and count diagnostics.
#[derive(Parser)]
#[command(name = "fude-bench", version)]
struct Cli {
    /// Stroke records, e.g. `1:0:0:20:32:180:32`. Records may also be
    /// joined with `$` inside one argument.
    #[arg(required = true)]
    strokes: Vec<String>,

    /// Full stroke width.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_WIDTH)]
    width: f64,

    /// Hook and bend size. Defaults to `10 + width / 2`.
    #[arg(long)]
    turn_size: Option<f64>,

    /// Multiplier on the turn size for bending strokes.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_BEND_AMOUNT)]
    bend_amount: f64,

    /// Multiplier on the turn size for round bending strokes.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_ROUND_BEND_AMOUNT)]
    round_bend_amount: f64,

    /// Hook tip distance as a multiple of the turn size.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_HOOK_RATIO)]
    hook_ratio: f64,

    /// Corner terminal extension as a multiple of the width.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_CORNER_EXTENSION)]
    corner_extension: f64,

    /// Width ratio at the thin end of tapered strokes (0.0-1.0).
    #[arg(long, default_value_t = StyleConfig::DEFAULT_TAPER_RATIO)]
    taper_ratio: f64,

    /// Centerline samples per offset curve.
    #[arg(
        long,
        default_value_t = StyleConfig::DEFAULT_STEPS,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    steps: usize,

    /// Curve fitting tolerance in glyph units.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_MAX_ERROR)]
    max_error: f64,

    /// Decimal digits in printed drawing sequences.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_PRECISION)]
    precision: usize,

    /// Distance under which stroke endpoints count as shared.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_CONNECT_EPSILON)]
    connect_epsilon: f64,

    /// Cap on the bend correction factor at sharp vertices.
    #[arg(long, default_value_t = StyleConfig::DEFAULT_MITER_LIMIT)]
    miter_limit: f64,

    /// Thickening strategy for curved segments.
    #[arg(long, value_enum, default_value_t = OffsetStrategy::Sampled)]
    curve_offset: OffsetStrategy,

    /// Fixed pen nib angle in degrees (calligraphic slant).
    #[arg(long, allow_hyphen_values = true)]
    pen_angle: Option<f64>,

    /// Keep every stroke as its own outline.
    #[arg(long)]
    no_fuse: bool,

    /// Full style config as a JSON string.
    ///
    /// When provided, all other style flags are ignored. The JSON must be
    /// a valid `StyleConfig` serialization; missing fields take defaults.
    #[arg(long)]
    style_json: Option<String>,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the connected centerline skeletons instead of filled outlines
    /// to the SVG file.
    #[arg(long, requires = "svg")]
    skeleton: bool,

    /// Print each outline's drawing sequence.
    #[arg(long)]
    print_paths: bool,

    /// Number of runs for averaging.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    runs: usize,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// Curve offset strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum OffsetStrategy {
    /// Sample, offset and refit with least-squares cubics.
    Sampled,
    /// Offset the control polygon with bend correction.
    ControlPolygon,
}

/// Build a [`StyleConfig`] from CLI arguments.
///
/// If `--style-json` is provided, the JSON is parsed directly and all
/// individual style flags are ignored.
fn style_from_cli(cli: &Cli) -> Result<StyleConfig, String> {
    if let Some(ref json) = cli.style_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --style-json: {e}"));
    }

    let base = StyleConfig::for_width(cli.width);
    Ok(StyleConfig {
        turn_size: cli.turn_size.unwrap_or(base.turn_size),
        bend_amount: cli.bend_amount,
        round_bend_amount: cli.round_bend_amount,
        hook_ratio: cli.hook_ratio,
        corner_extension: cli.corner_extension,
        taper_ratio: cli.taper_ratio,
        steps: cli.steps,
        max_error: cli.max_error,
        precision: cli.precision,
        connect_epsilon: cli.connect_epsilon,
        miter_limit: cli.miter_limit,
        curve_offset: match cli.curve_offset {
            OffsetStrategy::Sampled => CurveOffsetMethod::Sampled,
            OffsetStrategy::ControlPolygon => CurveOffsetMethod::ControlPolygon,
        },
        pen_angle: cli.pen_angle,
        fuse_connected: !cli.no_fuse,
        ..base
    })
}

/// Split stroke arguments into numeric records and decode them.
fn parse_strokes(args: &[String]) -> Result<Vec<StrokeDescriptor>, String> {
    args.iter()
        .flat_map(|arg| arg.split('$'))
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .map(|record| {
            let fields = record
                .split(':')
                .map(|field| {
                    field
                        .trim()
                        .parse::<f64>()
                        .map_err(|e| format!("Bad field {field:?} in stroke {record:?}: {e}"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            StrokeDescriptor::from_fields(&fields)
                .map_err(|e| format!("Bad stroke {record:?}: {e}"))
        })
        .collect()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let style = match style_from_cli(&cli) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let strokes = match parse_strokes(&cli.strokes) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Strokes: {}", strokes.len());
    eprintln!("Style: {style:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let (result, diagnostics) = match process_with_diagnostics(&strokes, &style) {
            Ok(output) => output,
            Err(e) => {
                eprintln!("Outline error: {e}");
                return ExitCode::FAILURE;
            }
        };

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        // Paths and SVG come from the first run only.
        if run == 0 {
            if cli.print_paths {
                for (i, path) in result.paths.iter().enumerate() {
                    println!("[{i}] {}", path.to_drawing_sequence(style.precision));
                }
            }
            if let Some(ref svg_path) = cli.svg
                && let Err(msg) = write_svg(svg_path, &cli, &strokes, &style, &result.paths)
            {
                eprintln!("{msg}");
            }
        }

        all_diagnostics.push(diagnostics);

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Write the outlines (or skeletons) of the glyph to an SVG file.
fn write_svg(
    svg_path: &std::path::Path,
    cli: &Cli,
    strokes: &[StrokeDescriptor],
    style: &StyleConfig,
    outlines: &[fude_outline::Path],
) -> Result<(), String> {
    let description = cli.strokes.join("$");
    let config_json =
        serde_json::to_string(style).map_err(|e| format!("Error serializing style: {e}"))?;
    let metadata = fude_export::SvgMetadata {
        title: svg_path.file_stem().and_then(|s| s.to_str()),
        description: Some(&description),
        config_json: Some(&config_json),
    };

    let svg = if cli.skeleton {
        let skeletons = fude_outline::skeleton_paths(strokes, style)
            .map_err(|e| format!("Error building skeletons: {e}"))?;
        fude_export::to_skeleton_svg(&skeletons, style.width, &metadata)
    } else {
        fude_export::to_svg(outlines, &metadata)
    };

    std::fs::write(svg_path, &svg)
        .map_err(|e| format!("Error writing SVG to {}: {e}", svg_path.display()))?;
    info!(path = %svg_path.display(), bytes = svg.len(), "wrote svg");
    eprintln!("SVG written to {} ({} bytes)", svg_path.display(), svg.len());
    Ok(())
}

/// Function pointer type for extracting a phase duration from diagnostics.
type PhaseExtractor = fn(&GlyphDiagnostics) -> Option<std::time::Duration>;

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[GlyphDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();
    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;
    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<18} {:>12}", "Phase", "Mean (ms)");
    println!("{}", "-".repeat(32));

    let phase_extractors: &[(&str, PhaseExtractor)] = &[
        ("Assembly", |d| Some(d.assembly.duration)),
        ("Fusion", |d| d.fusion.as_ref().map(|p| p.duration)),
        ("Path Conversion", |d| Some(d.path_conversion.duration)),
    ];

    for (name, extractor) in phase_extractors {
        let phase_durations: Vec<f64> = all_diagnostics
            .iter()
            .filter_map(extractor)
            .map(|dur| dur.as_secs_f64() * 1000.0)
            .collect();
        if phase_durations.is_empty() {
            continue;
        }
        let phase_mean = phase_durations.iter().sum::<f64>() / phase_durations.len() as f64;
        println!("{name:<18} {phase_mean:>10.3}ms");
    }
}
