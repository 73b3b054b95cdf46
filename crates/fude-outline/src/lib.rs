//! fude-outline: Pure stroke-to-outline geometry (sans-IO).
//!
//! Turns the centerline strokes of an ideographic glyph into closed,
//! filled outlines made of line, quadratic and cubic Bezier curves:
//! stroke descriptor -> centerline skeleton -> offset boundaries ->
//! assembled outline -> joint fusion -> closed paths.
//!
//! This crate has **no I/O dependencies**. It operates on numeric stroke
//! records and returns structured geometry; parsing stroke text and
//! writing SVG live in the CLI and in `fude-export`.

pub mod assemble;
pub mod curve;
pub mod diagnostics;
pub mod fit;
pub mod frame;
pub mod fusion;
pub mod offset;
pub mod path;
pub mod stroke;
pub mod types;

pub use assemble::{StrokeOutline, assemble, merge_paths};
pub use curve::Curve;
pub use frame::LocalFrame;
pub use fusion::{Junction, close_ring, fuse, fuse_connected};
pub use offset::{OffsetMode, OffsetOptions, offset_curve};
pub use path::Path;
pub use stroke::{EndJoint, Skeleton, StartJoint, StrokeDescriptor, StrokeKind};
pub use types::{
    AnchorKind, BoundaryPath, BoundaryPoint, CurveOffsetMethod, GlyphResult, OutlineError, Point,
    StyleConfig, Vector,
};

use tracing::debug;

/// Generate the filled outlines of a glyph.
///
/// # Steps
///
/// 1. Validate the style configuration
/// 2. Assemble one outline per stroke (skeleton, thickening, hooks)
/// 3. Fuse outlines whose unshaped ends share a point (when
///    [`StyleConfig::fuse_connected`] is set)
/// 4. Merge each outline into a closed [`Path`]
///
/// Every returned path is closed and winds counter-clockwise in a y-up
/// frame.
///
/// # Errors
///
/// Returns [`OutlineError::InvalidConfig`] for an unusable style, and
/// propagates stroke, offset and merge errors from the individual steps.
pub fn process(
    strokes: &[StrokeDescriptor],
    style: &StyleConfig,
) -> Result<GlyphResult, OutlineError> {
    diagnostics::process_with_diagnostics(strokes, style).map(|(result, _)| result)
}

/// Centerline skeletons of a glyph, with strokes that share an endpoint
/// joined into one path.
///
/// Hooks are included. Intended for rendering with a stroked pen rather
/// than a fill.
///
/// # Errors
///
/// Returns [`OutlineError::InvalidConfig`] for an unusable style, and
/// propagates skeleton errors.
pub fn skeleton_paths(
    strokes: &[StrokeDescriptor],
    style: &StyleConfig,
) -> Result<Vec<Path>, OutlineError> {
    style.validate()?;
    let mut paths = strokes
        .iter()
        .map(|stroke| stroke.skeleton(style).map(|skeleton| skeleton.to_path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|path| !path.is_empty());

    let epsilon = style.connect_epsilon;
    let mut i = 0;
    while i < paths.len() {
        let mut j = i + 1;
        while j < paths.len() {
            if paths[i].connected(&paths[j], epsilon) {
                let other = paths.remove(j);
                paths[i] = paths[i].connect(&other, epsilon)?;
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    debug!(strokes = strokes.len(), paths = paths.len(), "connected skeletons");
    Ok(paths)
}
