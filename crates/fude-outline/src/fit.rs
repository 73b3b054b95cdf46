//! Least-squares piecewise cubic fitting.
//!
//! Fits a run of cubic Beziers through ordered sample points using
//! Philip J. Schneider's algorithm ("An Algorithm for Automatically
//! Fitting Digitized Curves", Graphics Gems, 1990):
//!
//! 1. Parameterize the samples by cumulative chord length.
//! 2. Solve for the two handle lengths along fixed end tangents that
//!    minimize squared distance to the samples.
//! 3. If the worst sample is close, refine the parameters with a few
//!    Newton-Raphson steps and solve again.
//! 4. Otherwise split at the worst sample and fit both halves, sharing a
//!    tangent at the split so the result stays smooth.
//!
//! Output endpoints are always the exact first and last samples.

use tracing::trace;

use crate::curve::Curve;
use crate::path::Path;
use crate::types::{OutlineError, Point, Vector};

/// Newton-Raphson refinement passes per fit attempt.
const MAX_ITERATIONS: usize = 4;

/// Handle lengths below `seg_len * ALPHA_EPSILON` are replaced by the
/// Wu/Barsky heuristic (one third of the chord).
const ALPHA_EPSILON: f64 = 1e-6;

/// Fit cubic segments through `points` within `max_error`.
///
/// Consecutive duplicate points are dropped first. End tangents come from
/// the first two and last two remaining points.
///
/// # Errors
///
/// Returns [`OutlineError::TooFewPoints`] for fewer than two points and
/// [`OutlineError::DegenerateVector`] if every point coincides.
pub fn fit_curve(points: &[Point], max_error: f64) -> Result<Path, OutlineError> {
    if points.len() < 2 {
        return Err(OutlineError::TooFewPoints(points.len()));
    }
    let samples = dedup(points);
    let n = samples.len();
    if n < 2 {
        return Err(OutlineError::DegenerateVector);
    }
    let left = (samples[1] - samples[0]).normalize()?;
    let right = (samples[n - 2] - samples[n - 1]).normalize()?;
    fit_deduped(&samples, left, right, max_error)
}

/// Fit with caller-supplied unit end tangents.
///
/// `left` points from the first sample into the curve; `right` points
/// from the last sample back into the curve.
///
/// # Errors
///
/// Same as [`fit_curve`].
pub fn fit_curve_with_tangents(
    points: &[Point],
    left: Vector,
    right: Vector,
    max_error: f64,
) -> Result<Path, OutlineError> {
    if points.len() < 2 {
        return Err(OutlineError::TooFewPoints(points.len()));
    }
    let samples = dedup(points);
    if samples.len() < 2 {
        return Err(OutlineError::DegenerateVector);
    }
    fit_deduped(&samples, left.normalize()?, right.normalize()?, max_error)
}

#[allow(clippy::float_cmp)]
fn dedup(points: &[Point]) -> Vec<Point> {
    let mut samples: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if samples.last().is_none_or(|last| last.x != p.x || last.y != p.y) {
            samples.push(p);
        }
    }
    samples
}

fn fit_deduped(
    samples: &[Point],
    left: Vector,
    right: Vector,
    max_error: f64,
) -> Result<Path, OutlineError> {
    let mut curves = Vec::new();
    fit_cubic(samples, left, right, max_error * max_error, &mut curves)?;
    Ok(Path::new(curves))
}

type Ctrl = [Point; 4];

fn fit_cubic(
    points: &[Point],
    left: Vector,
    right: Vector,
    tolerance_sq: f64,
    out: &mut Vec<Curve>,
) -> Result<(), OutlineError> {
    let first = points[0];
    let last = points[points.len() - 1];

    if points.len() == 2 {
        let dist = first.distance(last) / 3.0;
        out.push(Curve::Cubic([
            first,
            first + left * dist,
            last + right * dist,
            last,
        ]));
        return Ok(());
    }

    let mut u = chord_length_parameterize(points);
    let mut ctrl = generate_bezier(points, &u, left, right);
    let (mut error, mut split) = compute_max_error(points, &ctrl, &u);
    if error <= tolerance_sq {
        out.push(Curve::Cubic(ctrl));
        return Ok(());
    }

    if error <= 4.0 * tolerance_sq {
        for _ in 0..MAX_ITERATIONS {
            u = reparameterize(&ctrl, points, &u);
            ctrl = generate_bezier(points, &u, left, right);
            (error, split) = compute_max_error(points, &ctrl, &u);
            if error <= tolerance_sq {
                out.push(Curve::Cubic(ctrl));
                return Ok(());
            }
        }
    }

    trace!(
        samples = points.len(),
        split,
        error = error.sqrt(),
        "splitting fit range"
    );
    let center = split_tangent(points, split)?;
    fit_cubic(&points[..=split], left, center, tolerance_sq, out)?;
    fit_cubic(&points[split..], -center, right, tolerance_sq, out)
}

/// Unit tangent at an interior sample, pointing back along the curve.
fn split_tangent(points: &[Point], split: usize) -> Result<Vector, OutlineError> {
    (points[split - 1] - points[split + 1])
        .normalize()
        .or_else(|_| (points[split - 1] - points[split]).perp().normalize())
}

fn chord_length_parameterize(points: &[Point]) -> Vec<f64> {
    let mut u = Vec::with_capacity(points.len());
    u.push(0.0);
    for pair in points.windows(2) {
        let prev = u[u.len() - 1];
        u.push(prev + pair[0].distance(pair[1]));
    }
    let total = u[u.len() - 1];
    if total > 0.0 {
        for value in &mut u {
            *value /= total;
        }
    }
    u
}

/// Least-squares handle lengths along fixed end tangents.
fn generate_bezier(points: &[Point], u: &[f64], left: Vector, right: Vector) -> Ctrl {
    let first = points[0];
    let last = points[points.len() - 1];

    let mut c00 = 0.0;
    let mut c01 = 0.0;
    let mut c11 = 0.0;
    let mut x0 = 0.0;
    let mut x1 = 0.0;

    for (&p, &t) in points.iter().zip(u) {
        let s = 1.0 - t;
        let b0 = s * s * s;
        let b1 = 3.0 * s * s * t;
        let b2 = 3.0 * s * t * t;
        let b3 = t * t * t;
        let a0 = left * b1;
        let a1 = right * b2;

        c00 += a0.dot(a0);
        c01 += a0.dot(a1);
        c11 += a1.dot(a1);

        let base = Vector::new(
            first.x.mul_add(b0 + b1, last.x * (b2 + b3)),
            first.y.mul_add(b0 + b1, last.y * (b2 + b3)),
        );
        let residual = Vector::new(p.x - base.x, p.y - base.y);
        x0 += a0.dot(residual);
        x1 += a1.dot(residual);
    }

    let det_c0_c1 = c00.mul_add(c11, -(c01 * c01));
    let det_c0_x = c00.mul_add(x1, -(c01 * x0));
    let det_x_c1 = x0.mul_add(c11, -(x1 * c01));

    let (mut alpha_l, mut alpha_r) = if det_c0_c1 == 0.0 {
        (0.0, 0.0)
    } else {
        (det_x_c1 / det_c0_c1, det_c0_x / det_c0_c1)
    };

    let seg_len = first.distance(last);
    let epsilon = ALPHA_EPSILON * seg_len;
    if alpha_l < epsilon || alpha_r < epsilon || !alpha_l.is_finite() || !alpha_r.is_finite() {
        alpha_l = seg_len / 3.0;
        alpha_r = seg_len / 3.0;
    }

    [
        first,
        first + left * alpha_l,
        last + right * alpha_r,
        last,
    ]
}

#[expect(
    clippy::many_single_char_names,
    reason = "standard Bernstein basis notation"
)]
fn bezier_point(ctrl: &Ctrl, t: f64) -> Point {
    let s = 1.0 - t;
    let a = s * s * s;
    let b = 3.0 * s * s * t;
    let c = 3.0 * s * t * t;
    let d = t * t * t;
    Point::new(
        a.mul_add(ctrl[0].x, b.mul_add(ctrl[1].x, c.mul_add(ctrl[2].x, d * ctrl[3].x))),
        a.mul_add(ctrl[0].y, b.mul_add(ctrl[1].y, c.mul_add(ctrl[2].y, d * ctrl[3].y))),
    )
}

fn bezier_first_derivative(ctrl: &Ctrl, t: f64) -> Vector {
    Curve::Cubic(*ctrl).derivative(t)
}

fn bezier_second_derivative(ctrl: &Ctrl, t: f64) -> Vector {
    let s = 1.0 - t;
    let d0 = (ctrl[2] - ctrl[1]) - (ctrl[1] - ctrl[0]);
    let d1 = (ctrl[3] - ctrl[2]) - (ctrl[2] - ctrl[1]);
    (d0 * s + d1 * t) * 6.0
}

/// One Newton-Raphson step per sample toward the closest curve point.
fn reparameterize(ctrl: &Ctrl, points: &[Point], u: &[f64]) -> Vec<f64> {
    points
        .iter()
        .zip(u)
        .map(|(&p, &t)| newton_raphson_root(ctrl, p, t))
        .collect()
}

fn newton_raphson_root(ctrl: &Ctrl, point: Point, t: f64) -> f64 {
    let d = bezier_point(ctrl, t) - point;
    let qp = bezier_first_derivative(ctrl, t);
    let qpp = bezier_second_derivative(ctrl, t);
    let numerator = d.dot(qp);
    let denominator = qp.length_squared() + d.dot(qpp);
    if denominator == 0.0 || !denominator.is_finite() {
        return t;
    }
    (t - numerator / denominator).clamp(0.0, 1.0)
}

/// Worst squared distance between samples and the curve, and where.
///
/// The index is always an interior sample so a split makes progress.
fn compute_max_error(points: &[Point], ctrl: &Ctrl, u: &[f64]) -> (f64, usize) {
    let mut max_dist = 0.0;
    let mut split = points.len() / 2;
    for i in 1..points.len() - 1 {
        let dist = bezier_point(ctrl, u[i]).distance_squared(points[i]);
        if dist > max_dist {
            max_dist = dist;
            split = i;
        }
    }
    (max_dist, split)
}
