//! Curve offset engine.
//!
//! Thickens a parametric centerline into two boundary curves: sample the
//! centerline, push each sample sideways by the width function, and refit
//! both sample runs with [`fit_curve`]. The right boundary is returned
//! reversed (end to start) so that left, then right, walks around the
//! stroke.
//!
//! Three ways to choose the sideways direction are supported, see
//! [`OffsetMode`].

use tracing::debug;

use crate::curve::Curve;
use crate::fit::fit_curve;
use crate::path::Path;
use crate::types::{OutlineError, Point, Vector};

/// Default centerline sample count (the engine evaluates `steps + 1`
/// points).
pub const DEFAULT_STEPS: usize = 200;

/// Default curve fitting tolerance in glyph units.
pub const DEFAULT_MAX_ERROR: f64 = 0.03;

/// A parametric centerline over `t` in `[0, 1]`.
pub trait Centerline {
    fn position(&self, t: f64) -> Point;

    /// Analytic derivative, if known. Without one the engine falls back
    /// to forward differences between samples.
    fn velocity(&self, _t: f64) -> Option<Vector> {
        None
    }
}

impl Centerline for Curve {
    fn position(&self, t: f64) -> Point {
        self.eval(t)
    }

    fn velocity(&self, t: f64) -> Option<Vector> {
        Some(self.derivative(t))
    }
}

/// Centerline given only by a position function.
pub struct FnCenterline<F>(pub F);

impl<F: Fn(f64) -> Point> Centerline for FnCenterline<F> {
    fn position(&self, t: f64) -> Point {
        (self.0)(t)
    }
}

/// Offset distance along the centerline.
pub trait WidthProfile {
    /// Distance from the centerline to each boundary at `t` (half the
    /// local stroke width).
    fn width(&self, t: f64) -> f64;

    /// Derivative of [`WidthProfile::width`] with respect to `t`.
    fn derivative(&self, _t: f64) -> f64 {
        0.0
    }
}

impl WidthProfile for f64 {
    fn width(&self, _t: f64) -> f64 {
        *self
    }
}

/// Piecewise-linear width: ramps from `start_ratio` to full width over
/// the first half and from full width to `end_ratio` over the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Taper {
    pub half_width: f64,
    pub start_ratio: f64,
    pub end_ratio: f64,
}

impl Taper {
    fn ratio(&self, t: f64) -> f64 {
        if t < 0.5 {
            (1.0 - self.start_ratio).mul_add(2.0 * t, self.start_ratio)
        } else {
            (self.end_ratio - 1.0).mul_add(2.0f64.mul_add(t, -1.0), 1.0)
        }
    }
}

impl WidthProfile for Taper {
    fn width(&self, t: f64) -> f64 {
        self.half_width * self.ratio(t)
    }

    fn derivative(&self, t: f64) -> f64 {
        if t < 0.5 {
            2.0 * (1.0 - self.start_ratio) * self.half_width
        } else {
            2.0 * (self.end_ratio - 1.0) * self.half_width
        }
    }
}

/// How the sideways offset direction is chosen at each sample.
pub enum OffsetMode<'a> {
    /// Perpendicular to the centerline, skewed by the width derivative so
    /// tapering boundaries stay parallel to the true envelope.
    Normal,
    /// A caller-supplied direction per `t`. The right boundary lies along
    /// the direction, the left boundary against it.
    Directed(&'a dyn Fn(f64) -> Vector),
    /// One fixed direction for every sample, like a broad pen nib held at
    /// a constant angle.
    Slant(Vector),
}

/// Sampling and fitting parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    pub steps: usize,
    pub max_error: f64,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            max_error: DEFAULT_MAX_ERROR,
        }
    }
}

/// The two fitted boundaries of a thickened centerline.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetBoundaries {
    /// Runs from the start of the centerline to its end.
    pub left: Path,
    /// Runs from the end of the centerline back to its start.
    pub right: Path,
}

/// Thicken `centerline` by `width` on both sides.
///
/// With the direction `n` at a sample `P` and offset `w`, the left sample
/// is `P - n * w` and the right sample is `P + n * w`. For
/// [`OffsetMode::Normal`], `n` is the centerline direction turned a
/// quarter turn, `(-vy, vx)`.
///
/// # Errors
///
/// Returns [`OutlineError::DegenerateVector`] if no sample has a usable
/// direction (the centerline is a single point) or a supplied direction
/// is zero.
pub fn offset_curve<C, W>(
    centerline: &C,
    width: &W,
    mode: &OffsetMode<'_>,
    options: OffsetOptions,
) -> Result<OffsetBoundaries, OutlineError>
where
    C: Centerline + ?Sized,
    W: WidthProfile + ?Sized,
{
    let steps = options.steps.max(1);
    #[allow(clippy::cast_precision_loss)]
    let params: Vec<f64> = (0..=steps).map(|i| i as f64 / steps as f64).collect();
    let centers: Vec<Point> = params.iter().map(|&t| centerline.position(t)).collect();

    let directions = match mode {
        OffsetMode::Normal => normal_directions(centerline, width, &params, &centers)?,
        OffsetMode::Directed(direction) => params
            .iter()
            .map(|&t| {
                let n = direction(t).normalize()?;
                Ok((-n, n))
            })
            .collect::<Result<Vec<_>, OutlineError>>()?,
        OffsetMode::Slant(direction) => {
            let n = direction.normalize()?;
            vec![(-n, n); centers.len()]
        }
    };

    let mut left = Vec::with_capacity(centers.len());
    let mut right = Vec::with_capacity(centers.len());
    for ((&t, &p), &(left_dir, right_dir)) in params.iter().zip(&centers).zip(&directions) {
        let w = width.width(t);
        left.push(p + left_dir * w);
        right.push(p + right_dir * w);
    }
    right.reverse();

    let left = fit_curve(&left, options.max_error)?;
    let right = fit_curve(&right, options.max_error)?;
    debug!(
        steps,
        left_curves = left.len(),
        right_curves = right.len(),
        "offset centerline"
    );
    Ok(OffsetBoundaries { left, right })
}

/// Per-sample `(left, right)` unit directions for [`OffsetMode::Normal`].
fn normal_directions<C, W>(
    centerline: &C,
    width: &W,
    params: &[f64],
    centers: &[Point],
) -> Result<Vec<(Vector, Vector)>, OutlineError>
where
    C: Centerline + ?Sized,
    W: WidthProfile + ?Sized,
{
    let velocities = sample_velocities(centerline, params, centers)?;
    Ok(params
        .iter()
        .zip(&velocities)
        .map(|(&t, &(tangent, speed))| {
            let normal = tangent.perp();
            let skew = (width.derivative(t) / speed).atan();
            let (sin, cos) = skew.sin_cos();
            let along = tangent * sin;
            (-(normal * cos) - along, normal * cos - along)
        })
        .collect())
}

/// Unit tangent and speed at each sample.
///
/// Samples with no analytic or finite-difference velocity borrow the
/// nearest earlier usable one (or the first usable one at the start).
#[allow(clippy::cast_precision_loss)]
fn sample_velocities<C>(
    centerline: &C,
    params: &[f64],
    centers: &[Point],
) -> Result<Vec<(Vector, f64)>, OutlineError>
where
    C: Centerline + ?Sized,
{
    let steps = (centers.len() - 1) as f64;
    let raw: Vec<Option<(Vector, f64)>> = params
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let analytic = centerline.velocity(t).filter(|v| v.length() > 0.0);
            let velocity = analytic.or_else(|| {
                // Forward difference; the last sample reuses the final
                // interval.
                let (a, b) = if i + 1 < centers.len() {
                    (centers[i], centers[i + 1])
                } else {
                    (centers[i - 1], centers[i])
                };
                let v = (b - a) * steps;
                (v.length() > 0.0).then_some(v)
            })?;
            velocity.normalize().ok().map(|unit| (unit, velocity.length()))
        })
        .collect();

    let first_usable = raw
        .iter()
        .flatten()
        .next()
        .copied()
        .ok_or(OutlineError::DegenerateVector)?;
    let mut previous = first_usable;
    Ok(raw
        .into_iter()
        .map(|v| {
            if let Some(v) = v {
                previous = v;
            }
            previous
        })
        .collect())
}

/// Direction function sweeping the normal from `start` to `end`.
///
/// `start` and `end` are unit tangents at the two ends of a segment;
/// the returned function gives the normal `(-ty, tx)` of the tangent
/// rotated by the fraction `t` of the (shortest) angle between them.
#[must_use]
pub fn angular_sweep(start: Vector, end: Vector) -> impl Fn(f64) -> Vector {
    let from = start.angle();
    let mut delta = end.angle() - from;
    if delta > std::f64::consts::PI {
        delta -= std::f64::consts::TAU;
    } else if delta < -std::f64::consts::PI {
        delta += std::f64::consts::TAU;
    }
    move |t| Vector::from_angle(t.mul_add(delta, from)).perp()
}
