//! Bezier curves of degree 1 to 3.

use serde::{Deserialize, Serialize};

use crate::types::{OutlineError, Point, Vector};

/// A single Bezier curve, stored as its control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    Line([Point; 2]),
    Quad([Point; 3]),
    Cubic([Point; 4]),
}

/// Weighted sum of control points.
fn combine(points: &[Point], weights: &[f64]) -> Point {
    let (x, y) = points
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(x, y), (p, &w)| (w.mul_add(p.x, x), w.mul_add(p.y, y)));
    Point::new(x, y)
}

/// Weighted sum of control-point differences (a hodograph).
fn combine_deltas(points: &[Point], weights: &[f64], factor: f64) -> Vector {
    let (x, y) = points
        .windows(2)
        .zip(weights)
        .fold((0.0, 0.0), |(x, y), (pair, &w)| {
            let d = pair[1] - pair[0];
            (w.mul_add(d.x, x), w.mul_add(d.y, y))
        });
    Vector::new(x * factor, y * factor)
}

impl Curve {
    /// Build a curve from 2, 3 or 4 control points.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::InvalidCurveDegree`] for any other count.
    pub fn from_points(points: &[Point]) -> Result<Self, OutlineError> {
        match *points {
            [p0, p1] => Ok(Self::Line([p0, p1])),
            [p0, p1, p2] => Ok(Self::Quad([p0, p1, p2])),
            [p0, p1, p2, p3] => Ok(Self::Cubic([p0, p1, p2, p3])),
            _ => Err(OutlineError::InvalidCurveDegree(points.len())),
        }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Line(p) => p,
            Self::Quad(p) => p,
            Self::Cubic(p) => p,
        }
    }

    fn points_mut(&mut self) -> &mut [Point] {
        match self {
            Self::Line(p) => p,
            Self::Quad(p) => p,
            Self::Cubic(p) => p,
        }
    }

    /// 1 for a line, 2 for a quadratic, 3 for a cubic.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.points().len() - 1
    }

    /// SVG path command letter for this curve.
    #[must_use]
    pub const fn command(&self) -> char {
        match self {
            Self::Line(_) => 'L',
            Self::Quad(_) => 'Q',
            Self::Cubic(_) => 'C',
        }
    }

    #[must_use]
    pub fn start(&self) -> Point {
        self.points()[0]
    }

    #[must_use]
    pub fn end(&self) -> Point {
        let points = self.points();
        points[points.len() - 1]
    }

    pub fn set_start(&mut self, point: Point) {
        self.points_mut()[0] = point;
    }

    pub fn set_end(&mut self, point: Point) {
        let points = self.points_mut();
        let last = points.len() - 1;
        points[last] = point;
    }

    /// Same curve traversed from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut reversed = *self;
        reversed.points_mut().reverse();
        reversed
    }

    /// Position at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn eval(&self, t: f64) -> Point {
        let s = 1.0 - t;
        match self {
            Self::Line([p0, p1]) => p0.lerp(*p1, t),
            Self::Quad(p) => combine(p, &[s * s, 2.0 * s * t, t * t]),
            Self::Cubic(p) => combine(
                p,
                &[s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t],
            ),
        }
    }

    /// First derivative with respect to `t`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector {
        let s = 1.0 - t;
        match self {
            Self::Line([p0, p1]) => *p1 - *p0,
            Self::Quad(p) => combine_deltas(p, &[s, t], 2.0),
            Self::Cubic(p) => combine_deltas(p, &[s * s, 2.0 * s * t, t * t], 3.0),
        }
    }

    /// Unit direction of travel leaving the start point.
    ///
    /// Uses the first control point distinct from the start, so curves
    /// with a coincident first handle still have a direction.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::DegenerateVector`] if every control point
    /// coincides.
    pub fn start_tangent(&self) -> Result<Vector, OutlineError> {
        let start = self.start();
        self.points()[1..]
            .iter()
            .find(|p| **p != start)
            .map_or(Err(OutlineError::DegenerateVector), |p| {
                (*p - start).normalize()
            })
    }

    /// Unit direction of travel arriving at the end point.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::DegenerateVector`] if every control point
    /// coincides.
    pub fn end_tangent(&self) -> Result<Vector, OutlineError> {
        let end = self.end();
        let points = self.points();
        points[..points.len() - 1]
            .iter()
            .rev()
            .find(|p| **p != end)
            .map_or(Err(OutlineError::DegenerateVector), |p| {
                (end - *p).normalize()
            })
    }

    /// `true` if all control points coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let start = self.start();
        self.points().iter().all(|p| *p == start)
    }

    /// Evenly spaced points along the curve, excluding the start point.
    ///
    /// Lines contribute only their end point.
    #[must_use]
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        match self {
            Self::Line([_, p1]) => vec![*p1],
            _ => {
                let segments = segments.max(1);
                #[allow(clippy::cast_precision_loss)]
                let step = 1.0 / segments as f64;
                (1..=segments)
                    .map(|i| {
                        #[allow(clippy::cast_precision_loss)]
                        let t = i as f64 * step;
                        self.eval(t)
                    })
                    .collect()
            }
        }
    }
}
