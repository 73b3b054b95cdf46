//! Curve path container.
//!
//! A [`Path`] is an ordered run of [`Curve`]s where each curve starts
//! where the previous one ends. Paths can be reversed, joined at shared
//! endpoints and serialized as SVG-style drawing commands.

use geo::{Area, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::types::{OutlineError, Point};

/// Samples per curved segment when flattening for area computation.
const AREA_FLATTEN_SEGMENTS: usize = 32;

/// An ordered sequence of connected curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path(Vec<Curve>);

impl Path {
    #[must_use]
    pub const fn new(curves: Vec<Curve>) -> Self {
        Self(curves)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of curves.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn curves(&self) -> &[Curve] {
        &self.0
    }

    #[must_use]
    pub fn into_curves(self) -> Vec<Curve> {
        self.0
    }

    pub fn push(&mut self, curve: Curve) {
        self.0.push(curve);
    }

    /// Total control points, counting each shared endpoint once.
    #[must_use]
    pub fn point_count(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        1 + self.0.iter().map(Curve::degree).sum::<usize>()
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point> {
        self.0.first().map(Curve::start)
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point> {
        self.0.last().map(Curve::end)
    }

    /// `true` if the path ends where it starts.
    #[must_use]
    pub fn is_closed(&self, epsilon: f64) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => start.approx_eq(end, epsilon),
            _ => false,
        }
    }

    /// Same path traversed from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().map(Curve::reversed).collect())
    }

    /// `true` if any endpoint of `self` coincides with any endpoint of
    /// `other`.
    #[must_use]
    pub fn connected(&self, other: &Self, epsilon: f64) -> bool {
        let (Some(s1), Some(e1), Some(s2), Some(e2)) = (
            self.start_point(),
            self.end_point(),
            other.start_point(),
            other.end_point(),
        ) else {
            return false;
        };
        s1.approx_eq(s2, epsilon)
            || s1.approx_eq(e2, epsilon)
            || e1.approx_eq(s2, epsilon)
            || e1.approx_eq(e2, epsilon)
    }

    /// Join `other` onto `self` at a shared endpoint.
    ///
    /// The result keeps the direction of `self`; `other` is reversed when
    /// needed. Pairings are tried in the order start-start, start-end,
    /// end-start, end-end. Joining with an empty path returns a copy of
    /// the non-empty one.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::NotConnected`] if the paths share no
    /// endpoint.
    pub fn connect(&self, other: &Self, epsilon: f64) -> Result<Self, OutlineError> {
        let (Some(s1), Some(e1)) = (self.start_point(), self.end_point()) else {
            return Ok(other.clone());
        };
        let (Some(s2), Some(e2)) = (other.start_point(), other.end_point()) else {
            return Ok(self.clone());
        };

        let (head, tail) = if s1.approx_eq(s2, epsilon) {
            (other.reversed(), self.clone())
        } else if s1.approx_eq(e2, epsilon) {
            (other.clone(), self.clone())
        } else if e1.approx_eq(s2, epsilon) {
            (self.clone(), other.clone())
        } else if e1.approx_eq(e2, epsilon) {
            (self.clone(), other.reversed())
        } else {
            return Err(OutlineError::NotConnected);
        };

        let mut curves = head.into_curves();
        curves.extend(tail.into_curves());
        Ok(Self(curves))
    }

    /// SVG-style drawing commands: `M` to the start point, then one
    /// `L`, `Q` or `C` per curve, space-separated. The path is not
    /// closed with `Z`.
    #[must_use]
    pub fn to_drawing_sequence(&self, precision: usize) -> String {
        let Some(start) = self.start_point() else {
            return String::new();
        };
        let mut parts = Vec::with_capacity(self.0.len() + 1);
        parts.push(format!("M {}", format_point(start, precision)));
        for curve in &self.0 {
            let coords: Vec<String> = curve.points()[1..]
                .iter()
                .map(|p| format_point(*p, precision))
                .collect();
            parts.push(format!("{} {}", curve.command(), coords.join(" ")));
        }
        parts.join(" ")
    }

    /// Polyline approximation, starting with the start point.
    #[must_use]
    pub fn flatten(&self, segments_per_curve: usize) -> Vec<Point> {
        let Some(start) = self.start_point() else {
            return Vec::new();
        };
        let mut points = vec![start];
        for curve in &self.0 {
            points.extend(curve.flatten(segments_per_curve));
        }
        points
    }

    /// Shoelace area of the flattened path, treated as a closed ring.
    ///
    /// Positive when the path winds counter-clockwise in a y-up frame,
    /// which is the winding every generated stroke outline has.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let ring: LineString<f64> = self
            .flatten(AREA_FLATTEN_SEGMENTS)
            .into_iter()
            .map(|p| (p.x, p.y))
            .collect();
        Polygon::new(ring, vec![]).signed_area()
    }
}

fn format_point(point: Point, precision: usize) -> String {
    format!(
        "{},{}",
        format_coordinate(point.x, precision),
        format_coordinate(point.y, precision)
    )
}

/// Round to `precision` decimals, then drop trailing zeros and a
/// trailing decimal point. Negative zero prints as `0`.
#[must_use]
pub fn format_coordinate(value: f64, precision: usize) -> String {
    let mut text = format!("{value:.precision$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
