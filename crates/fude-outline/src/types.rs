//! Shared types for the fude stroke outline generator.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::assemble::StrokeOutline;
use crate::curve::Curve;
use crate::path::Path;

/// A 2D point in glyph coordinates.
///
/// Glyphs live in a 200 x 200 em box with the y axis pointing down,
/// matching the KAGE stroke data this crate consumes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (units from the left edge).
    pub x: f64,
    /// Vertical position (units from the top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        self.lerp(other, 0.5)
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            t.mul_add(other.x - self.x, self.x),
            t.mul_add(other.y - self.y, self.y),
        )
    }

    /// Move `dist` units along the direction from `self` to `target`.
    ///
    /// A negative `dist` moves away from `target`. Coincident points
    /// have no direction, so `self` is returned unchanged.
    #[must_use]
    pub fn move_towards(self, target: Self, dist: f64) -> Self {
        (target - self)
            .normalize()
            .map_or(self, |direction| self + direction * dist)
    }

    /// Endpoint equality used for stroke and path connection.
    ///
    /// An `epsilon` of zero (or less) demands exact coordinate equality.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        if epsilon <= 0.0 {
            self.x == other.x && self.y == other.y
        } else {
            self.distance_squared(other) <= epsilon * epsilon
        }
    }
}

/// A 2D displacement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `radians` from the positive x axis.
    #[must_use]
    pub fn from_angle(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin)
    }

    /// Angle from the positive x axis, in radians.
    #[must_use]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// z component of the 3D cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> f64 {
        self.x.mul_add(other.y, -(self.y * other.x))
    }

    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Quarter turn: `(x, y) -> (-y, x)`.
    #[must_use]
    pub const fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Unit vector with the same direction.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::DegenerateVector`] for a zero-length or
    /// non-finite vector.
    pub fn normalize(self) -> Result<Self, OutlineError> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(OutlineError::DegenerateVector);
        }
        Ok(Self::new(self.x / length, self.y / length))
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Self;

    fn add(self, rhs: Vector) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Self;

    fn sub(self, rhs: Vector) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Whether a boundary point is an on-curve anchor or an off-curve
/// control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorKind {
    /// On-curve point. Sub-paths start and end here.
    Anchor,
    /// Off-curve control point between two anchors.
    Interior,
}

/// A point on an outline boundary, tagged with its [`AnchorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub point: Point,
    pub kind: AnchorKind,
}

impl BoundaryPoint {
    #[must_use]
    pub const fn anchor(point: Point) -> Self {
        Self {
            point,
            kind: AnchorKind::Anchor,
        }
    }

    #[must_use]
    pub const fn interior(point: Point) -> Self {
        Self {
            point,
            kind: AnchorKind::Interior,
        }
    }

    #[must_use]
    pub fn is_anchor(self) -> bool {
        self.kind == AnchorKind::Anchor
    }
}

/// An open run of tagged boundary points.
///
/// Consecutive anchors bound one curve; the interior points between
/// them are its control points (0, 1 or 2 of them for a line, quadratic
/// or cubic).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPath(Vec<BoundaryPoint>);

impl BoundaryPath {
    /// Create a boundary path from tagged points.
    #[must_use]
    pub const fn new(points: Vec<BoundaryPoint>) -> Self {
        Self(points)
    }

    /// Straight two-anchor path, used to close an outline where no cap
    /// shape was generated.
    #[must_use]
    pub fn bridge(from: Point, to: Point) -> Self {
        Self(vec![BoundaryPoint::anchor(from), BoundaryPoint::anchor(to)])
    }

    /// Tag the control points of a [`Path`]: curve endpoints become
    /// anchors, everything else becomes interior.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let mut points = Vec::with_capacity(path.point_count());
        for (i, curve) in path.curves().iter().enumerate() {
            let controls = curve.points();
            if i == 0 {
                points.push(BoundaryPoint::anchor(controls[0]));
            }
            let last = controls.len() - 1;
            points.extend(controls[1..last].iter().copied().map(BoundaryPoint::interior));
            points.push(BoundaryPoint::anchor(controls[last]));
        }
        Self(points)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<&BoundaryPoint> {
        self.0.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&BoundaryPoint> {
        self.0.last()
    }

    #[must_use]
    pub fn points(&self) -> &[BoundaryPoint] {
        &self.0
    }

    /// Replace the position of the first point, keeping its tag.
    pub fn set_first(&mut self, point: Point) {
        if let Some(first) = self.0.first_mut() {
            first.point = point;
        }
    }

    /// Replace the position of the last point, keeping its tag.
    pub fn set_last(&mut self, point: Point) {
        if let Some(last) = self.0.last_mut() {
            last.point = point;
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Convert to a curve [`Path`], splitting at every anchor.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::UnclosedSubPath`] if the path does not
    /// start and end on an anchor, and
    /// [`OutlineError::InvalidCurveDegree`] if more than two interior
    /// points sit between consecutive anchors.
    pub fn to_path(&self) -> Result<Path, OutlineError> {
        let Some(first) = self.0.first() else {
            return Ok(Path::default());
        };
        if !first.is_anchor() {
            return Err(OutlineError::UnclosedSubPath(self.to_string()));
        }

        let mut curves = Vec::new();
        let mut pending = vec![first.point];
        for bp in &self.0[1..] {
            pending.push(bp.point);
            if bp.is_anchor() {
                curves.push(Curve::from_points(&pending)?);
                pending.clear();
                pending.push(bp.point);
            }
        }
        if pending.len() > 1 {
            return Err(OutlineError::UnclosedSubPath(self.to_string()));
        }
        Ok(Path::new(curves))
    }
}

impl fmt::Display for BoundaryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bp) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let tag = if bp.is_anchor() { 'A' } else { 'I' };
            write!(f, "{tag}({},{})", bp.point.x, bp.point.y)?;
        }
        Ok(())
    }
}

/// How curved centerline segments are thickened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveOffsetMethod {
    /// Sample the centerline densely, offset each sample and refit the
    /// samples with least-squares cubics. Accurate for any width.
    #[default]
    Sampled,
    /// Offset the control polygon with bend-corrected vertices. Cheap and
    /// exact for lines, approximate for tightly curved segments.
    ControlPolygon,
}

/// Style parameters shared by every stroke of a glyph.
///
/// Defaults reproduce the sans-serif gothic style at width 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Full stroke width. Boundaries sit `width / 2` from the centerline.
    pub width: f64,

    /// Length of the corner rounding at bends and of hook retraction.
    pub turn_size: f64,

    /// Multiplier on `turn_size` for the rounded corner of a bending
    /// stroke.
    pub bend_amount: f64,

    /// Multiplier on `turn_size` for the wide sweep of a round bending
    /// stroke.
    pub round_bend_amount: f64,

    /// Hook tip distance, as a multiple of `turn_size`.
    pub hook_ratio: f64,

    /// How far corner terminals extend past their endpoint, as a multiple
    /// of `width`.
    pub corner_extension: f64,

    /// Width ratio reached at the thin end of a tapered stroke.
    pub taper_ratio: f64,

    /// Centerline samples per offset curve (the engine evaluates
    /// `steps + 1` points).
    pub steps: usize,

    /// Curve fitting tolerance in glyph units.
    pub max_error: f64,

    /// Decimal digits in serialized drawing sequences.
    pub precision: usize,

    /// Distance under which stroke endpoints count as shared. Zero
    /// requires exact equality.
    pub connect_epsilon: f64,

    /// Upper bound on the bend correction factor at sharp vertices.
    pub miter_limit: f64,

    /// Thickening strategy for curved segments.
    pub curve_offset: CurveOffsetMethod,

    /// Fixed pen nib angle in degrees. When set, every segment is offset
    /// along this direction instead of its normal (calligraphic slant).
    pub pen_angle: Option<f64>,

    /// Fuse strokes that share an unshaped endpoint into one outline.
    pub fuse_connected: bool,
}

impl StyleConfig {
    /// Stroke width in glyph units.
    pub const DEFAULT_WIDTH: f64 = 5.0;
    /// `10 + DEFAULT_WIDTH / 2`, see [`StyleConfig::for_width`].
    pub const DEFAULT_TURN_SIZE: f64 = 12.5;
    pub const DEFAULT_BEND_AMOUNT: f64 = 1.0;
    pub const DEFAULT_ROUND_BEND_AMOUNT: f64 = 5.0;
    pub const DEFAULT_HOOK_RATIO: f64 = 1.25;
    pub const DEFAULT_CORNER_EXTENSION: f64 = 0.5;
    pub const DEFAULT_TAPER_RATIO: f64 = 0.3;
    pub const DEFAULT_STEPS: usize = crate::offset::DEFAULT_STEPS;
    pub const DEFAULT_MAX_ERROR: f64 = crate::offset::DEFAULT_MAX_ERROR;
    pub const DEFAULT_PRECISION: usize = 2;
    pub const DEFAULT_CONNECT_EPSILON: f64 = 0.0;
    pub const DEFAULT_MITER_LIMIT: f64 = 10.0;

    /// Defaults scaled for a given stroke width.
    #[must_use]
    pub fn for_width(width: f64) -> Self {
        Self {
            width,
            turn_size: 0.5f64.mul_add(width, 10.0),
            ..Self::default()
        }
    }

    /// Check every parameter for a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), OutlineError> {
        let positive = [
            ("width", self.width),
            ("turn_size", self.turn_size),
            ("hook_ratio", self.hook_ratio),
            ("max_error", self.max_error),
            ("miter_limit", self.miter_limit),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(OutlineError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        let non_negative = [
            ("bend_amount", self.bend_amount),
            ("round_bend_amount", self.round_bend_amount),
            ("corner_extension", self.corner_extension),
            ("connect_epsilon", self.connect_epsilon),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(OutlineError::InvalidConfig(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.taper_ratio) {
            return Err(OutlineError::InvalidConfig(format!(
                "taper_ratio must be within [0, 1], got {}",
                self.taper_ratio
            )));
        }
        if self.miter_limit < 1.0 {
            return Err(OutlineError::InvalidConfig(format!(
                "miter_limit must be at least 1, got {}",
                self.miter_limit
            )));
        }
        if self.steps == 0 {
            return Err(OutlineError::InvalidConfig(
                "steps must be at least 1".to_string(),
            ));
        }
        if let Some(angle) = self.pen_angle
            && !angle.is_finite()
        {
            return Err(OutlineError::InvalidConfig(format!(
                "pen_angle must be finite, got {angle}"
            )));
        }
        Ok(())
    }

    /// Half the stroke width: the offset distance of each boundary.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Farthest a mitered corner may sit from its centerline joint.
    #[must_use]
    pub fn miter_reach(&self) -> f64 {
        self.half_width() * self.miter_limit
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            turn_size: Self::DEFAULT_TURN_SIZE,
            bend_amount: Self::DEFAULT_BEND_AMOUNT,
            round_bend_amount: Self::DEFAULT_ROUND_BEND_AMOUNT,
            hook_ratio: Self::DEFAULT_HOOK_RATIO,
            corner_extension: Self::DEFAULT_CORNER_EXTENSION,
            taper_ratio: Self::DEFAULT_TAPER_RATIO,
            steps: Self::DEFAULT_STEPS,
            max_error: Self::DEFAULT_MAX_ERROR,
            precision: Self::DEFAULT_PRECISION,
            connect_epsilon: Self::DEFAULT_CONNECT_EPSILON,
            miter_limit: Self::DEFAULT_MITER_LIMIT,
            curve_offset: CurveOffsetMethod::default(),
            pen_angle: None,
            fuse_connected: true,
        }
    }
}

/// Output of glyph processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphResult {
    /// One outline per stroke, or per group of fused strokes.
    pub outlines: Vec<StrokeOutline>,
    /// Each outline as a closed curve path, in the same order.
    pub paths: Vec<Path>,
}

/// Errors that can occur during outline generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum OutlineError {
    /// A curve was built from a point count other than 2, 3 or 4.
    #[error("a curve needs 2, 3 or 4 control points, got {0}")]
    InvalidCurveDegree(usize),

    /// A stroke kind code outside the supported set.
    #[error("unknown stroke kind {0}")]
    UnknownStrokeKind(u16),

    /// A stroke record carries the wrong number of fields for its kind.
    #[error("stroke kind {kind} needs {expected} fields, got {actual}")]
    MissingFields {
        kind: u16,
        expected: usize,
        actual: usize,
    },

    /// A field that must hold a small non-negative integer code does not.
    #[error("stroke field {0} is not a valid code")]
    InvalidCode(f64),

    /// Curve fitting needs at least two points.
    #[error("curve fitting needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// A boundary path does not start and end on anchors.
    #[error("sub-path does not begin and end on an anchor: {0}")]
    UnclosedSubPath(String),

    /// A direction was requested from a zero-length vector.
    #[error("cannot take the direction of a zero-length vector")]
    DegenerateVector,

    /// Two paths share no endpoint.
    #[error("paths share no endpoint")]
    NotConnected,

    /// Style configuration is invalid.
    #[error("invalid style configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point) {
        assert!(
            a.distance(b) < 1e-10,
            "expected ({}, {}), got ({}, {})",
            b.x,
            b.y,
            a.x,
            a.y,
        );
    }

    // --- Point tests ---

    #[test]
    fn point_distance_squared() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_midpoint_and_lerp() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(20.0, 30.0);
        assert_point_eq(a.midpoint(b), Point::new(10.0, 20.0));
        assert_point_eq(a.lerp(b, 0.25), Point::new(5.0, 15.0));
    }

    #[test]
    fn move_towards_along_direction() {
        let vertex = Point::new(50.0, 0.0);
        assert_point_eq(
            vertex.move_towards(Point::new(0.0, 0.0), 10.0),
            Point::new(40.0, 0.0),
        );
        assert_point_eq(
            vertex.move_towards(Point::new(50.0, 50.0), 10.0),
            Point::new(50.0, 10.0),
        );
    }

    #[test]
    fn move_towards_negative_moves_away() {
        let p = Point::new(10.0, 10.0);
        assert_point_eq(
            p.move_towards(Point::new(10.0, 20.0), -2.5),
            Point::new(10.0, 7.5),
        );
    }

    #[test]
    fn move_towards_coincident_is_identity() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.move_towards(p, 5.0), p);
    }

    #[test]
    fn approx_eq_zero_epsilon_is_exact() {
        let a = Point::new(1.0, 1.0);
        assert!(a.approx_eq(Point::new(1.0, 1.0), 0.0));
        assert!(!a.approx_eq(Point::new(1.0, 1.000_001), 0.0));
        assert!(a.approx_eq(Point::new(1.0, 1.000_001), 1e-3));
    }

    // --- Vector tests ---

    #[test]
    fn normalize_unit_length() {
        let v = Vector::new(3.0, 4.0).normalize().unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn normalize_zero_is_error() {
        assert_eq!(
            Vector::new(0.0, 0.0).normalize(),
            Err(OutlineError::DegenerateVector)
        );
        assert_eq!(
            Vector::new(f64::NAN, 1.0).normalize(),
            Err(OutlineError::DegenerateVector)
        );
    }

    #[test]
    fn perp_is_quarter_turn() {
        let v = Vector::new(1.0, 0.0);
        assert_eq!(v.perp(), Vector::new(-0.0, 1.0));
        assert!(v.dot(v.perp()).abs() < f64::EPSILON);
        assert!((v.cross(v.perp()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_angle_round_trips_through_angle() {
        let w = Vector::from_angle(std::f64::consts::FRAC_PI_2);
        assert!((w - Vector::new(0.0, 1.0)).length() < 1e-12);
        assert!((w.angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    // --- BoundaryPath tests ---

    #[test]
    fn to_path_splits_at_anchors() {
        let bp = BoundaryPath::new(vec![
            BoundaryPoint::anchor(Point::new(0.0, 0.0)),
            BoundaryPoint::anchor(Point::new(10.0, 0.0)),
            BoundaryPoint::interior(Point::new(15.0, 0.0)),
            BoundaryPoint::anchor(Point::new(20.0, 5.0)),
            BoundaryPoint::interior(Point::new(20.0, 10.0)),
            BoundaryPoint::interior(Point::new(15.0, 15.0)),
            BoundaryPoint::anchor(Point::new(10.0, 15.0)),
        ]);
        let path = bp.to_path().unwrap();
        let degrees: Vec<usize> = path.curves().iter().map(Curve::degree).collect();
        assert_eq!(degrees, vec![1, 2, 3]);
        assert_eq!(path.start_point(), Some(Point::new(0.0, 0.0)));
        assert_eq!(path.end_point(), Some(Point::new(10.0, 15.0)));
    }

    #[test]
    fn to_path_rejects_three_interior_points() {
        let bp = BoundaryPath::new(vec![
            BoundaryPoint::anchor(Point::new(0.0, 0.0)),
            BoundaryPoint::interior(Point::new(1.0, 0.0)),
            BoundaryPoint::interior(Point::new(2.0, 0.0)),
            BoundaryPoint::interior(Point::new(3.0, 0.0)),
            BoundaryPoint::anchor(Point::new(4.0, 0.0)),
        ]);
        assert_eq!(bp.to_path(), Err(OutlineError::InvalidCurveDegree(5)));
    }

    #[test]
    fn to_path_rejects_trailing_interior() {
        let bp = BoundaryPath::new(vec![
            BoundaryPoint::anchor(Point::new(0.0, 0.0)),
            BoundaryPoint::interior(Point::new(1.0, 0.0)),
        ]);
        assert!(matches!(
            bp.to_path(),
            Err(OutlineError::UnclosedSubPath(_))
        ));
    }

    #[test]
    fn from_path_tags_controls_as_interior() {
        let path = Path::new(vec![
            Curve::Line([Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            Curve::Quad([
                Point::new(1.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 1.0),
            ]),
        ]);
        let bp = BoundaryPath::from_path(&path);
        let kinds: Vec<AnchorKind> = bp.points().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnchorKind::Anchor,
                AnchorKind::Anchor,
                AnchorKind::Interior,
                AnchorKind::Anchor,
            ]
        );
        assert_eq!(bp.to_path().unwrap(), path);
    }

    #[test]
    fn display_lists_tagged_points() {
        let bp = BoundaryPath::new(vec![
            BoundaryPoint::anchor(Point::new(0.0, 1.5)),
            BoundaryPoint::interior(Point::new(2.0, 3.0)),
        ]);
        assert_eq!(bp.to_string(), "A(0,1.5) I(2,3)");
    }

    // --- StyleConfig tests ---

    #[test]
    fn default_config_is_valid() {
        let config = StyleConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.half_width() - 2.5).abs() < f64::EPSILON);
        assert!((config.turn_size - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn default_turn_size_matches_width_rule() {
        let scaled = StyleConfig::for_width(StyleConfig::DEFAULT_WIDTH);
        assert_eq!(scaled, StyleConfig::default());
    }

    #[test]
    fn for_width_scales_turn_size() {
        let config = StyleConfig::for_width(8.0);
        assert!((config.turn_size - 14.0).abs() < f64::EPSILON);
        assert!((config.width - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_width = StyleConfig {
            width: 0.0,
            ..StyleConfig::default()
        };
        assert!(matches!(
            bad_width.validate(),
            Err(OutlineError::InvalidConfig(msg)) if msg.contains("width")
        ));

        let bad_taper = StyleConfig {
            taper_ratio: 1.5,
            ..StyleConfig::default()
        };
        assert!(bad_taper.validate().is_err());

        let bad_steps = StyleConfig {
            steps: 0,
            ..StyleConfig::default()
        };
        assert!(bad_steps.validate().is_err());
    }

    #[test]
    fn config_serde_round_trip() {
        let config = StyleConfig {
            pen_angle: Some(30.0),
            curve_offset: CurveOffsetMethod::ControlPolygon,
            ..StyleConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: StyleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let config: StyleConfig = serde_json::from_str(r#"{"width": 8.0}"#).unwrap();
        assert!((config.width - 8.0).abs() < f64::EPSILON);
        assert_eq!(config.steps, crate::offset::DEFAULT_STEPS);
    }

    // --- OutlineError tests ---

    #[test]
    fn error_display() {
        assert_eq!(
            OutlineError::MissingFields {
                kind: 2,
                expected: 9,
                actual: 7
            }
            .to_string(),
            "stroke kind 2 needs 9 fields, got 7"
        );
        assert_eq!(
            OutlineError::InvalidCurveDegree(5).to_string(),
            "a curve needs 2, 3 or 4 control points, got 5"
        );
    }

    #[test]
    fn error_serde_round_trip() {
        let err = OutlineError::UnclosedSubPath("I(0,0)".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let back: OutlineError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
