//! Per-stroke outline assembly.
//!
//! Builds the four sub-paths of a [`StrokeOutline`] from a stroke's
//! centerline skeleton:
//!
//! - each body segment is thickened into a left and a right boundary run
//!   (lines through a [`LocalFrame`], curves through the offset engine or
//!   a bend-corrected control polygon),
//! - runs of consecutive segments are mitered where they meet at an
//!   angle and concatenated with [`merge_paths`],
//! - a hook end is thickened separately and becomes the tail.
//!
//! Heads are never shaped. Empty heads and tails are bridged with a
//! straight cap when the outline is closed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::curve::Curve;
use crate::frame::LocalFrame;
use crate::fusion::{Ray, limited_miter};
use crate::offset::{
    OffsetMode, OffsetOptions, Taper, WidthProfile, angular_sweep, offset_curve,
};
use crate::path::Path;
use crate::stroke::StrokeDescriptor;
use crate::types::{
    BoundaryPath, BoundaryPoint, CurveOffsetMethod, OutlineError, Point, StyleConfig, Vector,
};

/// Boundary runs closer than this at a segment junction are left for
/// [`merge_paths`] to average.
const JUNCTION_EPSILON: f64 = 1e-6;

/// One stroke's outline as four boundary runs.
///
/// Walking `head`, `body_left`, `tail`, `body_right` in order traces the
/// closed outline counter-clockwise (in a y-up frame).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeOutline {
    /// Cap at the start, from the end of `body_right` to the start of
    /// `body_left`. Empty when unshaped.
    pub head: BoundaryPath,
    /// Left boundary, from start to end.
    pub body_left: BoundaryPath,
    /// Cap at the end, from the end of `body_left` to the start of
    /// `body_right`. Empty when unshaped.
    pub tail: BoundaryPath,
    /// Right boundary, from end to start.
    pub body_right: BoundaryPath,
    /// Centerline start point.
    pub start: Point,
    /// Centerline end point.
    pub end: Point,
    /// The start carries no head shaping and may be fused.
    pub start_fusible: bool,
    /// The end carries no tail shaping and may be fused.
    pub end_fusible: bool,
}

impl StrokeOutline {
    /// The same outline walked from its end to its start.
    ///
    /// Caps and bodies swap roles; no point order changes, so the closed
    /// loop is identical.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            head: self.tail,
            body_left: self.body_right,
            tail: self.head,
            body_right: self.body_left,
            start: self.end,
            end: self.start,
            start_fusible: self.end_fusible,
            end_fusible: self.start_fusible,
        }
    }

    /// Merge all four sub-paths into one closed boundary run.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::UnclosedSubPath`] if a body is empty or a
    /// sub-path does not start and end on anchors.
    pub fn merged(&self) -> Result<BoundaryPath, OutlineError> {
        let head = if self.head.is_empty() {
            BoundaryPath::bridge(last_point(&self.body_right)?, first_point(&self.body_left)?)
        } else {
            self.head.clone()
        };
        let tail = if self.tail.is_empty() {
            BoundaryPath::bridge(last_point(&self.body_left)?, first_point(&self.body_right)?)
        } else {
            self.tail.clone()
        };
        merge_paths(&[&head, &self.body_left, &tail, &self.body_right])
    }

    /// The closed outline as a curve path.
    ///
    /// # Errors
    ///
    /// Same as [`StrokeOutline::merged`], plus
    /// [`OutlineError::InvalidCurveDegree`] for malformed runs.
    pub fn to_path(&self) -> Result<Path, OutlineError> {
        self.merged()?.to_path()
    }

    /// Distinct boundary points around the closed loop.
    ///
    /// # Errors
    ///
    /// Same as [`StrokeOutline::merged`].
    pub fn vertex_count(&self) -> Result<usize, OutlineError> {
        Ok(self.merged()?.len().saturating_sub(1))
    }
}

fn first_point(path: &BoundaryPath) -> Result<Point, OutlineError> {
    path.first()
        .map(|bp| bp.point)
        .ok_or_else(|| OutlineError::UnclosedSubPath(path.to_string()))
}

fn last_point(path: &BoundaryPath) -> Result<Point, OutlineError> {
    path.last()
        .map(|bp| bp.point)
        .ok_or_else(|| OutlineError::UnclosedSubPath(path.to_string()))
}

fn require_anchor(bp: &BoundaryPoint, path: &BoundaryPath) -> Result<(), OutlineError> {
    if bp.is_anchor() {
        Ok(())
    } else {
        Err(OutlineError::UnclosedSubPath(path.to_string()))
    }
}

/// Concatenate boundary runs end to start.
///
/// Every run must start and end on an anchor. Where one run ends and the
/// next begins, the two points are replaced by a single anchor at their
/// midpoint (the shared point itself when they are equal). Empty runs are
/// skipped. The result holds the total point count minus one point per
/// junction.
///
/// # Errors
///
/// Returns [`OutlineError::UnclosedSubPath`] with the offending run if a
/// run starts or ends on an interior point.
pub fn merge_paths(paths: &[&BoundaryPath]) -> Result<BoundaryPath, OutlineError> {
    let mut runs = paths.iter().copied().filter(|p| !p.is_empty());
    let Some(first) = runs.next() else {
        return Ok(BoundaryPath::default());
    };

    let mut merged: Vec<BoundaryPoint> = Vec::new();
    let points = first.points();
    require_anchor(&points[0], first)?;
    merged.extend_from_slice(&points[..points.len() - 1]);

    let mut previous = first;
    for current in runs {
        let prev_points = previous.points();
        let prev_last = &prev_points[prev_points.len() - 1];
        let cur_points = current.points();
        let cur_first = &cur_points[0];
        require_anchor(prev_last, previous)?;
        require_anchor(cur_first, current)?;

        let joint = if prev_last.point == cur_first.point {
            prev_last.point
        } else {
            prev_last.point.midpoint(cur_first.point)
        };
        merged.push(BoundaryPoint::anchor(joint));
        if cur_points.len() > 2 {
            merged.extend_from_slice(&cur_points[1..cur_points.len() - 1]);
        }
        previous = current;
    }

    let last_points = previous.points();
    let last = last_points[last_points.len() - 1];
    require_anchor(&last, previous)?;
    merged.push(last);
    Ok(BoundaryPath::new(merged))
}

/// Left and right boundary runs of one centerline segment.
struct SegmentSides {
    /// Start to end.
    left: BoundaryPath,
    /// End to start.
    right: BoundaryPath,
}

/// Assemble the outline of one stroke.
///
/// # Errors
///
/// Propagates skeleton, offset and merge errors. A stroke whose control
/// points all coincide yields [`OutlineError::DegenerateVector`].
pub fn assemble(
    stroke: &StrokeDescriptor,
    style: &StyleConfig,
) -> Result<StrokeOutline, OutlineError> {
    let skeleton = stroke.skeleton(style)?;
    let count = skeleton.body.len();
    if count == 0 {
        return Err(OutlineError::DegenerateVector);
    }
    let half_width = style.half_width();

    let mut lefts = Vec::with_capacity(count);
    let mut rights = Vec::with_capacity(count);
    for (i, segment) in skeleton.body.iter().enumerate() {
        let taper_start = i == 0 && stroke.start_joint.is_tapered();
        let taper_end = i + 1 == count && stroke.end_joint.is_tapered();
        let taper = (taper_start || taper_end).then_some(Taper {
            half_width,
            start_ratio: if taper_start { style.taper_ratio } else { 1.0 },
            end_ratio: if taper_end { style.taper_ratio } else { 1.0 },
        });
        let sides = thicken_segment(segment, taper, style)?;
        lefts.push(sides.left);
        rights.push(sides.right);
    }

    let reach = style.miter_reach();
    for (i, junction) in skeleton.body[..count - 1].iter().map(Curve::end).enumerate() {
        let (before, after) = lefts.split_at_mut(i + 1);
        miter_runs(&mut before[i], &mut after[0], junction, reach, false)?;
        let (before, after) = rights.split_at_mut(i + 1);
        miter_runs(&mut before[i], &mut after[0], junction, reach, true)?;
    }
    rights.reverse();

    let body_left = merge_paths(&lefts.iter().collect::<Vec<_>>())?;
    let body_right = merge_paths(&rights.iter().collect::<Vec<_>>())?;
    let tail = match &skeleton.hook {
        Some(hook) => hook_tail(hook, style)?,
        None => BoundaryPath::default(),
    };

    debug!(
        kind = ?stroke.kind,
        segments = count,
        left_points = body_left.len(),
        right_points = body_right.len(),
        tail_points = tail.len(),
        "assembled stroke outline"
    );
    Ok(StrokeOutline {
        head: BoundaryPath::default(),
        body_left,
        tail,
        body_right,
        start: stroke.start_point().ok_or(OutlineError::DegenerateVector)?,
        end: stroke.end_point().ok_or(OutlineError::DegenerateVector)?,
        start_fusible: stroke.start_joint.is_fusible(),
        end_fusible: stroke.end_joint.is_fusible(),
    })
}

/// Miter two runs that meet at a segment junction.
///
/// Left runs meet end to start; right runs (stored end to start) meet
/// start to end. The shared corner is the intersection of the boundary
/// lines, unless that lies farther than `reach` from the centerline
/// junction, in which case the runs meet at their midpoint.
fn miter_runs(
    before: &mut BoundaryPath,
    after: &mut BoundaryPath,
    junction: Point,
    reach: f64,
    reversed: bool,
) -> Result<(), OutlineError> {
    let (incoming, outgoing) = if reversed {
        (Ray::at_start(before)?, Ray::at_end(after)?)
    } else {
        (Ray::at_end(before)?, Ray::at_start(after)?)
    };
    if incoming.origin.approx_eq(outgoing.origin, JUNCTION_EPSILON) {
        return Ok(());
    }
    let corner = limited_miter(incoming, outgoing, junction, reach);
    if reversed {
        before.set_first(corner);
        after.set_last(corner);
    } else {
        before.set_last(corner);
        after.set_first(corner);
    }
    Ok(())
}

/// Thicken one centerline segment.
fn thicken_segment(
    segment: &Curve,
    taper: Option<Taper>,
    style: &StyleConfig,
) -> Result<SegmentSides, OutlineError> {
    let half_width = style.half_width();
    let options = OffsetOptions {
        steps: style.steps,
        max_error: style.max_error,
    };

    if let Some(degrees) = style.pen_angle {
        let mode = OffsetMode::Slant(Vector::from_angle(degrees.to_radians()));
        return match taper {
            Some(taper) => sampled_sides(segment, &taper, &mode, options),
            None => sampled_sides(segment, &half_width, &mode, options),
        };
    }
    if let Some(taper) = taper {
        return tracked_sides(segment, &taper, options);
    }
    match (segment, style.curve_offset) {
        (Curve::Line([start, end]), _) => line_sides(*start, *end, half_width),
        (_, CurveOffsetMethod::ControlPolygon) => {
            control_polygon_sides(segment.points(), half_width, style.miter_limit)
        }
        (_, CurveOffsetMethod::Sampled) => tracked_sides(segment, &half_width, options),
    }
}

/// Offset along the normal, or along a swept direction when an end of the
/// segment has no derivative (a handle sitting on its anchor).
fn tracked_sides<W: WidthProfile + ?Sized>(
    segment: &Curve,
    width: &W,
    options: OffsetOptions,
) -> Result<SegmentSides, OutlineError> {
    let stable =
        segment.derivative(0.0).length() > 0.0 && segment.derivative(1.0).length() > 0.0;
    if stable {
        sampled_sides(segment, width, &OffsetMode::Normal, options)
    } else {
        let sweep = angular_sweep(segment.start_tangent()?, segment.end_tangent()?);
        sampled_sides(segment, width, &OffsetMode::Directed(&sweep), options)
    }
}

fn sampled_sides<W: WidthProfile + ?Sized>(
    segment: &Curve,
    width: &W,
    mode: &OffsetMode<'_>,
    options: OffsetOptions,
) -> Result<SegmentSides, OutlineError> {
    let boundaries = offset_curve(segment, width, mode, options)?;
    Ok(SegmentSides {
        left: BoundaryPath::from_path(&boundaries.left),
        right: BoundaryPath::from_path(&boundaries.right),
    })
}

fn line_sides(start: Point, end: Point, half_width: f64) -> Result<SegmentSides, OutlineError> {
    let at_start = LocalFrame::along(start, end)?;
    let at_end = at_start.at(end);
    Ok(SegmentSides {
        left: BoundaryPath::bridge(
            at_start.place(0.0, -half_width),
            at_end.place(0.0, -half_width),
        ),
        right: BoundaryPath::bridge(
            at_end.place(0.0, half_width),
            at_start.place(0.0, half_width),
        ),
    })
}

/// Offset a control polygon: ends move perpendicular to their legs, inner
/// vertices move along the bisector by the bend-corrected distance.
fn control_polygon_sides(
    controls: &[Point],
    half_width: f64,
    miter_limit: f64,
) -> Result<SegmentSides, OutlineError> {
    let mut polygon: Vec<Point> = Vec::with_capacity(controls.len());
    for &p in controls {
        if polygon.last() != Some(&p) {
            polygon.push(p);
        }
    }
    let n = polygon.len();
    if n < 2 {
        return Err(OutlineError::DegenerateVector);
    }
    if n == 2 {
        return line_sides(polygon[0], polygon[1], half_width);
    }

    let first = LocalFrame::along(polygon[0], polygon[1])?;
    let last = LocalFrame::along(polygon[n - 2], polygon[n - 1])?.at(polygon[n - 1]);

    let mut left = vec![BoundaryPoint::anchor(first.place(0.0, -half_width))];
    let mut right = vec![BoundaryPoint::anchor(first.place(0.0, half_width))];
    for window in polygon.windows(3) {
        let (l, r) = bend_offsets(window[0], window[1], window[2], half_width, miter_limit)?;
        left.push(BoundaryPoint::interior(l));
        right.push(BoundaryPoint::interior(r));
    }
    left.push(BoundaryPoint::anchor(last.place(0.0, -half_width)));
    right.push(BoundaryPoint::anchor(last.place(0.0, half_width)));
    right.reverse();

    Ok(SegmentSides {
        left: BoundaryPath::new(left),
        right: BoundaryPath::new(right),
    })
}

/// Left and right offsets of a polygon vertex.
///
/// The vertex moves along the bisector of the two leg normals by
/// `half_width / sin(theta / 2)`, where `theta` is the interior angle at
/// the vertex, so both offset legs stay `half_width` from the centerline.
///
/// # Errors
///
/// Returns [`OutlineError::DegenerateVector`] if a leg has no length.
pub fn bend_offsets(
    previous: Point,
    vertex: Point,
    next: Point,
    half_width: f64,
    miter_limit: f64,
) -> Result<(Point, Point), OutlineError> {
    let incoming = (vertex - previous).normalize()?;
    let outgoing = (next - vertex).normalize()?;
    let bisector = (incoming.perp() + outgoing.perp())
        .normalize()
        .unwrap_or_else(|_| incoming.perp());
    let offset = bisector * (half_width * bend_factor(incoming, outgoing, miter_limit));
    Ok((vertex - offset, vertex + offset))
}

/// `1 / sin(theta / 2)` for the interior angle `theta` between two unit
/// leg directions, capped at `miter_limit`.
#[must_use]
pub fn bend_factor(incoming: Vector, outgoing: Vector, miter_limit: f64) -> f64 {
    let back = -incoming;
    let interior = back.cross(outgoing).abs().atan2(back.dot(outgoing));
    let sin = (interior * 0.5).sin();
    let factor = if sin > 0.0 { sin.recip() } else { f64::INFINITY };
    if factor > miter_limit {
        warn!(factor, miter_limit, "bend factor clamped to miter limit");
        miter_limit
    } else {
        factor
    }
}

/// Thicken a hook curve and close it at the tip.
///
/// The result runs from the left boundary at the hook's start, around the
/// tip, to the right boundary at the hook's start.
fn hook_tail(hook: &Curve, style: &StyleConfig) -> Result<BoundaryPath, OutlineError> {
    let sides = thicken_segment(hook, None, style)?;
    let cap = BoundaryPath::bridge(last_point(&sides.left)?, first_point(&sides.right)?);
    merge_paths(&[&sides.left, &cap, &sides.right])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stroke::{EndJoint, StartJoint, StrokeKind};
    use crate::types::AnchorKind;

    fn anchors(points: &[(f64, f64)]) -> BoundaryPath {
        BoundaryPath::new(
            points
                .iter()
                .map(|&(x, y)| BoundaryPoint::anchor(Point::new(x, y)))
                .collect(),
        )
    }

    fn stroke(
        kind: StrokeKind,
        start: StartJoint,
        end: EndJoint,
        pts: &[(f64, f64)],
    ) -> StrokeDescriptor {
        StrokeDescriptor::new(
            kind,
            start,
            end,
            pts.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        )
        .unwrap()
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    // --- merge_paths tests ---

    #[test]
    fn merge_counts_one_point_per_junction() {
        let a = anchors(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let b = anchors(&[(2.0, 0.0), (3.0, 0.0)]);
        let c = anchors(&[(3.0, 0.0), (4.0, 0.0), (5.0, 0.0), (6.0, 0.0)]);
        let merged = merge_paths(&[&a, &b, &c]).unwrap();
        assert_eq!(merged.len(), a.len() + b.len() + c.len() - 2);
    }

    #[test]
    fn merge_substitutes_midpoint() {
        let a = anchors(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = anchors(&[(10.0, 0.2), (10.0, 10.0)]);
        let merged = merge_paths(&[&a, &b]).unwrap();
        assert_eq!(merged.len(), 3);
        assert!(close(merged.points()[1].point, Point::new(10.0, 0.1)));
    }

    #[test]
    fn merge_keeps_interior_points() {
        let a = anchors(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = BoundaryPath::new(vec![
            BoundaryPoint::anchor(Point::new(10.0, 0.0)),
            BoundaryPoint::interior(Point::new(20.0, 0.0)),
            BoundaryPoint::anchor(Point::new(20.0, 10.0)),
        ]);
        let merged = merge_paths(&[&a, &b]).unwrap();
        let kinds: Vec<AnchorKind> = merged.points().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnchorKind::Anchor,
                AnchorKind::Anchor,
                AnchorKind::Interior,
                AnchorKind::Anchor,
            ]
        );
    }

    #[test]
    fn merge_rejects_interior_boundary() {
        let a = anchors(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = BoundaryPath::new(vec![
            BoundaryPoint::interior(Point::new(10.0, 0.0)),
            BoundaryPoint::anchor(Point::new(20.0, 0.0)),
        ]);
        let err = merge_paths(&[&a, &b]).unwrap_err();
        assert!(matches!(err, OutlineError::UnclosedSubPath(text) if text.starts_with("I(10,0)")));
    }

    #[test]
    fn merge_skips_empty_runs() {
        let a = anchors(&[(0.0, 0.0), (10.0, 0.0)]);
        let empty = BoundaryPath::default();
        let merged = merge_paths(&[&empty, &a, &empty]).unwrap();
        assert_eq!(merged, a);
        assert!(merge_paths(&[]).unwrap().is_empty());
    }

    // --- bend correction tests ---

    #[test]
    fn bend_factor_straight_is_one() {
        let d = Vector::new(1.0, 0.0);
        assert!((bend_factor(d, d, 10.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bend_offsets_right_angle() {
        let (l, r) = bend_offsets(
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            5.0,
            10.0,
        )
        .unwrap();
        let vertex = Point::new(50.0, 0.0);
        let expected = 5.0 / std::f64::consts::FRAC_PI_4.sin();
        assert!((l.distance(vertex) - expected).abs() < 1e-9);
        assert!((r.distance(vertex) - expected).abs() < 1e-9);
        // Outer corner of a clockwise-on-screen turn is up and to the right.
        assert!(close(l, Point::new(55.0, -5.0)));
        assert!(close(r, Point::new(45.0, 5.0)));
    }

    #[test]
    fn bend_factor_clamps_reversal() {
        let d = Vector::new(1.0, 0.0);
        assert!((bend_factor(d, -d, 4.0) - 4.0).abs() < f64::EPSILON);
    }

    // --- outline tests ---

    #[test]
    fn straight_outline_area_and_winding() {
        let s = stroke(
            StrokeKind::Straight,
            StartJoint::Free,
            EndJoint::Free,
            &[(0.0, 0.0), (100.0, 0.0)],
        );
        let outline = assemble(&s, &StyleConfig::for_width(10.0)).unwrap();
        assert!(outline.head.is_empty());
        assert!(outline.tail.is_empty());
        assert_eq!(outline.vertex_count().unwrap(), 4);
        let path = outline.to_path().unwrap();
        assert!(path.is_closed(0.0));
        assert!((path.signed_area() - 1000.0).abs() < 1e-9);
        assert_eq!(
            path.to_drawing_sequence(2),
            "M 0,5 L 0,-5 L 100,-5 L 100,5 L 0,5"
        );
    }

    #[test]
    fn reversed_outline_is_same_loop() {
        let s = stroke(
            StrokeKind::Straight,
            StartJoint::Free,
            EndJoint::Free,
            &[(0.0, 0.0), (100.0, 0.0)],
        );
        let outline = assemble(&s, &StyleConfig::for_width(10.0)).unwrap();
        let area = outline.to_path().unwrap().signed_area();
        let reversed = outline.clone().reversed();
        assert_eq!(reversed.start, outline.end);
        assert!((reversed.to_path().unwrap().signed_area() - area).abs() < 1e-9);
    }

    #[test]
    fn curved_outline_is_closed_and_positive() {
        for method in [CurveOffsetMethod::Sampled, CurveOffsetMethod::ControlPolygon] {
            let style = StyleConfig {
                curve_offset: method,
                ..StyleConfig::default()
            };
            let s = stroke(
                StrokeKind::Curve,
                StartJoint::Free,
                EndJoint::Free,
                &[(20.0, 100.0), (100.0, 20.0), (180.0, 100.0)],
            );
            let path = assemble(&s, &style).unwrap().to_path().unwrap();
            assert!(path.is_closed(0.0), "{method:?}");
            assert!(path.signed_area() > 0.0, "{method:?}");
        }
    }

    #[test]
    fn control_polygon_quad_has_corrected_interior() {
        let style = StyleConfig {
            curve_offset: CurveOffsetMethod::ControlPolygon,
            ..StyleConfig::for_width(10.0)
        };
        let s = stroke(
            StrokeKind::Curve,
            StartJoint::Free,
            EndJoint::Free,
            &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)],
        );
        let outline = assemble(&s, &style).unwrap();
        let left = outline.body_left.points();
        assert_eq!(left.len(), 3);
        assert_eq!(left[1].kind, AnchorKind::Interior);
        assert!(close(left[1].point, Point::new(55.0, -5.0)));
    }

    #[test]
    fn bending_outline_segments_join() {
        let s = stroke(
            StrokeKind::Bending,
            StartJoint::Free,
            EndJoint::Free,
            &[(30.0, 30.0), (30.0, 150.0), (170.0, 150.0)],
        );
        let outline = assemble(&s, &StyleConfig::default()).unwrap();
        let path = outline.to_path().unwrap();
        assert!(path.is_closed(0.0));
        assert!(path.signed_area() > 0.0);
    }

    #[test]
    fn vcurve_junction_is_mitered() {
        let style = StyleConfig::for_width(10.0);
        let s = stroke(
            StrokeKind::VCurve,
            StartJoint::Free,
            EndJoint::Free,
            &[(100.0, 0.0), (100.0, 100.0), (150.0, 100.0), (150.0, 150.0)],
        );
        let outline = assemble(&s, &style).unwrap();
        // Moving down then turning toward +x: the left side is the outer
        // corner. The fitted curve's end tangent is a chord, hence the
        // loose tolerance.
        let corner = outline.body_left.points()[1];
        assert!(corner.is_anchor());
        assert!(corner.point.distance(Point::new(105.0, 95.0)) < 0.05);
    }

    #[test]
    fn hook_becomes_tail() {
        let s = stroke(
            StrokeKind::Straight,
            StartJoint::Free,
            EndJoint::TurnLeft,
            &[(100.0, 20.0), (100.0, 170.0)],
        );
        let outline = assemble(&s, &StyleConfig::default()).unwrap();
        assert!(!outline.tail.is_empty());
        assert!(!outline.end_fusible);
        let tail_first = outline.tail.first().unwrap().point;
        let body_last = outline.body_left.last().unwrap().point;
        assert!(close(tail_first, body_last));
        let path = outline.to_path().unwrap();
        assert!(path.is_closed(0.0));
        assert!(path.signed_area() > 0.0);
    }

    #[test]
    fn short_hooked_stroke_does_not_fold_back() {
        let style = StyleConfig::default();
        for length in [8.0, style.turn_size] {
            let s = stroke(
                StrokeKind::Straight,
                StartJoint::Free,
                EndJoint::TurnLeft,
                &[(100.0, 20.0), (100.0, 20.0 + length)],
            );
            let outline = assemble(&s, &style).unwrap();
            let first = outline.body_left.first().unwrap().point;
            let last = outline.body_left.last().unwrap().point;
            assert!(close(first, Point::new(102.5, 20.0)));
            assert!(last.y > first.y, "body runs backwards: {first:?} -> {last:?}");
            let path = outline.to_path().unwrap();
            assert!(path.is_closed(0.0));
            assert!(path.signed_area() > 0.0);
        }
    }

    #[test]
    fn tapered_start_narrows() {
        let style = StyleConfig {
            taper_ratio: 0.0,
            ..StyleConfig::for_width(10.0)
        };
        let s = stroke(
            StrokeKind::Straight,
            StartJoint::Thin,
            EndJoint::Free,
            &[(0.0, 0.0), (100.0, 0.0)],
        );
        let outline = assemble(&s, &style).unwrap();
        assert!(!outline.start_fusible);
        assert!(close(outline.body_left.first().unwrap().point, Point::new(0.0, 0.0)));
        assert!(close(outline.body_left.last().unwrap().point, Point::new(100.0, -5.0)));
        assert!(outline.to_path().unwrap().signed_area() > 0.0);
    }

    #[test]
    fn pen_angle_slants_ends() {
        let style = StyleConfig {
            pen_angle: Some(90.0),
            ..StyleConfig::for_width(10.0)
        };
        let s = stroke(
            StrokeKind::Straight,
            StartJoint::Free,
            EndJoint::Free,
            &[(0.0, 0.0), (100.0, 100.0)],
        );
        let outline = assemble(&s, &style).unwrap();
        let start = outline.body_left.first().unwrap().point;
        assert!(close(start, Point::new(0.0, -5.0)));
    }

    #[test]
    fn degenerate_stroke_is_error() {
        let s = stroke(
            StrokeKind::Straight,
            StartJoint::Free,
            EndJoint::Free,
            &[(10.0, 10.0), (10.0, 10.0)],
        );
        assert_eq!(
            assemble(&s, &StyleConfig::default()),
            Err(OutlineError::DegenerateVector)
        );
    }
}
