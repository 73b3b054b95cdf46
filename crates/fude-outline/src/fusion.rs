//! Joint fusion: merge stroke outlines that meet at a shared endpoint.
//!
//! Two outlines are reoriented so the first ends and the second starts at
//! the shared point. The boundary lines arriving at the joint are then
//! intersected to form mitered corners, the caps at the joint are
//! dropped, and the bodies are spliced into one closed loop.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assemble::{StrokeOutline, merge_paths};
use crate::types::{BoundaryPath, OutlineError, Point, Vector};

/// Cross products below this fraction of the direction magnitudes count
/// as parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// A half-line through the last two points of a boundary run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The boundary point at the joint.
    pub origin: Point,
    /// Direction of travel arriving at `origin`.
    pub direction: Vector,
}

impl Ray {
    #[must_use]
    pub const fn new(origin: Point, direction: Vector) -> Self {
        Self { origin, direction }
    }

    /// Ray arriving at the last point of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::UnclosedSubPath`] if `path` has fewer than
    /// two points.
    pub fn at_end(path: &BoundaryPath) -> Result<Self, OutlineError> {
        match path.points() {
            [.., before, last] => Ok(Self::new(last.point, last.point - before.point)),
            _ => Err(OutlineError::UnclosedSubPath(path.to_string())),
        }
    }

    /// Ray arriving at the first point of `path` when walked backwards.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::UnclosedSubPath`] if `path` has fewer than
    /// two points.
    pub fn at_start(path: &BoundaryPath) -> Result<Self, OutlineError> {
        match path.points() {
            [first, after, ..] => Ok(Self::new(first.point, first.point - after.point)),
            _ => Err(OutlineError::UnclosedSubPath(path.to_string())),
        }
    }
}

/// Intersection of the lines through two rays.
///
/// Solves `p1 + a * d1 = p2 + b * d2`. Parallel (or zero-length)
/// directions fall back to the midpoint of the two origins.
#[must_use]
pub fn intersect(first: Ray, second: Ray) -> Point {
    let det = first.direction.cross(second.direction);
    let scale = first.direction.length() * second.direction.length();
    if det.abs() <= PARALLEL_EPSILON * scale || !det.is_finite() {
        return first.origin.midpoint(second.origin);
    }
    let a = (second.origin - first.origin).cross(second.direction) / det;
    first.origin + first.direction * a
}

/// Mitered corner of two rays meeting near `junction`.
///
/// Corners farther than `reach` from `junction` (nearly reversed
/// boundaries) are replaced by the midpoint of the two ray origins.
#[must_use]
pub fn limited_miter(incoming: Ray, outgoing: Ray, junction: Point, reach: f64) -> Point {
    let corner = intersect(incoming, outgoing);
    if corner.distance(junction) > reach {
        warn!(?junction, ?corner, reach, "miter exceeds limit; using midpoint");
        incoming.origin.midpoint(outgoing.origin)
    } else {
        corner
    }
}

/// Which endpoints two outlines share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Junction {
    StartStart,
    StartEnd,
    EndStart,
    EndEnd,
}

impl Junction {
    /// Pairings in the order they are tried.
    pub const ALL: [Self; 4] = [Self::StartStart, Self::StartEnd, Self::EndStart, Self::EndEnd];

    /// `true` if the first outline meets the joint with its start.
    #[must_use]
    pub const fn first_at_start(self) -> bool {
        matches!(self, Self::StartStart | Self::StartEnd)
    }

    /// `true` if the second outline meets the joint with its start.
    #[must_use]
    pub const fn second_at_start(self) -> bool {
        matches!(self, Self::StartStart | Self::EndStart)
    }

    fn matches(self, first: &StrokeOutline, second: &StrokeOutline, epsilon: f64) -> bool {
        let p = if self.first_at_start() { first.start } else { first.end };
        let q = if self.second_at_start() { second.start } else { second.end };
        p.approx_eq(q, epsilon)
    }

    fn is_fusible(self, first: &StrokeOutline, second: &StrokeOutline) -> bool {
        let p = if self.first_at_start() {
            first.start_fusible
        } else {
            first.end_fusible
        };
        let q = if self.second_at_start() {
            second.start_fusible
        } else {
            second.end_fusible
        };
        p && q
    }
}

/// First pairing of endpoints the two outlines share, if any.
#[must_use]
pub fn find_junction(
    first: &StrokeOutline,
    second: &StrokeOutline,
    epsilon: f64,
) -> Option<Junction> {
    Junction::ALL
        .into_iter()
        .find(|j| j.matches(first, second, epsilon))
}

/// Fuse two outlines at their shared endpoint.
///
/// Corners farther than `reach` from the joint fall back to a midpoint,
/// see [`limited_miter`].
///
/// # Errors
///
/// Returns [`OutlineError::NotConnected`] if the outlines share no
/// endpoint.
pub fn fuse(
    first: StrokeOutline,
    second: StrokeOutline,
    epsilon: f64,
    reach: f64,
) -> Result<StrokeOutline, OutlineError> {
    let junction = find_junction(&first, &second, epsilon).ok_or(OutlineError::NotConnected)?;
    fuse_at(first, second, junction, reach)
}

/// Fuse two outlines at a known junction.
///
/// The result starts where the first outline's free end is and ends where
/// the second outline's free end is.
///
/// # Errors
///
/// Returns [`OutlineError::UnclosedSubPath`] if a body run is too short
/// to define a ray or does not end on anchors.
pub fn fuse_at(
    first: StrokeOutline,
    second: StrokeOutline,
    junction: Junction,
    reach: f64,
) -> Result<StrokeOutline, OutlineError> {
    let head_connected = junction.first_at_start();
    let mut first = if head_connected {
        first.reversed()
    } else {
        first
    };
    let mut second = if junction.second_at_start() {
        second
    } else {
        second.reversed()
    };

    let joint = first.end;
    let left_corner = limited_miter(
        Ray::at_end(&first.body_left)?,
        Ray::at_start(&second.body_left)?,
        joint,
        reach,
    );
    let right_corner = limited_miter(
        Ray::at_start(&first.body_right)?,
        Ray::at_end(&second.body_right)?,
        joint,
        reach,
    );
    debug!(?junction, ?left_corner, ?right_corner, "fusing outlines");

    first.body_left.set_last(left_corner);
    second.body_left.set_first(left_corner);
    first.body_right.set_first(right_corner);
    second.body_right.set_last(right_corner);

    Ok(StrokeOutline {
        head: first.head,
        body_left: merge_paths(&[&first.body_left, &second.body_left])?,
        tail: second.tail,
        body_right: merge_paths(&[&second.body_right, &first.body_right])?,
        start: first.start,
        end: second.end,
        start_fusible: first.start_fusible,
        end_fusible: second.end_fusible,
    })
}

/// Miter the joint of an outline whose unshaped ends meet each other.
///
/// Both bodies become closed rings: `body_left` starts and ends on one
/// corner, `body_right` on the other. Outlines that are not closed this
/// way are returned unchanged.
///
/// # Errors
///
/// Returns [`OutlineError::UnclosedSubPath`] if a body run is too short
/// to define a ray.
pub fn close_ring(
    mut outline: StrokeOutline,
    epsilon: f64,
    reach: f64,
) -> Result<StrokeOutline, OutlineError> {
    let closed = outline.start.approx_eq(outline.end, epsilon)
        && outline.start_fusible
        && outline.end_fusible
        && outline.head.is_empty()
        && outline.tail.is_empty();
    if !closed {
        return Ok(outline);
    }
    let joint = outline.end;
    let left_corner = limited_miter(
        Ray::at_end(&outline.body_left)?,
        Ray::at_start(&outline.body_left)?,
        joint,
        reach,
    );
    let right_corner = limited_miter(
        Ray::at_start(&outline.body_right)?,
        Ray::at_end(&outline.body_right)?,
        joint,
        reach,
    );
    debug!(?joint, ?left_corner, ?right_corner, "closing ring outline");
    outline.body_left.set_first(left_corner);
    outline.body_left.set_last(left_corner);
    outline.body_right.set_first(right_corner);
    outline.body_right.set_last(right_corner);
    Ok(outline)
}

/// Repeatedly fuse outlines whose unshaped ends meet.
///
/// Each outline absorbs every later outline that connects to one of its
/// free ends; after each fusion the later outlines are scanned again, so
/// a chain is joined whatever order its strokes arrive in. An outline
/// whose ends finally meet is closed with [`close_ring`]. Where more than
/// two strokes share a point, the earliest pairing wins. Returns the
/// remaining outlines and the number of fusions performed.
///
/// # Errors
///
/// Propagates errors from [`fuse_at`] and [`close_ring`].
pub fn fuse_connected(
    mut outlines: Vec<StrokeOutline>,
    epsilon: f64,
    reach: f64,
) -> Result<(Vec<StrokeOutline>, usize), OutlineError> {
    let mut fusions = 0;
    let mut i = 0;
    while i < outlines.len() {
        let mut j = i + 1;
        while j < outlines.len() {
            let junction = Junction::ALL.into_iter().find(|jn| {
                jn.matches(&outlines[i], &outlines[j], epsilon)
                    && jn.is_fusible(&outlines[i], &outlines[j])
            });
            if let Some(junction) = junction {
                let second = outlines.remove(j);
                let first = std::mem::take(&mut outlines[i]);
                outlines[i] = fuse_at(first, second, junction, reach)?;
                fusions += 1;
                j = i + 1;
            } else {
                if find_junction(&outlines[i], &outlines[j], epsilon).is_some() {
                    debug!(first = i, second = j, "shared endpoint is shaped; not fusing");
                }
                j += 1;
            }
        }
        let outline = std::mem::take(&mut outlines[i]);
        outlines[i] = close_ring(outline, epsilon, reach)?;
        i += 1;
    }
    Ok((outlines, fusions))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::stroke::{EndJoint, StartJoint, StrokeDescriptor, StrokeKind};
    use crate::types::StyleConfig;

    /// Miter reach of a width-10 stroke at the default limit.
    const REACH: f64 = 5.0 * StyleConfig::DEFAULT_MITER_LIMIT;

    fn straight(x0: f64, y0: f64, x1: f64, y1: f64) -> StrokeOutline {
        let stroke = StrokeDescriptor::new(
            StrokeKind::Straight,
            StartJoint::Free,
            EndJoint::Free,
            vec![Point::new(x0, y0), Point::new(x1, y1)],
        )
        .unwrap();
        assemble(&stroke, &StyleConfig::for_width(10.0)).unwrap()
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    // --- intersect tests ---

    #[test]
    fn intersect_perpendicular_rays() {
        let a = Ray::new(Point::new(0.0, 0.0), Vector::new(1.0, 0.0));
        let b = Ray::new(Point::new(5.0, 5.0), Vector::new(0.0, 1.0));
        assert!(close(intersect(a, b), Point::new(5.0, 0.0)));
    }

    #[test]
    fn intersect_parallel_falls_back_to_midpoint() {
        let a = Ray::new(Point::new(0.0, 0.0), Vector::new(1.0, 0.0));
        let b = Ray::new(Point::new(0.0, 4.0), Vector::new(-2.0, 0.0));
        assert_eq!(intersect(a, b), Point::new(0.0, 2.0));
    }

    #[test]
    fn intersect_zero_direction_falls_back() {
        let a = Ray::new(Point::new(0.0, 0.0), Vector::new(0.0, 0.0));
        let b = Ray::new(Point::new(2.0, 2.0), Vector::new(1.0, 0.0));
        assert_eq!(intersect(a, b), Point::new(1.0, 1.0));
    }

    #[test]
    fn rays_from_boundary_runs() {
        let path = BoundaryPath::new(vec![
            crate::types::BoundaryPoint::anchor(Point::new(0.0, 0.0)),
            crate::types::BoundaryPoint::anchor(Point::new(3.0, 0.0)),
        ]);
        let end = Ray::at_end(&path).unwrap();
        let start = Ray::at_start(&path).unwrap();
        assert_eq!(end.origin, Point::new(3.0, 0.0));
        assert_eq!(end.direction, Vector::new(3.0, 0.0));
        assert_eq!(start.origin, Point::new(0.0, 0.0));
        assert_eq!(start.direction, Vector::new(-3.0, 0.0));
        assert!(Ray::at_end(&BoundaryPath::default()).is_err());
    }

    // --- junction tests ---

    #[test]
    fn junction_pairings() {
        let a = straight(0.0, 0.0, 100.0, 0.0);
        let east = straight(100.0, 0.0, 100.0, 100.0);
        let west = straight(0.0, 100.0, 0.0, 0.0);
        assert_eq!(find_junction(&a, &east, 0.0), Some(Junction::EndStart));
        assert_eq!(find_junction(&a, &west, 0.0), Some(Junction::StartEnd));
        assert_eq!(find_junction(&a, &a.clone(), 0.0), Some(Junction::StartStart));
        let far = straight(150.0, 150.0, 190.0, 190.0);
        assert_eq!(find_junction(&a, &far, 0.0), None);
    }

    // --- fuse tests ---

    #[test]
    fn fused_corner_is_mitered() {
        let a = straight(0.0, 0.0, 100.0, 0.0);
        let b = straight(100.0, 0.0, 100.0, 100.0);
        let fused = fuse(a, b, 0.0, REACH).unwrap();
        assert_eq!(fused.start, Point::new(0.0, 0.0));
        assert_eq!(fused.end, Point::new(100.0, 100.0));
        let left: Vec<Point> = fused.body_left.points().iter().map(|p| p.point).collect();
        assert_eq!(left.len(), 3);
        assert!(close(left[1], Point::new(105.0, -5.0)));
        let right: Vec<Point> = fused.body_right.points().iter().map(|p| p.point).collect();
        assert_eq!(right.len(), 3);
        assert!(close(right[1], Point::new(95.0, 5.0)));
    }

    #[test]
    fn fused_vertex_count() {
        let a = straight(0.0, 0.0, 100.0, 0.0);
        let b = straight(100.0, 0.0, 100.0, 100.0);
        let count_a = a.vertex_count().unwrap();
        let count_b = b.vertex_count().unwrap();
        let fused = fuse(a, b, 0.0, REACH).unwrap();
        assert_eq!(fused.vertex_count().unwrap(), count_a + count_b - 2);
        let path = fused.to_path().unwrap();
        assert!(path.is_closed(0.0));
        assert!(path.signed_area() > 0.0);
    }

    #[test]
    fn fuse_reorients_reversed_strokes() {
        // Both strokes end at the shared point.
        let a = straight(0.0, 0.0, 100.0, 0.0);
        let b = straight(100.0, 100.0, 100.0, 0.0);
        let fused = fuse(a, b, 0.0, REACH).unwrap();
        assert_eq!(fused.start, Point::new(0.0, 0.0));
        assert_eq!(fused.end, Point::new(100.0, 100.0));
        assert!(fused.to_path().unwrap().signed_area() > 0.0);
    }

    #[test]
    fn collinear_fusion_uses_midpoint() {
        let a = straight(0.0, 0.0, 50.0, 0.0);
        let b = straight(50.0, 0.0, 100.0, 0.0);
        let fused = fuse(a, b, 0.0, REACH).unwrap();
        let left: Vec<Point> = fused.body_left.points().iter().map(|p| p.point).collect();
        assert!(close(left[1], Point::new(50.0, -5.0)));
        let area = fused.to_path().unwrap().signed_area();
        assert!((area - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn fuse_disjoint_is_error() {
        let a = straight(0.0, 0.0, 10.0, 0.0);
        let b = straight(50.0, 50.0, 60.0, 60.0);
        assert_eq!(fuse(a, b, 0.0, REACH), Err(OutlineError::NotConnected));
    }

    #[test]
    fn fuse_connected_chains() {
        let outlines = vec![
            straight(0.0, 0.0, 100.0, 0.0),
            straight(150.0, 150.0, 190.0, 190.0),
            straight(100.0, 0.0, 100.0, 100.0),
            straight(100.0, 100.0, 0.0, 100.0),
        ];
        let (fused, count) = fuse_connected(outlines, 0.0, REACH).unwrap();
        assert_eq!(count, 2);
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].start, Point::new(0.0, 0.0));
        assert_eq!(fused[0].end, Point::new(0.0, 100.0));
    }

    #[test]
    fn sharp_fusion_corner_is_limited() {
        let joint = Point::new(100.0, 0.0);
        let unlimited = fuse(
            straight(0.0, 0.0, 100.0, 0.0),
            straight(100.0, 0.0, 0.0, 3.0),
            0.0,
            f64::INFINITY,
        )
        .unwrap();
        assert!(unlimited.body_left.points()[1].point.distance(joint) > 300.0);

        let fused = fuse(
            straight(0.0, 0.0, 100.0, 0.0),
            straight(100.0, 0.0, 0.0, 3.0),
            0.0,
            REACH,
        )
        .unwrap();
        let left = fused.body_left.points()[1].point;
        let right = fused.body_right.points()[1].point;
        assert!(left.distance(joint) <= REACH, "left corner {left:?}");
        assert!(right.distance(joint) <= REACH, "right corner {right:?}");
        assert!(fused.to_path().unwrap().is_closed(0.0));
    }

    #[test]
    fn fuse_connected_joins_chain_out_of_order() {
        let outlines = vec![
            straight(0.0, 0.0, 100.0, 0.0),
            straight(100.0, 100.0, 0.0, 100.0),
            straight(100.0, 0.0, 100.0, 100.0),
        ];
        let (fused, count) = fuse_connected(outlines, 0.0, REACH).unwrap();
        assert_eq!(count, 2);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].start, Point::new(0.0, 0.0));
        assert_eq!(fused[0].end, Point::new(0.0, 100.0));
    }

    #[test]
    fn closed_square_is_mitered_all_round() {
        let outlines = vec![
            straight(20.0, 20.0, 180.0, 20.0),
            straight(180.0, 20.0, 180.0, 180.0),
            straight(180.0, 180.0, 20.0, 180.0),
            straight(20.0, 180.0, 20.0, 20.0),
        ];
        let (fused, count) = fuse_connected(outlines, 0.0, REACH).unwrap();
        assert_eq!(count, 3);
        assert_eq!(fused.len(), 1);
        let ring = &fused[0];

        let left = ring.body_left.points();
        let right = ring.body_right.points();
        assert_eq!(left[0].point, left[left.len() - 1].point);
        assert_eq!(right[0].point, right[right.len() - 1].point);
        let corners = [left[0].point, right[0].point];
        let outer = Point::new(15.0, 185.0);
        let inner = Point::new(25.0, 175.0);
        assert!(corners.iter().any(|&c| close(c, outer)), "{corners:?}");
        assert!(corners.iter().any(|&c| close(c, inner)), "{corners:?}");

        // Outer square minus the hole.
        let area = ring.to_path().unwrap().signed_area();
        assert!((area - (170.0 * 170.0 - 150.0 * 150.0)).abs() < 1e-6, "area {area}");
    }

    #[test]
    fn close_ring_leaves_open_outline() {
        let a = straight(0.0, 0.0, 100.0, 0.0);
        assert_eq!(close_ring(a.clone(), 0.0, REACH).unwrap(), a);
    }

    #[test]
    fn fuse_connected_skips_shaped_ends() {
        let mut a = straight(0.0, 0.0, 100.0, 0.0);
        a.end_fusible = false;
        let b = straight(100.0, 0.0, 100.0, 100.0);
        let (fused, count) = fuse_connected(vec![a, b], 0.0, REACH).unwrap();
        assert_eq!(count, 0);
        assert_eq!(fused.len(), 2);
    }
}
