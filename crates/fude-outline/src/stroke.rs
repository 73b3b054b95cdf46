//! Stroke descriptors and centerline skeletons.
//!
//! A stroke is described by a geometry kind, a start joint, an end joint
//! and two to four control points. [`StrokeDescriptor::skeleton`] turns
//! that description into the centerline segments the outline assembler
//! thickens, including synthetic bend turn points, corner extensions and
//! hook curves.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::Curve;
use crate::frame::LocalFrame;
use crate::path::Path;
use crate::types::{OutlineError, Point, StyleConfig};

/// Centerline geometry of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeKind {
    /// One line segment.
    Straight,
    /// One quadratic curve.
    Curve,
    /// Two lines joined by a small rounded corner.
    Bending,
    /// Two lines joined by a wide rounded sweep.
    BendingRound,
    /// One cubic curve.
    Bezier,
    /// A line followed by a quadratic curve.
    VCurve,
}

impl StrokeKind {
    /// Decode a stroke kind code. Only the last two digits are
    /// significant; `12` is an alternative code for [`StrokeKind::Curve`].
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::UnknownStrokeKind`] for unsupported codes,
    /// including `0` (transforms) and `99` (component references).
    pub fn from_code(code: u16) -> Result<Self, OutlineError> {
        match code % 100 {
            1 => Ok(Self::Straight),
            2 | 12 => Ok(Self::Curve),
            3 => Ok(Self::Bending),
            4 => Ok(Self::BendingRound),
            6 => Ok(Self::Bezier),
            7 => Ok(Self::VCurve),
            _ => Err(OutlineError::UnknownStrokeKind(code)),
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Straight => 1,
            Self::Curve => 2,
            Self::Bending => 3,
            Self::BendingRound => 4,
            Self::Bezier => 6,
            Self::VCurve => 7,
        }
    }

    /// Number of control points a stroke of this kind carries.
    #[must_use]
    pub const fn point_count(self) -> usize {
        match self {
            Self::Straight => 2,
            Self::Curve | Self::Bending | Self::BendingRound => 3,
            Self::Bezier | Self::VCurve => 4,
        }
    }
}

/// How a stroke begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartJoint {
    Free,
    ConnectingH,
    UpperLeftCorner,
    UpperRightCorner,
    ConnectingV,
    Thin,
    RoofedThin,
    /// A code this crate does not shape; treated like [`StartJoint::Free`].
    Other(u16),
}

impl StartJoint {
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Free,
            2 => Self::ConnectingH,
            12 => Self::UpperLeftCorner,
            22 => Self::UpperRightCorner,
            32 => Self::ConnectingV,
            7 => Self::Thin,
            27 => Self::RoofedThin,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Free => 0,
            Self::ConnectingH => 2,
            Self::UpperLeftCorner => 12,
            Self::UpperRightCorner => 22,
            Self::ConnectingV => 32,
            Self::Thin => 7,
            Self::RoofedThin => 27,
            Self::Other(code) => code,
        }
    }

    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(self, Self::UpperLeftCorner | Self::UpperRightCorner)
    }

    #[must_use]
    pub const fn is_tapered(self) -> bool {
        matches!(self, Self::Thin | Self::RoofedThin)
    }

    /// `true` if the start carries no head shaping and may be fused with
    /// another stroke's end.
    #[must_use]
    pub const fn is_fusible(self) -> bool {
        !self.is_tapered()
    }
}

/// How a stroke ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndJoint {
    Free,
    ConnectingH,
    ConnectingV,
    LowerLeftCorner,
    LowerRightCorner,
    LowerLeftZhOld,
    LowerLeftZhNew,
    TurnLeft,
    LowerRightHt,
    TurnUpwards,
    Stop,
    LeftSweep,
    /// A code this crate does not shape; treated like [`EndJoint::Free`].
    Other(u16),
}

impl EndJoint {
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Free,
            2 => Self::ConnectingH,
            32 => Self::ConnectingV,
            13 => Self::LowerLeftCorner,
            23 => Self::LowerRightCorner,
            313 => Self::LowerLeftZhOld,
            413 => Self::LowerLeftZhNew,
            4 => Self::TurnLeft,
            24 => Self::LowerRightHt,
            5 => Self::TurnUpwards,
            8 => Self::Stop,
            7 => Self::LeftSweep,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Free => 0,
            Self::ConnectingH => 2,
            Self::ConnectingV => 32,
            Self::LowerLeftCorner => 13,
            Self::LowerRightCorner => 23,
            Self::LowerLeftZhOld => 313,
            Self::LowerLeftZhNew => 413,
            Self::TurnLeft => 4,
            Self::LowerRightHt => 24,
            Self::TurnUpwards => 5,
            Self::Stop => 8,
            Self::LeftSweep => 7,
            Self::Other(code) => code,
        }
    }

    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::LowerLeftCorner
                | Self::LowerRightCorner
                | Self::LowerLeftZhOld
                | Self::LowerLeftZhNew
        )
    }

    #[must_use]
    pub const fn is_hook(self) -> bool {
        matches!(self, Self::TurnLeft | Self::TurnUpwards)
    }

    #[must_use]
    pub const fn is_tapered(self) -> bool {
        matches!(self, Self::LeftSweep)
    }

    /// `true` if the end carries no tail shaping and may be fused with
    /// another stroke.
    #[must_use]
    pub const fn is_fusible(self) -> bool {
        !self.is_hook() && !self.is_tapered()
    }
}

/// One stroke of a glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeDescriptor {
    pub kind: StrokeKind,
    pub start_joint: StartJoint,
    pub end_joint: EndJoint,
    /// Control points, exactly [`StrokeKind::point_count`] of them.
    pub points: Vec<Point>,
    /// Numeric fields after the control points. Carried through unchanged
    /// and not interpreted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<f64>,
}

/// Leading fields before the coordinates: kind, start code, end code.
const HEADER_FIELDS: usize = 3;

fn code_from_field(value: f64) -> Result<u16, OutlineError> {
    if value.fract() != 0.0 || !(0.0..=f64::from(u16::MAX)).contains(&value) {
        return Err(OutlineError::InvalidCode(value));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let code = value as u16;
    Ok(code)
}

impl StrokeDescriptor {
    /// Create a descriptor, checking the point count against the kind.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::MissingFields`] if `points` does not hold
    /// exactly [`StrokeKind::point_count`] points.
    pub fn new(
        kind: StrokeKind,
        start_joint: StartJoint,
        end_joint: EndJoint,
        points: Vec<Point>,
    ) -> Result<Self, OutlineError> {
        if points.len() != kind.point_count() {
            return Err(OutlineError::MissingFields {
                kind: kind.code(),
                expected: HEADER_FIELDS + 2 * kind.point_count(),
                actual: HEADER_FIELDS + 2 * points.len(),
            });
        }
        Ok(Self {
            kind,
            start_joint,
            end_joint,
            points,
            extra: Vec::new(),
        })
    }

    /// Decode a numeric stroke record: kind, start joint, end joint, then
    /// `x, y` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::UnknownStrokeKind`] for unsupported kinds,
    /// [`OutlineError::InvalidCode`] for non-integer codes and
    /// [`OutlineError::MissingFields`] if the record is too short.
    pub fn from_fields(fields: &[f64]) -> Result<Self, OutlineError> {
        let Some(&kind_field) = fields.first() else {
            return Err(OutlineError::MissingFields {
                kind: 0,
                expected: HEADER_FIELDS,
                actual: 0,
            });
        };
        let kind_code = code_from_field(kind_field)?;
        let kind = StrokeKind::from_code(kind_code)?;
        let expected = HEADER_FIELDS + 2 * kind.point_count();
        if fields.len() < expected {
            return Err(OutlineError::MissingFields {
                kind: kind_code,
                expected,
                actual: fields.len(),
            });
        }
        let start_joint = StartJoint::from_code(code_from_field(fields[1])?);
        let end_joint = EndJoint::from_code(code_from_field(fields[2])?);
        let points = fields[HEADER_FIELDS..expected]
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect();
        Ok(Self {
            kind,
            start_joint,
            end_joint,
            points,
            extra: fields[expected..].to_vec(),
        })
    }

    /// First centerline control point, `None` when `points` is empty.
    #[must_use]
    pub fn start_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Build the centerline skeleton for this stroke.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::MissingFields`] if the point count does not
    /// match the kind (possible when fields were set directly), and
    /// [`OutlineError::DegenerateVector`] if a hook end has no direction.
    pub fn skeleton(&self, style: &StyleConfig) -> Result<Skeleton, OutlineError> {
        if self.points.len() != self.kind.point_count() {
            return Err(OutlineError::MissingFields {
                kind: self.kind.code(),
                expected: HEADER_FIELDS + 2 * self.kind.point_count(),
                actual: HEADER_FIELDS + 2 * self.points.len(),
            });
        }
        let p = &self.points;
        let mut body = match self.kind {
            StrokeKind::Straight => vec![Curve::Line([p[0], p[1]])],
            StrokeKind::Curve => vec![Curve::Quad([p[0], p[1], p[2]])],
            StrokeKind::Bending | StrokeKind::BendingRound => {
                let multiplier = if self.kind == StrokeKind::Bending {
                    style.bend_amount
                } else {
                    style.round_bend_amount
                };
                let amount = style.turn_size * multiplier;
                let (t1, t2) = turn_points(p[0], p[1], p[2], amount);
                vec![
                    Curve::Line([p[0], t1]),
                    Curve::Quad([t1, p[1], t2]),
                    Curve::Line([t2, p[2]]),
                ]
            }
            StrokeKind::Bezier => vec![Curve::Cubic([p[0], p[1], p[2], p[3]])],
            StrokeKind::VCurve => vec![
                Curve::Line([p[0], p[1]]),
                Curve::Quad([p[1], p[2], p[3]]),
            ],
        };
        body.retain(|segment| !segment.is_degenerate());

        let extension = style.corner_extension * style.width;
        if self.start_joint.is_corner()
            && let Some(Curve::Line(line)) = body.first_mut()
        {
            line[0] = line[0].move_towards(line[1], -extension);
        }
        if self.end_joint.is_corner()
            && let Some(Curve::Line(line)) = body.last_mut()
        {
            line[1] = line[1].move_towards(line[0], -extension);
        }

        let hook = if self.end_joint.is_hook() {
            match body.last_mut() {
                Some(last) => Some(build_hook(last, self.end_joint, style)?),
                None => None,
            }
        } else {
            None
        };

        debug!(
            kind = ?self.kind,
            segments = body.len(),
            hook = hook.is_some(),
            "built stroke skeleton"
        );
        Ok(Skeleton { body, hook })
    }
}

/// Points `amount` from `vertex` toward each neighbor, without passing
/// the neighbor.
fn turn_points(start: Point, vertex: Point, end: Point, amount: f64) -> (Point, Point) {
    let t1 = vertex.move_towards(start, amount.min(vertex.distance(start)));
    let t2 = vertex.move_towards(end, amount.min(vertex.distance(end)));
    (t1, t2)
}

/// Retract `last` by the turn size and return the hook curve that
/// replaces the retracted length.
///
/// The retraction never exceeds half the segment's chord, so a stroke
/// shorter than the turn size keeps a forward-running body.
fn build_hook(
    last: &mut Curve,
    joint: EndJoint,
    style: &StyleConfig,
) -> Result<Curve, OutlineError> {
    let end = last.end();
    let direction = last.end_tangent()?;
    let retraction = style.turn_size.min(0.5 * last.start().distance(end));
    if retraction < style.turn_size {
        debug!(retraction, turn_size = style.turn_size, "short hooked segment; hook shortened");
    }
    let retracted = end - direction * retraction;
    last.set_end(retracted);

    let reach = style.hook_ratio * style.turn_size;
    let frame = LocalFrame::new(end, direction)?;
    let tip = if joint == EndJoint::TurnUpwards {
        frame.place(0.0, -reach)
    } else {
        frame.place(0.0, reach)
    };
    Ok(Curve::Quad([retracted, end, tip]))
}

/// Centerline segments of one stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    /// Body segments in drawing order, each starting where the previous
    /// one ends.
    pub body: Vec<Curve>,
    /// Terminal hook, starting where the body ends.
    pub hook: Option<Curve>,
}

impl Skeleton {
    /// The whole centerline, hook included, as one path.
    #[must_use]
    pub fn to_path(&self) -> Path {
        let mut curves = self.body.clone();
        curves.extend(self.hook);
        Path::new(curves)
    }
}
