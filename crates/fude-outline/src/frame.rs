//! Local coordinate frames.
//!
//! A [`LocalFrame`] places points relative to an origin and a direction:
//! local `x` runs along the direction and local `y` runs across it. With
//! glyph coordinates (y down) a positive local `y` lands on the right
//! side of the direction of travel.

use crate::types::{OutlineError, Point, Vector};

/// Rotated frame anchored at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    origin: Point,
    cos: f64,
    sin: f64,
}

impl LocalFrame {
    /// Frame at `origin` whose local x axis follows `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::DegenerateVector`] if `direction` has no
    /// length.
    pub fn new(origin: Point, direction: Vector) -> Result<Self, OutlineError> {
        let unit = direction.normalize()?;
        Ok(Self {
            origin,
            cos: unit.x,
            sin: unit.y,
        })
    }

    /// Frame at `origin` pointing toward `toward`.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::DegenerateVector`] if the points coincide.
    pub fn along(origin: Point, toward: Point) -> Result<Self, OutlineError> {
        Self::new(origin, toward - origin)
    }

    /// Same orientation, moved to a new origin.
    #[must_use]
    pub const fn at(self, origin: Point) -> Self {
        Self { origin, ..self }
    }

    /// Map local `(x, y)` into glyph coordinates.
    #[must_use]
    pub fn place(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.origin.x + self.cos.mul_add(x, -(self.sin * y)),
            self.origin.y + self.sin.mul_add(x, self.cos * y),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-10
    }

    #[test]
    fn axis_aligned_frame_offsets_across_direction() {
        let frame = LocalFrame::along(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        assert!(close(frame.place(0.0, -5.0), Point::new(0.0, -5.0)));
        assert!(close(frame.place(0.0, 5.0), Point::new(0.0, 5.0)));
        assert!(close(frame.place(10.0, 0.0), Point::new(10.0, 0.0)));
    }

    #[test]
    fn downward_frame_positive_y_is_screen_left() {
        let frame = LocalFrame::new(Point::new(50.0, 50.0), Vector::new(0.0, 1.0)).unwrap();
        assert!(close(frame.place(0.0, 10.0), Point::new(40.0, 50.0)));
        assert!(close(frame.place(3.0, 0.0), Point::new(50.0, 53.0)));
    }

    #[test]
    fn moved_frame_keeps_orientation() {
        let frame = LocalFrame::new(Point::new(0.0, 0.0), Vector::new(0.0, 2.0))
            .unwrap()
            .at(Point::new(10.0, 10.0));
        assert!(close(frame.place(1.0, 0.0), Point::new(10.0, 11.0)));
        assert!(close(frame.place(0.0, 5.0), Point::new(5.0, 10.0)));
    }

    #[test]
    fn coincident_points_have_no_frame() {
        let p = Point::new(4.0, 4.0);
        assert_eq!(
            LocalFrame::along(p, p),
            Err(OutlineError::DegenerateVector)
        );
    }

    #[test]
    fn direction_is_normalized() {
        let frame = LocalFrame::new(Point::new(0.0, 0.0), Vector::new(3.0, 4.0)).unwrap();
        assert!(close(frame.place(5.0, 0.0), Point::new(3.0, 4.0)));
    }
}
