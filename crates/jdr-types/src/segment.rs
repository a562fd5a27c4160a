use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Straight span between two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: Point,
    pub end: Point,
}

impl LineSpan {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Cubic bezier span.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BezierSpan {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl BezierSpan {
    pub const fn new(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }
}

/// One segment of a path.
///
/// Partial segments only occur as the join of a symmetric path, where the
/// segment meets the line of symmetry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    /// Invisible gap.
    Move(LineSpan),
    Line(LineSpan),
    Bezier(BezierSpan),
    /// A gap that also closes the preceding sub-path.
    ClosingMove(LineSpan),
    PartialMove(LineSpan),
    PartialLine(LineSpan),
    PartialBezier(BezierSpan),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Move,
    Line,
    Bezier,
    ClosingMove,
    PartialMove,
    PartialLine,
    PartialBezier,
}

impl Segment {
    pub fn line(start: Point, end: Point) -> Self {
        Self::Line(LineSpan::new(start, end))
    }

    pub fn gap(start: Point, end: Point) -> Self {
        Self::Move(LineSpan::new(start, end))
    }

    pub fn bezier(start: Point, c1: Point, c2: Point, end: Point) -> Self {
        Self::Bezier(BezierSpan::new(start, c1, c2, end))
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Move(_) => SegmentKind::Move,
            Self::Line(_) => SegmentKind::Line,
            Self::Bezier(_) => SegmentKind::Bezier,
            Self::ClosingMove(_) => SegmentKind::ClosingMove,
            Self::PartialMove(_) => SegmentKind::PartialMove,
            Self::PartialLine(_) => SegmentKind::PartialLine,
            Self::PartialBezier(_) => SegmentKind::PartialBezier,
        }
    }

    pub fn start(&self) -> Point {
        match self {
            Self::Move(s)
            | Self::Line(s)
            | Self::ClosingMove(s)
            | Self::PartialMove(s)
            | Self::PartialLine(s) => s.start,
            Self::Bezier(b) | Self::PartialBezier(b) => b.start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Self::Move(s)
            | Self::Line(s)
            | Self::ClosingMove(s)
            | Self::PartialMove(s)
            | Self::PartialLine(s) => s.end,
            Self::Bezier(b) | Self::PartialBezier(b) => b.end,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            Self::PartialMove(_) | Self::PartialLine(_) | Self::PartialBezier(_)
        )
    }

    /// The full (non-partial) segment with the same geometry.
    pub fn to_full(self) -> Segment {
        match self {
            Self::PartialMove(s) => Self::Move(s),
            Self::PartialLine(s) => Self::Line(s),
            Self::PartialBezier(b) => Self::Bezier(b),
            other => other,
        }
    }

    /// The same segment traversed end to start.
    pub fn reversed(self) -> Segment {
        fn flip(s: LineSpan) -> LineSpan {
            LineSpan::new(s.end, s.start)
        }
        fn flip_bezier(b: BezierSpan) -> BezierSpan {
            BezierSpan::new(b.end, b.control2, b.control1, b.start)
        }
        match self {
            Self::Move(s) => Self::Move(flip(s)),
            Self::Line(s) => Self::Line(flip(s)),
            Self::Bezier(b) => Self::Bezier(flip_bezier(b)),
            Self::ClosingMove(s) => Self::ClosingMove(flip(s)),
            Self::PartialMove(s) => Self::PartialMove(flip(s)),
            Self::PartialLine(s) => Self::PartialLine(flip(s)),
            Self::PartialBezier(b) => Self::PartialBezier(flip_bezier(b)),
        }
    }

    /// Apply `f` to every point of the segment.
    pub fn map_points(self, f: impl Fn(Point) -> Point) -> Segment {
        let line = |s: LineSpan| LineSpan::new(f(s.start), f(s.end));
        let bez =
            |b: BezierSpan| BezierSpan::new(f(b.start), f(b.control1), f(b.control2), f(b.end));
        match self {
            Self::Move(s) => Self::Move(line(s)),
            Self::Line(s) => Self::Line(line(s)),
            Self::Bezier(b) => Self::Bezier(bez(b)),
            Self::ClosingMove(s) => Self::ClosingMove(line(s)),
            Self::PartialMove(s) => Self::PartialMove(line(s)),
            Self::PartialLine(s) => Self::PartialLine(line(s)),
            Self::PartialBezier(b) => Self::PartialBezier(bez(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn endpoints() {
        let s = Segment::bezier(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0), p(3.0, 3.0));
        assert_eq!(s.start(), p(0.0, 0.0));
        assert_eq!(s.end(), p(3.0, 3.0));
        assert_eq!(s.kind(), SegmentKind::Bezier);
    }

    #[test]
    fn reversing_bezier_swaps_controls() {
        let s = Segment::bezier(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0), p(3.0, 3.0));
        match s.reversed() {
            Segment::Bezier(b) => {
                assert_eq!(b.start, p(3.0, 3.0));
                assert_eq!(b.control1, p(2.0, 1.0));
                assert_eq!(b.control2, p(1.0, 0.0));
                assert_eq!(b.end, p(0.0, 0.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn partial_to_full() {
        let s = Segment::PartialLine(LineSpan::new(p(0.0, 0.0), p(1.0, 1.0)));
        assert!(s.is_partial());
        assert_eq!(s.to_full(), Segment::line(p(0.0, 0.0), p(1.0, 1.0)));
        assert!(!s.to_full().is_partial());
    }

    #[test]
    fn map_points_translates() {
        let s = Segment::line(p(0.0, 0.0), p(1.0, 2.0));
        let moved = s.map_points(|q| p(q.x + 1.0, q.y));
        assert_eq!(moved, Segment::line(p(1.0, 0.0), p(2.0, 2.0)));
    }
}
