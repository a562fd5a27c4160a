use jdr_types::{BezierSpan, Feature, JdrVersion, LineSpan, Point, Segment, SegmentKind};

use crate::error::{JdrError, JdrResult};
use crate::handle::{FormatReader, FormatWriter};
use crate::registry::{Listener, Projection, SegmentListener};
use crate::tag::FieldTag;

fn wrong_variant(listener: &'static str, segment: &Segment) -> JdrError {
    JdrError::WrongVariant {
        listener,
        found: format!("{:?}", segment.kind()),
    }
}

fn write_bezier(out: &mut dyn FormatWriter, b: &BezierSpan) -> JdrResult<()> {
    out.write_point(b.control1)?;
    out.write_point(b.control2)?;
    out.write_point(b.end)
}

fn read_bezier(inp: &mut dyn FormatReader, start: Point) -> JdrResult<BezierSpan> {
    let c1 = inp.read_point(FieldTag::Coordinate)?;
    let c2 = inp.read_point(FieldTag::Coordinate)?;
    let end = inp.read_point(FieldTag::Coordinate)?;
    Ok(BezierSpan::new(start, c1, c2, end))
}

fn read_span(inp: &mut dyn FormatReader, start: Point) -> JdrResult<LineSpan> {
    let end = inp.read_point(FieldTag::Coordinate)?;
    Ok(LineSpan::new(start, end))
}

/// Listeners whose payload is a single end point.
macro_rules! span_listener {
    ($name:ident, $variant:ident, $id:literal, $type_name:literal $(, since $feature:ident)?) => {
        pub struct $name;
        impl_listener!($name, SegmentKind::$variant, char = $id, $type_name $(, since $feature)?);

        impl SegmentListener for $name {
            fn write(&self, out: &mut dyn FormatWriter, segment: &Segment) -> JdrResult<()> {
                match segment {
                    Segment::$variant(s) => out.write_point(s.end),
                    other => Err(wrong_variant(self.type_name(), other)),
                }
            }

            fn read(&self, inp: &mut dyn FormatReader, start: Point) -> JdrResult<Segment> {
                Ok(Segment::$variant(read_span(inp, start)?))
            }

            fn project(&self, segment: &Segment, version: JdrVersion) -> Projection<Segment> {
                project_partial(segment, version)
            }
        }
    };
}

fn project_partial(segment: &Segment, version: JdrVersion) -> Projection<Segment> {
    if segment.is_partial() && !Feature::PartialSegments.is_supported_by(version) {
        Projection::Projected(segment.to_full())
    } else {
        Projection::Native
    }
}

span_listener!(MoveListener, Move, 'M', "move");
span_listener!(LineListener, Line, 'L', "line");
span_listener!(PartialMoveListener, PartialMove, 'm', "partial move", since PartialSegments);
span_listener!(PartialLineListener, PartialLine, 'l', "partial line", since PartialSegments);

/// `B`: two control points and the end point.
pub struct BezierListener;
impl_listener!(BezierListener, SegmentKind::Bezier, char = 'B', "bezier");

impl SegmentListener for BezierListener {
    fn write(&self, out: &mut dyn FormatWriter, segment: &Segment) -> JdrResult<()> {
        match segment {
            Segment::Bezier(b) => write_bezier(out, b),
            other => Err(wrong_variant(self.type_name(), other)),
        }
    }

    fn read(&self, inp: &mut dyn FormatReader, start: Point) -> JdrResult<Segment> {
        Ok(Segment::Bezier(read_bezier(inp, start)?))
    }
}

pub struct PartialBezierListener;
impl_listener!(PartialBezierListener, SegmentKind::PartialBezier, char = 'b', "partial bezier", since PartialSegments);

impl SegmentListener for PartialBezierListener {
    fn write(&self, out: &mut dyn FormatWriter, segment: &Segment) -> JdrResult<()> {
        match segment {
            Segment::PartialBezier(b) => write_bezier(out, b),
            other => Err(wrong_variant(self.type_name(), other)),
        }
    }

    fn read(&self, inp: &mut dyn FormatReader, start: Point) -> JdrResult<Segment> {
        Ok(Segment::PartialBezier(read_bezier(inp, start)?))
    }

    fn project(&self, segment: &Segment, version: JdrVersion) -> Projection<Segment> {
        project_partial(segment, version)
    }
}

/// `Z`: a move that closes the preceding sub-path.
///
/// The discriminator exists from 1.6 but the semantics only from 2.1;
/// files in between load it as a plain move.
pub struct ClosingMoveListener;
impl_listener!(ClosingMoveListener, SegmentKind::ClosingMove, char = 'Z', "closing move", since ClosingMoveId);

impl SegmentListener for ClosingMoveListener {
    fn write(&self, out: &mut dyn FormatWriter, segment: &Segment) -> JdrResult<()> {
        match segment {
            Segment::ClosingMove(s) => out.write_point(s.end),
            other => Err(wrong_variant(self.type_name(), other)),
        }
    }

    fn read(&self, inp: &mut dyn FormatReader, start: Point) -> JdrResult<Segment> {
        let span = read_span(inp, start)?;
        if inp.supports(Feature::ClosingMove) {
            Ok(Segment::ClosingMove(span))
        } else {
            Ok(Segment::Move(span))
        }
    }

    fn project(&self, segment: &Segment, version: JdrVersion) -> Projection<Segment> {
        match segment {
            Segment::ClosingMove(s) if !Feature::ClosingMove.is_supported_by(version) => {
                Projection::Projected(Segment::Move(*s))
            }
            _ => Projection::Native,
        }
    }
}
