use jdr_types::{Feature, JdrVersion, Point, Segment, SegmentKind};

use crate::error::JdrResult;
use crate::handle::{FormatReader, FormatWriter};
use crate::listener::segment as listeners;
use crate::registry::{Listener, Projection, Registry};
use crate::tag::FieldTag;

/// Codec for one segment variant.
///
/// A segment's start point is not part of its payload: it is the end of the
/// previous segment, or an explicit point written by the registry for
/// versions before 1.3.
pub trait SegmentListener: Listener<Id = char, Kind = SegmentKind> {
    fn write(&self, out: &mut dyn FormatWriter, segment: &Segment) -> JdrResult<()>;
    fn read(&self, inp: &mut dyn FormatReader, start: Point) -> JdrResult<Segment>;

    fn project(&self, _segment: &Segment, _version: JdrVersion) -> Projection<Segment> {
        Projection::Native
    }
}

pub(crate) fn standard() -> Registry<dyn SegmentListener> {
    let mut registry: Registry<dyn SegmentListener> = Registry::new();
    registry.register(Box::new(listeners::MoveListener));
    registry.register(Box::new(listeners::LineListener));
    registry.register(Box::new(listeners::BezierListener));
    registry.register(Box::new(listeners::ClosingMoveListener));
    registry.register(Box::new(listeners::PartialMoveListener));
    registry.register(Box::new(listeners::PartialLineListener));
    registry.register(Box::new(listeners::PartialBezierListener));
    registry
}

impl Registry<dyn SegmentListener> {
    pub fn save(&self, out: &mut dyn FormatWriter, segment: &Segment) -> JdrResult<()> {
        let listener = self.listener_for(segment.kind())?;
        let version = out.version();
        if let Projection::Projected(projected) = listener.project(segment, version) {
            self.warn_projection(&*out, listener, projected.kind());
            return self.save(out, &projected);
        }
        out.write_char(listener.id(version))?;
        if !out.supports(Feature::PathStartPoint) {
            out.write_point(segment.start())?;
        }
        listener.write(out, segment)
    }

    /// Load a segment that starts at `start` (ignored before 1.3).
    pub fn load(&self, inp: &mut dyn FormatReader, start: Point) -> JdrResult<Segment> {
        let id = inp.read_char(FieldTag::SegmentId)?;
        let listener = self.resolve(&*inp, id, FieldTag::SegmentId)?;
        let start = if inp.supports(Feature::PathStartPoint) {
            start
        } else {
            inp.read_point(FieldTag::Coordinate)?
        };
        listener.read(inp, start)
    }
}
