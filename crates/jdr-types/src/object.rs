use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flowframe::FlowFrame;
use crate::geom::{Point, Transform};
use crate::paint::Paint;
use crate::segment::Segment;
use crate::style::{BasicStyle, PathStyle};
use crate::text::Text;

/// An ordered list of segments with paints and a stroke.
///
/// A path always has at least one segment, and each segment starts where
/// the previous one ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub closed: bool,
    pub segments: Vec<Segment>,
    pub line_paint: Paint,
    pub fill_paint: Paint,
    pub style: PathStyle,
    /// Strictly increasing indices of segments whose end point is anchored.
    pub anchors: Vec<u32>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            closed: false,
            segments,
            line_paint: Paint::BLACK,
            fill_paint: Paint::Transparent,
            style: PathStyle::Basic(BasicStyle::default()),
            anchors: Vec::new(),
        }
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Polyline through `points`; `None` with fewer than two points.
    pub fn polyline(points: &[Point]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let segments = points
            .windows(2)
            .map(|w| Segment::line(w[0], w[1]))
            .collect();
        Some(Self::new(segments))
    }

    /// The logical origin: the first segment's start point.
    pub fn origin(&self) -> Option<Point> {
        self.segments.first().map(Segment::start)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A path mirrored in a line of symmetry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymmetricPath {
    /// The half that is drawn explicitly.
    pub path: Path,
    pub line_start: Point,
    pub line_end: Point,
    /// Whether the path's start is anchored to the line of symmetry.
    pub anchored: bool,
    /// Partial segment joining the half to its reflection.
    pub join: Option<Segment>,
}

impl SymmetricPath {
    /// The equivalent plain path: the half, the join, then the reflected
    /// half traversed backwards.
    pub fn to_full_path(&self) -> Path {
        let (a, b) = (self.line_start, self.line_end);
        let mut segments: Vec<Segment> = self.path.segments.clone();
        if let Some(join) = self.join {
            segments.push(join.to_full());
        }
        let mirrored = self
            .path
            .segments
            .iter()
            .rev()
            .map(|s| s.reversed().map_points(|p| p.reflect(a, b)).to_full());
        let mut last_end = segments.last().map(Segment::end);
        for seg in mirrored {
            // Stitch the reflection onto the end of the join.
            let seg = match last_end {
                Some(end) if end != seg.start() => {
                    let gap = Segment::line(end, seg.start());
                    segments.push(gap);
                    seg
                }
                _ => seg,
            };
            last_end = Some(seg.end());
            segments.push(seg);
        }
        Path {
            closed: self.path.closed,
            segments,
            line_paint: self.path.line_paint.clone(),
            fill_paint: self.path.fill_paint.clone(),
            style: self.path.style.clone(),
            anchors: Vec::new(),
        }
    }
}

/// A placed raster image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bitmap {
    pub filename: String,
    /// File name used in the LaTeX export, when it differs.
    pub latex_filename: Option<String>,
    pub latex_command: String,
    pub transform: Transform,
}

impl Bitmap {
    pub const DEFAULT_COMMAND: &'static str = "\\includegraphics";

    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            latex_filename: None,
            latex_command: Self::DEFAULT_COMMAND.into(),
            transform: Transform::IDENTITY,
        }
    }
}

/// Replication rule of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PatternKind {
    Rotational { angle: f64 },
    Scaled { scale_x: f64, scale_y: f64 },
    Spiral { angle: f64, distance: f64 },
}

/// A shape replicated around an anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    /// Path, text path or symmetric path being replicated.
    pub underlying: Box<ObjectBody>,
    pub anchor: Point,
    pub adjust: Option<Point>,
    /// Number of replicas; at least one.
    pub replicas: i32,
    pub single_path: bool,
    pub show_original: bool,
}

/// A group of objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Group {
    pub objects: Vec<CompleteObject>,
}

impl Group {
    pub fn new(objects: Vec<CompleteObject>) -> Self {
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total number of objects in the tree below this group.
    pub fn deep_count(&self) -> usize {
        self.objects
            .iter()
            .map(|o| match &o.body {
                ObjectBody::Group(g) => 1 + g.deep_count(),
                _ => 1,
            })
            .sum()
    }
}

/// The drawable part of an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectBody {
    Group(Group),
    Path(Path),
    Bitmap(Bitmap),
    Text(Text),
    /// A path whose style is [`PathStyle::TextPath`].
    TextPath(Path),
    Symmetric(SymmetricPath),
    Pattern(Pattern),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Group,
    Path,
    Bitmap,
    Text,
    TextPath,
    Symmetric,
    RotationalPattern,
    ScaledPattern,
    SpiralPattern,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Group => "group",
            Self::Path => "path",
            Self::Bitmap => "bitmap",
            Self::Text => "text",
            Self::TextPath => "text path",
            Self::Symmetric => "symmetric path",
            Self::RotationalPattern => "rotational pattern",
            Self::ScaledPattern => "scaled pattern",
            Self::SpiralPattern => "spiral pattern",
        };
        f.write_str(name)
    }
}

impl ObjectBody {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Group(_) => ObjectKind::Group,
            Self::Path(_) => ObjectKind::Path,
            Self::Bitmap(_) => ObjectKind::Bitmap,
            Self::Text(_) => ObjectKind::Text,
            Self::TextPath(_) => ObjectKind::TextPath,
            Self::Symmetric(_) => ObjectKind::Symmetric,
            Self::Pattern(p) => match p.kind {
                PatternKind::Rotational { .. } => ObjectKind::RotationalPattern,
                PatternKind::Scaled { .. } => ObjectKind::ScaledPattern,
                PatternKind::Spiral { .. } => ObjectKind::SpiralPattern,
            },
        }
    }

    /// Shapes that can be replicated by a pattern.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Path(_) | Self::TextPath(_) | Self::Symmetric(_))
    }

    pub fn is_empty_group(&self) -> bool {
        matches!(self, Self::Group(g) if g.is_empty())
    }
}

/// A top-level drawable object with its layout and annotation metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompleteObject {
    pub body: ObjectBody,
    pub flow_frame: Option<FlowFrame>,
    pub description: String,
    pub tag: String,
}

impl CompleteObject {
    pub fn new(body: ObjectBody) -> Self {
        Self {
            body,
            flow_frame: None,
            description: String::new(),
            tag: String::new(),
        }
    }

    pub fn group(objects: Vec<CompleteObject>) -> Self {
        Self::new(ObjectBody::Group(Group::new(objects)))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_flow_frame(mut self, frame: FlowFrame) -> Self {
        self.flow_frame = Some(frame);
        self
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.body {
            ObjectBody::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl From<Path> for CompleteObject {
    fn from(path: Path) -> Self {
        Self::new(ObjectBody::Path(path))
    }
}

impl From<Text> for CompleteObject {
    fn from(text: Text) -> Self {
        Self::new(ObjectBody::Text(text))
    }
}

impl From<Bitmap> for CompleteObject {
    fn from(bitmap: Bitmap) -> Self {
        Self::new(ObjectBody::Bitmap(bitmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn polyline_needs_two_points() {
        assert!(Path::polyline(&[p(0.0, 0.0)]).is_none());
        let path = Path::polyline(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.origin(), Some(p(0.0, 0.0)));
    }

    #[test]
    fn symmetric_full_path_mirrors_half() {
        // Half: (1,0) -> (1,2) mirrored in the y axis, joined across the top.
        let half = Path::new(vec![Segment::line(p(1.0, 0.0), p(1.0, 2.0))]);
        let sym = SymmetricPath {
            path: half,
            line_start: p(0.0, 0.0),
            line_end: p(0.0, 10.0),
            anchored: false,
            join: Some(Segment::PartialLine(crate::segment::LineSpan::new(
                p(1.0, 2.0),
                p(-1.0, 2.0),
            ))),
        };
        let full = sym.to_full_path();
        assert_eq!(full.segments.len(), 3);
        assert_eq!(full.segments[1], Segment::line(p(1.0, 2.0), p(-1.0, 2.0)));
        assert_eq!(full.segments[2], Segment::line(p(-1.0, 2.0), p(-1.0, 0.0)));
    }

    #[test]
    fn symmetric_without_join_bridges_gap() {
        let half = Path::new(vec![Segment::line(p(1.0, 0.0), p(2.0, 1.0))]);
        let sym = SymmetricPath {
            path: half,
            line_start: p(0.0, 0.0),
            line_end: p(0.0, 1.0),
            anchored: true,
            join: None,
        };
        let full = sym.to_full_path();
        // half, bridge to the mirror image, mirrored half
        assert_eq!(full.segments.len(), 3);
        assert_eq!(full.segments[1], Segment::line(p(2.0, 1.0), p(-2.0, 1.0)));
        assert_eq!(full.segments[2].end(), p(-1.0, 0.0));
    }

    #[test]
    fn deep_count_and_empty_groups() {
        let inner = CompleteObject::group(vec![]);
        assert!(inner.body.is_empty_group());
        let path: CompleteObject = Path::polyline(&[p(0.0, 0.0), p(1.0, 1.0)]).unwrap().into();
        let root = Group::new(vec![inner, CompleteObject::group(vec![path])]);
        assert_eq!(root.deep_count(), 3);
    }

    #[test]
    fn pattern_kinds() {
        let shape = ObjectBody::Path(Path::polyline(&[p(0.0, 0.0), p(1.0, 1.0)]).unwrap());
        assert!(shape.is_shape());
        let pattern = ObjectBody::Pattern(Pattern {
            kind: PatternKind::Spiral {
                angle: 0.5,
                distance: 2.0,
            },
            underlying: Box::new(shape),
            anchor: p(0.0, 0.0),
            adjust: None,
            replicas: 3,
            single_path: false,
            show_original: true,
        });
        assert_eq!(pattern.kind(), ObjectKind::SpiralPattern);
        assert!(!pattern.is_shape());
    }
}
