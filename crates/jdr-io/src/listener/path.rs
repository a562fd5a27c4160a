//! Path, text-path and symmetric-path listeners, which share the path
//! payload.

use jdr_types::{
    Feature, JdrVersion, ObjectBody, ObjectKind, Path, PathStyle, Point, SymmetricPath,
};

use crate::error::{InvalidFormat, JdrError, JdrResult};
use crate::handle::{FormatReader, FormatWriter};
use crate::registry::{Listener, ObjectListener, Projection};
use crate::tag::FieldTag;

const OPEN: char = 'O';
const CLOSED: char = 'C';

fn wrong_variant(listener: &'static str, body: &ObjectBody) -> JdrError {
    JdrError::WrongVariant {
        listener,
        found: body.kind().to_string(),
    }
}

/// Paints, style, open/closed flag, segments and anchors.
pub(crate) fn write_path(out: &mut dyn FormatWriter, path: &Path) -> JdrResult<()> {
    let Some(origin) = path.origin() else {
        return Err(JdrError::EmptyPath);
    };
    let registries = out.registries();
    registries.paints.save(out, &path.line_paint)?;
    registries.paints.save(out, &path.fill_paint)?;
    registries.styles.save(out, &path.style)?;
    out.write_char(if path.closed { CLOSED } else { OPEN })?;
    out.write_int(path.len() as i32)?;
    if out.supports(Feature::PathStartPoint) {
        out.write_point(origin)?;
    }
    for segment in &path.segments {
        registries.segments.save(out, segment)?;
    }

    if out.supports(Feature::PathAnchors) {
        check_anchors(path)?;
        for &anchor in &path.anchors {
            out.write_int(anchor as i32)?;
        }
        out.write_int(-1)?;
    } else if !path.anchors.is_empty() {
        out.omitted("path anchors");
    }
    Ok(())
}

/// Anchors must be strictly increasing segment indices.
fn check_anchors(path: &Path) -> JdrResult<()> {
    let mut previous: Option<u32> = None;
    for &anchor in &path.anchors {
        let in_range = (anchor as usize) < path.len();
        if !in_range || previous.is_some_and(|last| anchor <= last) {
            return Err(InvalidFormat {
                tag: FieldTag::AnchorIndex,
                value: anchor.to_string(),
                location: None,
            }
            .into());
        }
        previous = Some(anchor);
    }
    Ok(())
}

pub(crate) fn read_path(inp: &mut dyn FormatReader) -> JdrResult<Path> {
    let registries = inp.registries();
    let line_paint = registries.paints.load(inp)?;
    let fill_paint = registries.paints.load(inp)?;
    let style = registries.styles.load(inp)?;
    let closed = match inp.read_char(FieldTag::PathOpenClose)? {
        OPEN => false,
        CLOSED => true,
        other => return Err(inp.invalid_value(FieldTag::PathOpenClose, other.to_string())),
    };
    let n = inp.read_int_in(FieldTag::PathSize, 1, i32::MAX)? as usize;

    let mut start = if inp.supports(Feature::PathStartPoint) {
        inp.read_point(FieldTag::Coordinate)?
    } else {
        Point::new(0.0, 0.0)
    };
    let mut segments = Vec::with_capacity(n.min(4096));
    for _ in 0..n {
        let segment = registries.segments.load(inp, start)?;
        start = segment.end();
        segments.push(segment);
    }

    let anchors = if inp.supports(Feature::PathAnchors) {
        read_anchors(inp, n)?
    } else {
        Vec::new()
    };
    Ok(Path {
        closed,
        segments,
        line_paint,
        fill_paint,
        style,
        anchors,
    })
}

/// Read the `-1` terminated anchor list.
///
/// Some files written as version 1.7 omit the list. At that version the
/// list is read under a mark, and the first impossible index rewinds the
/// stream and yields no anchors.
fn read_anchors(inp: &mut dyn FormatReader, segment_count: usize) -> JdrResult<Vec<u32>> {
    let legacy = inp.version() == JdrVersion::V1_7;
    if legacy {
        let limit = inp.session().mark_limit();
        inp.mark(limit);
    }

    let mut anchors: Vec<u32> = Vec::new();
    loop {
        let value = inp.read_int(FieldTag::AnchorIndex)?;
        if value == -1 {
            return Ok(anchors);
        }
        let valid = usize::try_from(value).is_ok_and(|i| i < segment_count)
            && anchors.last().map_or(true, |&last| (value as u32) > last);
        if valid {
            anchors.push(value as u32);
            continue;
        }
        if legacy {
            let text = inp
                .canvas()
                .message("io.anchor_bug", &[&value, &segment_count]);
            inp.warning(text);
            inp.reset()?;
            return Ok(Vec::new());
        }
        return Err(inp.invalid_value(FieldTag::AnchorIndex, value.to_string()));
    }
}

/// `P`: a plain path.
pub struct PathListener;
impl_listener!(PathListener, ObjectKind::Path, char = 'P', "path");

impl ObjectListener for PathListener {
    fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
        match body {
            ObjectBody::Path(path) => write_path(out, path),
            other => Err(wrong_variant(self.type_name(), other)),
        }
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>> {
        Ok(Some(ObjectBody::Path(read_path(inp)?)))
    }
}

/// `X`: a path whose style is the text laid along it.
pub struct TextPathListener;
impl_listener!(TextPathListener, ObjectKind::TextPath, char = 'X', "text path", since TextPath);

impl ObjectListener for TextPathListener {
    fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
        let ObjectBody::TextPath(path) = body else {
            return Err(wrong_variant(self.type_name(), body));
        };
        if !matches!(path.style, PathStyle::TextPath(_)) {
            return Err(JdrError::WrongVariant {
                listener: self.type_name(),
                found: format!("{:?} style", path.style.kind()),
            });
        }
        write_path(out, path)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>> {
        let path = read_path(inp)?;
        if !matches!(path.style, PathStyle::TextPath(_)) {
            return Err(inp.invalid_value(FieldTag::PathStyleId, format!("{:?}", path.style.kind())));
        }
        Ok(Some(ObjectBody::TextPath(path)))
    }

    fn project(&self, body: &ObjectBody, version: JdrVersion) -> Projection<ObjectBody> {
        match body {
            ObjectBody::TextPath(path) if !Feature::TextPath.is_supported_by(version) => {
                Projection::Projected(ObjectBody::Path(Path {
                    style: PathStyle::default(),
                    ..path.clone()
                }))
            }
            _ => Projection::Native,
        }
    }
}

/// `S`: half a path, the line of symmetry and the optional join.
pub struct SymmetricPathListener;
impl_listener!(SymmetricPathListener, ObjectKind::Symmetric, char = 'S', "symmetric path", since SymmetricPath);

impl ObjectListener for SymmetricPathListener {
    fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
        let ObjectBody::Symmetric(sym) = body else {
            return Err(wrong_variant(self.type_name(), body));
        };
        write_path(out, &sym.path)?;
        out.write_point(sym.line_start)?;
        out.write_point(sym.line_end)?;
        out.write_bool(sym.anchored)?;
        match &sym.join {
            Some(join) => {
                out.write_bool(true)?;
                out.registries().segments.save(out, join)
            }
            None => out.write_bool(false),
        }
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>> {
        let path = read_path(inp)?;
        let line_start = inp.read_point(FieldTag::Coordinate)?;
        let line_end = inp.read_point(FieldTag::Coordinate)?;
        let anchored = inp.read_bool(FieldTag::SymmetryAnchored)?;
        let join = if inp.read_bool(FieldTag::SymmetryJoinFlag)? {
            let start = path.segments.last().map_or(line_start, |s| s.end());
            Some(inp.registries().segments.load(inp, start)?)
        } else {
            None
        };
        Ok(Some(ObjectBody::Symmetric(SymmetricPath {
            path,
            line_start,
            line_end,
            anchored,
            join,
        })))
    }

    fn project(&self, body: &ObjectBody, version: JdrVersion) -> Projection<ObjectBody> {
        match body {
            ObjectBody::Symmetric(sym) if !Feature::SymmetricPath.is_supported_by(version) => {
                Projection::Projected(ObjectBody::Path(sym.to_full_path()))
            }
            _ => Projection::Native,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdr_types::{Segment, TextPathStyle};

    fn half() -> Path {
        Path::polyline(&[Point::new(0.0, 0.0), Point::new(5.0, 5.0)]).unwrap()
    }

    #[test]
    fn text_path_projects_to_plain_path() {
        let mut path = half();
        path.style = PathStyle::TextPath(TextPathStyle::default());
        let body = ObjectBody::TextPath(path.clone());
        let Projection::Projected(ObjectBody::Path(projected)) =
            TextPathListener.project(&body, JdrVersion::V1_4)
        else {
            panic!("expected plain path");
        };
        assert_eq!(projected.segments, path.segments);
        assert_eq!(projected.style, PathStyle::default());
        assert_eq!(TextPathListener.project(&body, JdrVersion::V1_5), Projection::Native);
    }

    #[test]
    fn symmetric_path_projects_to_full_path() {
        let sym = SymmetricPath {
            path: half(),
            line_start: Point::new(10.0, 0.0),
            line_end: Point::new(10.0, 10.0),
            anchored: false,
            join: Some(Segment::PartialLine(jdr_types::LineSpan::new(
                Point::new(5.0, 5.0),
                Point::new(10.0, 5.0),
            ))),
        };
        let body = ObjectBody::Symmetric(sym.clone());
        assert_eq!(
            SymmetricPathListener.project(&body, JdrVersion::V1_5),
            Projection::Projected(ObjectBody::Path(sym.to_full_path()))
        );
        assert_eq!(SymmetricPathListener.project(&body, JdrVersion::V1_6), Projection::Native);
    }
}
