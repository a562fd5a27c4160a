//! The read/write contract shared by the JDR and AJR codecs.
//!
//! Listeners only ever see a `&mut dyn FormatWriter` or
//! `&mut dyn FormatReader`. Each codec supplies the primitive operations;
//! compound values (points, transforms, shapes) and range checks are
//! provided here once so both codecs agree on them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jdr_types::{Feature, JdrVersion, Point, Shape, ShapeElement, Transform, Unit};

use crate::canvas::{CanvasGraphics, Message};
use crate::config::{IoConfig, MissingBitmaps};
use crate::error::{InvalidFormat, JdrError, JdrResult, Location};
use crate::registry::Registries;
use crate::tag::FieldTag;

/// Per-stream state shared by every nested listener.
#[derive(Clone)]
pub struct Session {
    version: JdrVersion,
    registries: Arc<Registries>,
    base_path: Option<PathBuf>,
    missing_bitmaps: MissingBitmaps,
    mark_limit: usize,
    depth: usize,
}

impl Session {
    pub fn new(version: JdrVersion) -> Self {
        Self {
            version,
            registries: Registries::standard(),
            base_path: None,
            missing_bitmaps: MissingBitmaps::Keep,
            mark_limit: 1024,
            depth: 0,
        }
    }

    pub fn from_config(config: &IoConfig, version: JdrVersion) -> Self {
        Self::new(version)
            .with_missing_bitmaps(config.missing_bitmaps)
            .with_mark_limit(config.mark_limit)
    }

    pub fn with_registries(mut self, registries: Arc<Registries>) -> Self {
        self.registries = registries;
        self
    }

    /// Directory that relative bitmap filenames are resolved against.
    pub fn with_base_path(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base.into());
        self
    }

    pub fn with_missing_bitmaps(mut self, policy: MissingBitmaps) -> Self {
        self.missing_bitmaps = policy;
        self
    }

    pub fn with_mark_limit(mut self, limit: usize) -> Self {
        self.mark_limit = limit;
        self
    }

    pub fn version(&self) -> JdrVersion {
        self.version
    }

    pub fn set_version(&mut self, version: JdrVersion) {
        self.version = version;
    }

    pub fn registries(&self) -> &Arc<Registries> {
        &self.registries
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    pub fn missing_bitmaps(&self) -> MissingBitmaps {
        self.missing_bitmaps
    }

    pub fn mark_limit(&self) -> usize {
        self.mark_limit
    }

    /// Group nesting depth; 0 while the root group is being read.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_group(&mut self) {
        self.depth += 1;
    }

    pub fn leave_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Resolve `filename` against the base path.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("version", &self.version)
            .field("base_path", &self.base_path)
            .field("missing_bitmaps", &self.missing_bitmaps)
            .field("mark_limit", &self.mark_limit)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// State common to readers and writers.
pub trait FormatHandle {
    fn session(&self) -> &Session;
    fn session_mut(&mut self) -> &mut Session;
    fn canvas(&self) -> &CanvasGraphics;
    fn canvas_mut(&mut self) -> &mut CanvasGraphics;

    fn version(&self) -> JdrVersion {
        self.session().version()
    }

    fn supports(&self, feature: Feature) -> bool {
        feature.is_supported_by(self.version())
    }

    fn registries(&self) -> Arc<Registries> {
        Arc::clone(self.session().registries())
    }

    fn storage_unit(&self) -> Unit {
        self.canvas().settings.storage_unit
    }

    fn warning(&self, text: String) {
        self.canvas().publish(Message::Warning(text));
    }

    /// Warn that `what` cannot be represented at the current version.
    fn omitted(&self, what: &str) {
        let version = self.version();
        let text = self.canvas().message("io.omitted", &[&what, &version]);
        self.warning(text);
    }
}

/// Primitive and compound write operations.
pub trait FormatWriter: FormatHandle {
    fn write_int(&mut self, value: i32) -> JdrResult<()>;
    fn write_double(&mut self, value: f64) -> JdrResult<()>;
    fn write_byte(&mut self, value: u8) -> JdrResult<()>;
    fn write_bool(&mut self, value: bool) -> JdrResult<()>;
    fn write_char(&mut self, value: char) -> JdrResult<()>;
    fn write_string(&mut self, value: &str) -> JdrResult<()>;

    /// Write the format tag and version header.
    fn write_format_tag(&mut self) -> JdrResult<()>;

    fn flush(&mut self) -> JdrResult<()>;

    fn write_point(&mut self, point: Point) -> JdrResult<()> {
        self.write_double(point.x)?;
        self.write_double(point.y)
    }

    /// Before 1.8 the translation is stored in bp rather than storage units.
    fn write_transform(&mut self, transform: &Transform) -> JdrResult<()> {
        let mut m = transform.0;
        if !self.supports(Feature::UnscaledTransform) {
            let factor = self.storage_unit().to_bp();
            m[4] *= factor;
            m[5] *= factor;
        }
        for value in m {
            self.write_double(value)?;
        }
        Ok(())
    }

    fn write_shape(&mut self, shape: &Shape) -> JdrResult<()> {
        self.write_int(shape.elements.len() as i32)?;
        for element in &shape.elements {
            self.write_int(element.op())?;
            for point in element.points() {
                self.write_point(point)?;
            }
        }
        Ok(())
    }
}

/// Inclusive/exclusive bounds for a double field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleRange {
    pub min: f64,
    pub min_inclusive: bool,
    pub max: f64,
    pub max_inclusive: bool,
}

impl DoubleRange {
    /// `[0, 1]`, used by colour channels.
    pub const UNIT: DoubleRange = DoubleRange::closed(0.0, 1.0);
    /// `[0, 360)`.
    pub const HUE: DoubleRange = DoubleRange {
        min: 0.0,
        min_inclusive: true,
        max: 360.0,
        max_inclusive: false,
    };
    /// `(0, inf)`.
    pub const POSITIVE: DoubleRange = DoubleRange {
        min: 0.0,
        min_inclusive: false,
        max: f64::INFINITY,
        max_inclusive: false,
    };
    /// `[0, inf)`.
    pub const NON_NEGATIVE: DoubleRange = DoubleRange {
        min: 0.0,
        min_inclusive: true,
        max: f64::INFINITY,
        max_inclusive: false,
    };
    /// Any finite value.
    pub const FINITE: DoubleRange = DoubleRange {
        min: f64::NEG_INFINITY,
        min_inclusive: false,
        max: f64::INFINITY,
        max_inclusive: false,
    };

    pub const fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            min_inclusive: true,
            max,
            max_inclusive: true,
        }
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        let above = if self.min_inclusive {
            value >= self.min
        } else {
            value > self.min
        };
        let below = if self.max_inclusive {
            value <= self.max
        } else {
            value < self.max
        };
        above && below
    }
}

/// Primitive and compound read operations. Every read names the field it
/// reads so failures can report it.
pub trait FormatReader: FormatHandle {
    fn read_int(&mut self, tag: FieldTag) -> JdrResult<i32>;
    fn read_double(&mut self, tag: FieldTag) -> JdrResult<f64>;
    fn read_byte(&mut self, tag: FieldTag) -> JdrResult<u8>;
    fn read_bool(&mut self, tag: FieldTag) -> JdrResult<bool>;
    fn read_char(&mut self, tag: FieldTag) -> JdrResult<char>;
    fn read_string(&mut self, tag: FieldTag) -> JdrResult<String>;

    /// Read and validate the header, returning its version. The session
    /// version is updated to match.
    fn read_format_tag(&mut self) -> JdrResult<JdrVersion>;

    /// Remember the current position. At most `limit` units may be read
    /// before [`reset`](Self::reset).
    fn mark(&mut self, limit: usize);

    fn reset(&mut self) -> JdrResult<()>;

    /// Where the most recently read value started, if the codec tracks it.
    fn location(&self) -> Option<Location>;

    fn invalid_value(&self, tag: FieldTag, value: String) -> JdrError {
        JdrError::InvalidFormat(InvalidFormat {
            tag,
            value,
            location: self.location(),
        })
    }

    fn read_double_in(&mut self, tag: FieldTag, range: DoubleRange) -> JdrResult<f64> {
        let value = self.read_double(tag)?;
        if range.contains(value) {
            Ok(value)
        } else {
            Err(self.invalid_value(tag, value.to_string()))
        }
    }

    /// Read an int in `min..=max`.
    fn read_int_in(&mut self, tag: FieldTag, min: i32, max: i32) -> JdrResult<i32> {
        let value = self.read_int(tag)?;
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(self.invalid_value(tag, value.to_string()))
        }
    }

    fn read_point(&mut self, tag: FieldTag) -> JdrResult<Point> {
        let x = self.read_double_in(tag, DoubleRange::FINITE)?;
        let y = self.read_double_in(tag, DoubleRange::FINITE)?;
        Ok(Point::new(x, y))
    }

    fn read_transform(&mut self) -> JdrResult<Transform> {
        let mut m = [0.0; 6];
        for value in &mut m {
            *value = self.read_double_in(FieldTag::Transform, DoubleRange::FINITE)?;
        }
        if !self.supports(Feature::UnscaledTransform) {
            let factor = self.storage_unit().to_bp();
            m[4] /= factor;
            m[5] /= factor;
        }
        Ok(Transform(m))
    }

    fn read_shape(&mut self) -> JdrResult<Shape> {
        let n = self.read_int_in(FieldTag::ShapeSize, 0, i32::MAX)?;
        let mut elements = Vec::with_capacity((n as usize).min(1024));
        for _ in 0..n {
            let element = match self.read_int(FieldTag::ShapeOp)? {
                0 => ShapeElement::MoveTo(self.read_point(FieldTag::Coordinate)?),
                1 => ShapeElement::LineTo(self.read_point(FieldTag::Coordinate)?),
                2 => ShapeElement::QuadTo(
                    self.read_point(FieldTag::Coordinate)?,
                    self.read_point(FieldTag::Coordinate)?,
                ),
                3 => ShapeElement::CubicTo(
                    self.read_point(FieldTag::Coordinate)?,
                    self.read_point(FieldTag::Coordinate)?,
                    self.read_point(FieldTag::Coordinate)?,
                ),
                4 => ShapeElement::Close,
                op => return Err(self.invalid_value(FieldTag::ShapeOp, op.to_string())),
            };
            elements.push(element);
        }
        Ok(Shape::new(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_range_is_half_open() {
        assert!(DoubleRange::HUE.contains(0.0));
        assert!(DoubleRange::HUE.contains(359.999));
        assert!(!DoubleRange::HUE.contains(360.0));
        assert!(!DoubleRange::HUE.contains(-0.0001));
    }

    #[test]
    fn unit_range_is_closed() {
        assert!(DoubleRange::UNIT.contains(1.0));
        assert!(DoubleRange::UNIT.contains(0.0));
        assert!(!DoubleRange::UNIT.contains(-0.0001));
        assert!(!DoubleRange::UNIT.contains(f64::NAN));
    }

    #[test]
    fn positive_excludes_zero() {
        assert!(!DoubleRange::POSITIVE.contains(0.0));
        assert!(DoubleRange::POSITIVE.contains(1e-9));
        assert!(DoubleRange::NON_NEGATIVE.contains(0.0));
        assert!(!DoubleRange::FINITE.contains(f64::INFINITY));
    }

    #[test]
    fn session_resolves_relative_paths() {
        let session = Session::new(JdrVersion::V2_2).with_base_path("/drawings");
        assert_eq!(session.resolve("a.png"), PathBuf::from("/drawings/a.png"));
        assert_eq!(session.resolve("/abs/b.png"), PathBuf::from("/abs/b.png"));
    }

    #[test]
    fn session_depth_saturates() {
        let mut session = Session::new(JdrVersion::V1_0);
        session.leave_group();
        assert_eq!(session.depth(), 0);
        session.enter_group();
        assert_eq!(session.depth(), 1);
    }
}
