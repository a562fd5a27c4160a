//! Document model for JDR/AJR drawings.
//!
//! This crate holds the strongly-typed values that the `jdr-io` codecs
//! read and write: versions and their feature thresholds, units, geometry,
//! paints, path segments, path styles, grids, flow frames, the object tree
//! and the canvas settings that may accompany it.
//!
//! # Key Types
//!
//! - [`JdrVersion`] — One of the thirteen file format versions (1.0–2.2)
//! - [`Feature`] — A version-gated capability and its minimum version
//! - [`Paint`] — Solid colours, gradients and transparency
//! - [`Segment`] — One segment of a path
//! - [`CompleteObject`] — A drawable object with its layout and annotation metadata
//! - [`CanvasSettings`] — Grid, paper, storage unit and LaTeX configuration

pub mod error;
pub mod feature;
pub mod flowframe;
pub mod geom;
pub mod grid;
pub mod object;
pub mod paint;
pub mod segment;
pub mod settings;
pub mod style;
pub mod text;
pub mod unit;
pub mod version;

pub use error::{TypeError, TypeResult};
pub use feature::Feature;
pub use flowframe::{FlowFrame, FrameType, FrameVAlign, ParagraphShape};
pub use geom::{Point, Shape, ShapeElement, Transform};
pub use grid::{Grid, GridKind, GridSpacing};
pub use object::{
    Bitmap, CompleteObject, Group, ObjectBody, ObjectKind, Path, Pattern, PatternKind,
    SymmetricPath,
};
pub use paint::{Cmyk, Gradient, Grey, Hsb, Paint, PaintKind, Radial, Rgb, StartLocation};
pub use segment::{BezierSpan, LineSpan, Segment, SegmentKind};
pub use settings::{CanvasSettings, LatexSettings, Paper, PaperSize, SettingsFlag, Tool};
pub use style::{
    BasicStyle, CapStyle, DashPattern, JoinStyle, Marker, PathStyle, PathStyleKind,
    TextPathStyle, WindingRule, MAX_MARKER_TYPE,
};
pub use text::{FontSeries, FontShape, FontSpec, HAlign, LatexFont, Text, TextContent, VAlign};
pub use unit::Unit;
pub use version::JdrVersion;
