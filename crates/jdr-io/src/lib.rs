//! Versioned persistence for JDR drawings.
//!
//! A drawing is saved as either JDR (big-endian binary) or AJR (whitespace
//! separated text) at any of the thirteen format versions. Values the target
//! version cannot represent are projected onto an older equivalent and a
//! warning is published through the [`CanvasGraphics`] message system.
//!
//! # Layers
//!
//! - [`handle`] — The [`FormatWriter`]/[`FormatReader`] primitives and the per-file [`Session`]
//! - [`binary`] and [`text`] — The two codecs
//! - [`registry`] and [`listener`] — One listener per paint, segment, style, grid and object variant
//! - [`image`] — Header, settings, LaTeX block and root group
//! - [`document`] — [`JdrIo`], format detection and the AJR charset restart

pub mod binary;
pub mod canvas;
pub mod config;
pub mod document;
pub mod error;
pub mod handle;
pub mod image;
pub mod listener;
pub mod mark;
pub mod registry;
pub mod tag;
pub mod text;

pub use binary::{JdrReader, JdrWriter};
pub use canvas::{
    CanvasGraphics, Dictionary, Message, MessageKind, MessageLog, MessageSystem, TracingMessages,
};
pub use config::{encoding_for, IoConfig, MissingBitmaps};
pub use document::{detect_format, Format, JdrIo, SaveOptions};
pub use error::{InvalidFormat, JdrError, JdrResult, Location};
pub use handle::{DoubleRange, FormatHandle, FormatReader, FormatWriter, Session};
pub use image::{load_image, save_image, LoadedImage};
pub use registry::{Projection, Registries, Registry};
pub use tag::FieldTag;
pub use text::{AjrReader, AjrWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use jdr_types::{
        BasicStyle, BezierSpan, Bitmap, Cmyk, CompleteObject, FlowFrame, FrameType, Gradient,
        Grey, Grid, GridSpacing, Hsb, JdrVersion, LineSpan, Marker, ObjectBody, Paint, Path,
        PathStyle, Pattern, PatternKind, Point, Radial, Rgb, Segment, SettingsFlag, Shape,
        ShapeElement, StartLocation, SymmetricPath, Text, TextContent, TextPathStyle, Transform,
        Unit,
    };
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn logged() -> (CanvasGraphics, MessageLog) {
        let log = MessageLog::new();
        (CanvasGraphics::with_messages(log.clone()), log)
    }

    fn wide_io() -> JdrIo {
        JdrIo::new(IoConfig {
            preferred_width: 100_000,
            ..IoConfig::default()
        })
        .unwrap()
    }

    fn save_bytes(
        io: &JdrIo,
        root: &CompleteObject,
        format: Format,
        version: JdrVersion,
    ) -> (Vec<u8>, Vec<String>) {
        let (mut canvas, log) = logged();
        let options = SaveOptions::new(format).with_version(version);
        let bytes = io.save(Vec::new(), root, &mut canvas, options).unwrap();
        (bytes, log.warnings())
    }

    fn load_bytes(io: &JdrIo, bytes: &[u8]) -> (JdrResult<LoadedImage>, Vec<String>) {
        let (mut canvas, log) = logged();
        let loaded = io.load(bytes, &mut canvas, None);
        (loaded, log.warnings())
    }

    fn roundtrip(
        root: &CompleteObject,
        format: Format,
        version: JdrVersion,
    ) -> (CompleteObject, Vec<String>) {
        let io = wide_io();
        let (bytes, mut warnings) = save_bytes(&io, root, format, version);
        let (loaded, load_warnings) = load_bytes(&io, &bytes);
        warnings.extend(load_warnings);
        let loaded = loaded.unwrap();
        assert_eq!(loaded.version, version);
        (loaded.root, warnings)
    }

    fn path_object(path: Path) -> CompleteObject {
        CompleteObject::new(ObjectBody::Path(path))
    }

    /// Objects every version can store without loss.
    fn portable_tree() -> CompleteObject {
        let mut square = Path::polyline(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)])
            .unwrap()
            .closed();
        square.fill_paint = Paint::Cmyk(Cmyk {
            cyan: 0.1,
            magenta: 0.2,
            yellow: 0.3,
            key: 0.4,
            alpha: 1.0,
        });
        square.line_paint = Paint::Gradient(Gradient::new(
            Paint::rgb(1.0, 0.0, 0.0, 1.0),
            Paint::rgb(0.0, 0.0, 1.0, 0.5),
            135,
        ));
        let mut curve = Path::new(vec![
            Segment::bezier(p(0.0, 0.0), p(1.0, 2.0), p(3.0, 4.0), p(5.0, 0.25)),
            Segment::gap(p(5.0, 0.25), p(7.0, 1.0)),
            Segment::line(p(7.0, 1.0), p(9.5, -3.125)),
        ]);
        curve.style = PathStyle::Basic(BasicStyle {
            pen_width: 2.5,
            ..BasicStyle::default()
        });
        let mut label = Text::new("Hello, world");
        label.content.transform = Transform([1.0, 0.0, 0.0, 1.0, 20.0, 30.0]);
        label.paint = Paint::Transparent;

        let framed = path_object(square.clone()).with_flow_frame(FlowFrame {
            border: true,
            top: 1.0,
            left: 2.5,
            ..FlowFrame::new(FrameType::Flow, "main")
        });
        CompleteObject::group(vec![
            framed,
            CompleteObject::group(vec![
                path_object(curve),
                CompleteObject::new(ObjectBody::Text(label)),
            ]),
        ])
    }

    /// A tree exercising what version 2.2 adds over the portable subset.
    fn modern_tree() -> CompleteObject {
        let mut half = Path::new(vec![
            Segment::line(p(1.0, 1.0), p(4.0, 2.0)),
            Segment::ClosingMove(LineSpan::new(p(4.0, 2.0), p(5.0, 5.0))),
            Segment::line(p(5.0, 5.0), p(6.0, 5.0)),
        ]);
        half.anchors = vec![0, 2];
        half.line_paint = Paint::Hsb(Hsb {
            hue: 210.0,
            saturation: 0.5,
            brightness: 0.75,
            alpha: 1.0,
        });
        half.fill_paint = Paint::Radial(
            Radial::new(
                Paint::Grey(Grey { grey: 0.25, alpha: 1.0 }),
                Paint::rgb(0.0, 1.0, 0.0, 1.0),
                StartLocation::Centre,
            )
            .with_mid(Paint::rgb(1.0, 1.0, 1.0, 1.0)),
        );
        half.style = PathStyle::Basic(BasicStyle {
            start_marker: Marker::of_kind(3, 4.0),
            ..BasicStyle::default()
        });

        let symmetric = SymmetricPath {
            path: half.clone(),
            line_start: p(10.0, 0.0),
            line_end: p(10.0, 10.0),
            anchored: true,
            join: Some(Segment::PartialLine(LineSpan::new(p(6.0, 5.0), p(10.0, 5.0)))),
        };

        let mut text_path = Path::polyline(&[p(0.0, 20.0), p(30.0, 20.0)]).unwrap();
        let mut content = jdr_types::TextContent::new("along the line");
        content.latex_text = Some("along \\emph{the} line".into());
        text_path.style = PathStyle::TextPath(TextPathStyle { content });

        let pattern = Pattern {
            kind: PatternKind::Spiral {
                angle: 0.5,
                distance: 3.0,
            },
            underlying: Box::new(ObjectBody::Path(half.clone())),
            anchor: p(2.0, 2.0),
            adjust: Some(p(1.0, 0.0)),
            replicas: 4,
            single_path: true,
            show_original: false,
        };

        let mut shaded = Path::new(vec![Segment::line(p(0.0, 0.0), p(1.0, 0.0))]);
        shaded.fill_paint = Paint::Gradient(
            Gradient::new(Paint::BLACK, Paint::rgb(1.0, 1.0, 1.0, 1.0), 45)
                .with_mid(Paint::rgb(0.5, 0.5, 0.5, 1.0)),
        );

        let mut framed = FlowFrame::new(FrameType::Static, "aside");
        framed.contents = "Static text".into();

        CompleteObject::group(vec![
            CompleteObject::new(ObjectBody::Symmetric(symmetric))
                .with_description("mirror")
                .with_tag("shapes"),
            CompleteObject::new(ObjectBody::TextPath(text_path)).with_flow_frame(framed),
            CompleteObject::new(ObjectBody::Pattern(pattern)),
            CompleteObject::group(vec![path_object(shaded)]).with_description("nested"),
        ])
    }

    #[test]
    fn portable_tree_roundtrips_at_every_version() {
        let root = portable_tree();
        for version in JdrVersion::ALL {
            for format in [Format::Jdr, Format::Ajr] {
                let (loaded, warnings) = roundtrip(&root, format, version);
                assert_eq!(loaded, root, "{format} {version}");
                assert!(warnings.is_empty(), "{format} {version}: {warnings:?}");
            }
        }
    }

    #[test]
    fn modern_tree_roundtrips_at_latest() {
        let root = modern_tree();
        for format in [Format::Jdr, Format::Ajr] {
            let (loaded, warnings) = roundtrip(&root, format, JdrVersion::LATEST);
            assert_eq!(loaded, root);
            assert!(warnings.is_empty(), "{warnings:?}");
        }
    }

    #[test]
    fn binary_and_text_load_the_same_tree() {
        let io = wide_io();
        let root = modern_tree();
        for version in [JdrVersion::V1_3, JdrVersion::V1_8, JdrVersion::V2_1, JdrVersion::V2_2] {
            let (jdr, jdr_warnings) = save_bytes(&io, &root, Format::Jdr, version);
            let (ajr, ajr_warnings) = save_bytes(&io, &root, Format::Ajr, version);
            assert_eq!(jdr_warnings, ajr_warnings);
            let from_jdr = load_bytes(&io, &jdr).0.unwrap();
            let from_ajr = load_bytes(&io, &ajr).0.unwrap();
            assert_eq!(from_jdr, from_ajr, "{version}");
        }
    }

    #[test]
    fn old_versions_warn_and_still_load() {
        let (loaded, warnings) = roundtrip(&modern_tree(), Format::Jdr, JdrVersion::V1_0);
        assert!(!warnings.is_empty());
        let group = loaded.as_group().unwrap();
        assert_eq!(group.len(), 4);
        assert!(group
            .objects
            .iter()
            .all(|o| matches!(o.body, ObjectBody::Path(_) | ObjectBody::Group(_))));
    }

    fn single_paint(paint: Paint) -> CompleteObject {
        let mut path = Path::polyline(&[p(0.0, 0.0), p(1.0, 1.0)]).unwrap();
        path.line_paint = paint;
        CompleteObject::group(vec![path_object(path)])
    }

    fn hsb(hue: f64, saturation: f64) -> Paint {
        Paint::Hsb(Hsb {
            hue,
            saturation,
            brightness: 0.5,
            alpha: 1.0,
        })
    }

    #[test]
    fn hue_and_saturation_ranges_are_checked_on_load() {
        let io = wide_io();
        let load = |paint: Paint| {
            let (bytes, _) = save_bytes(&io, &single_paint(paint), Format::Jdr, JdrVersion::LATEST);
            load_bytes(&io, &bytes).0
        };
        let err = load(hsb(360.0, 0.5)).unwrap_err();
        assert_eq!(err.invalid_format().unwrap().tag, FieldTag::Hue);
        assert!(load(hsb(359.999, 0.5)).is_ok());
        assert!(load(hsb(0.0, 1.0)).is_ok());
        let err = load(hsb(10.0, -0.0001)).unwrap_err();
        assert_eq!(err.invalid_format().unwrap().tag, FieldTag::Saturation);
    }

    #[test]
    fn mid_stop_is_dropped_before_2_2() {
        let gradient = Gradient::new(Paint::BLACK, Paint::rgb(1.0, 1.0, 1.0, 1.0), 90);
        let mid = Paint::rgb(1.0, 0.0, 0.0, 1.0);
        let root = single_paint(Paint::Gradient(gradient.clone().with_mid(mid)));
        for format in [Format::Jdr, Format::Ajr] {
            let (loaded, warnings) = roundtrip(&root, format, JdrVersion::V2_1);
            assert_eq!(warnings.len(), 1, "{warnings:?}");
            let ObjectBody::Path(path) = &loaded.as_group().unwrap().objects[0].body else {
                panic!("expected a path");
            };
            assert_eq!(path.line_paint, Paint::Gradient(gradient.clone()));
        }
    }

    #[test]
    fn empty_subgroups_are_not_loaded() {
        let line = path_object(Path::polyline(&[p(0.0, 0.0), p(2.0, 0.0)]).unwrap());
        let root = CompleteObject::group(vec![
            CompleteObject::group(Vec::new()),
            line.clone(),
            CompleteObject::group(vec![CompleteObject::group(Vec::new())]),
        ]);
        for format in [Format::Jdr, Format::Ajr] {
            let (loaded, _) = roundtrip(&root, format, JdrVersion::LATEST);
            assert_eq!(loaded, CompleteObject::group(vec![line.clone()]));
        }
    }

    #[test]
    fn empty_root_group_is_kept() {
        let root = CompleteObject::group(Vec::new());
        let (loaded, _) = roundtrip(&root, Format::Ajr, JdrVersion::LATEST);
        assert_eq!(loaded, root);
    }

    #[test]
    fn non_group_root_is_rejected() {
        let io = wide_io();
        let (mut canvas, _) = logged();
        let root = path_object(Path::polyline(&[p(0.0, 0.0), p(1.0, 0.0)]).unwrap());
        let err = io
            .save(Vec::new(), &root, &mut canvas, SaveOptions::new(Format::Jdr))
            .unwrap_err();
        assert!(matches!(err, JdrError::MissingTopLevelGroup));
    }

    fn transparent_path_ajr() -> String {
        let mut path = Path::polyline(&[p(0.0, 0.0), p(3.0, 4.0)]).unwrap();
        path.line_paint = Paint::Transparent;
        path.fill_paint = Paint::Transparent;
        let root = CompleteObject::group(vec![path_object(path)]);
        let (bytes, _) = save_bytes(&wide_io(), &root, Format::Ajr, JdrVersion::LATEST);
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn unknown_paint_id_is_reported_with_its_line() {
        let text = transparent_path_ajr().replacen("P T T", "P Q T", 1);
        let offset = text.find("P Q").unwrap() + 2;
        let line = text[..offset].matches('\n').count() + 1;

        let (loaded, _) = load_bytes(&wide_io(), text.as_bytes());
        let err = loaded.unwrap_err();
        let invalid = err.invalid_format().unwrap();
        assert_eq!(invalid.tag, FieldTag::PaintId);
        assert_eq!(invalid.value, "Q");
        assert_eq!(invalid.location.map(|l| l.line), Some(line));
        assert!(err.to_string().starts_with(&format!("Line {line}, Column ")));
    }

    #[test]
    fn closing_move_becomes_move_before_2_1() {
        let path = Path::new(vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::ClosingMove(LineSpan::new(p(1.0, 0.0), p(2.0, 2.0))),
        ]);
        let root = CompleteObject::group(vec![path_object(path)]);
        for format in [Format::Jdr, Format::Ajr] {
            let (loaded, warnings) = roundtrip(&root, format, JdrVersion::V2_0);
            assert_eq!(warnings.len(), 1, "{warnings:?}");
            let ObjectBody::Path(path) = &loaded.as_group().unwrap().objects[0].body else {
                panic!("expected a path");
            };
            assert_eq!(path.segments[1], Segment::gap(p(1.0, 0.0), p(2.0, 2.0)));
        }
    }

    #[test]
    fn missing_anchor_list_in_1_7_is_recovered() {
        let root = CompleteObject::group(vec![path_object(
            Path::polyline(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 4.0)]).unwrap(),
        )]);
        let io = wide_io();
        let (bytes, _) = save_bytes(&io, &root, Format::Ajr, JdrVersion::V1_7);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.matches("-1 ").count(), 1);
        let buggy = text.replacen("-1 ", "", 1);

        let (loaded, warnings) = load_bytes(&io, buggy.as_bytes());
        assert_eq!(loaded.unwrap().root, root);
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("1.7"));
    }

    #[test]
    fn bad_anchor_outside_1_7_is_an_error() {
        let root = CompleteObject::group(vec![path_object(
            Path::polyline(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 4.0)]).unwrap(),
        )]);
        let io = wide_io();
        let (bytes, _) = save_bytes(&io, &root, Format::Ajr, JdrVersion::V1_8);
        let buggy = String::from_utf8(bytes).unwrap().replacen("-1 ", "", 1);
        let err = load_bytes(&io, buggy.as_bytes()).0.unwrap_err();
        assert_eq!(err.invalid_format().unwrap().tag, FieldTag::AnchorIndex);
    }

    #[test]
    fn missing_bitmap_is_discarded_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let io = JdrIo::new(IoConfig {
            missing_bitmaps: MissingBitmaps::Discard,
            ..IoConfig::default()
        })
        .unwrap();
        let line = path_object(Path::polyline(&[p(0.0, 0.0), p(1.0, 0.0)]).unwrap());
        let root = CompleteObject::group(vec![
            CompleteObject::new(ObjectBody::Bitmap(Bitmap::new("missing.png"))),
            line.clone(),
        ]);
        let path = dir.path().join("picture.jdr");
        let (mut canvas, log) = logged();
        io.save_file(&path, &root, &mut canvas, SaveOptions::new(Format::Jdr))
            .unwrap();
        let loaded = io.load_file(&path, &mut canvas).unwrap();
        assert_eq!(loaded.root, CompleteObject::group(vec![line]));
        assert_eq!(log.warnings().len(), 2);
    }

    #[test]
    fn present_bitmap_is_kept_without_warnings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.png"), b"png").unwrap();
        let root = CompleteObject::group(vec![CompleteObject::new(ObjectBody::Bitmap(Bitmap {
            transform: Transform::translation(5.0, 6.0),
            ..Bitmap::new("photo.png")
        }))]);
        let io = JdrIo::new(IoConfig::default()).unwrap();
        let path = dir.path().join("picture.ajr");
        let (mut canvas, log) = logged();
        io.save_file(&path, &root, &mut canvas, SaveOptions::new(Format::Ajr))
            .unwrap();
        let loaded = io.load_file(&path, &mut canvas).unwrap();
        assert_eq!(loaded.root, root);
        assert!(log.warnings().is_empty());
    }

    #[test]
    fn charset_declared_in_header_restarts_the_load() {
        let writer = JdrIo::new(IoConfig {
            charset: "ISO-8859-1".into(),
            ..IoConfig::default()
        })
        .unwrap();
        let text = CompleteObject::new(ObjectBody::Text(Text::new("café")));
        let root = CompleteObject::group(vec![text]);
        let (bytes, _) = save_bytes(&writer, &root, Format::Ajr, JdrVersion::LATEST);
        assert!(std::str::from_utf8(&bytes).is_err());

        let reader = JdrIo::new(IoConfig::default()).unwrap();
        let (loaded, _) = load_bytes(&reader, &bytes);
        assert_eq!(loaded.unwrap().root, root);
    }

    #[test]
    fn settings_survive_a_roundtrip() {
        let io = wide_io();
        let mut canvas = CanvasGraphics::new();
        canvas.settings.grid_lock = true;
        canvas.settings.latex.normalsize = 12;
        canvas.settings.latex.preamble = "\\usepackage{xcolor}".into();
        let expected = canvas.settings.clone();
        let root = portable_tree();
        let bytes = io
            .save(Vec::new(), &root, &mut canvas, SaveOptions::new(Format::Ajr))
            .unwrap();

        let mut fresh = CanvasGraphics::new();
        let loaded = io.load(&bytes, &mut fresh, None).unwrap();
        assert_eq!(loaded.settings_flag, SettingsFlag::AllSettings);
        assert_eq!(fresh.settings, expected);
    }

    #[test]
    fn paper_only_becomes_all_settings_before_1_3() {
        let io = wide_io();
        let (mut canvas, log) = logged();
        let options = SaveOptions::new(Format::Jdr)
            .with_version(JdrVersion::V1_2)
            .with_settings(SettingsFlag::PaperOnly);
        let bytes = io.save(Vec::new(), &portable_tree(), &mut canvas, options).unwrap();
        assert_eq!(log.warnings().len(), 1);
        let loaded = load_bytes(&io, &bytes).0.unwrap();
        assert_eq!(loaded.settings_flag, SettingsFlag::AllSettings);
    }

    #[test]
    fn load_reports_object_count() {
        let (loaded, _) = roundtrip(&portable_tree(), Format::Jdr, JdrVersion::LATEST);
        let image = LoadedImage {
            root: loaded,
            version: JdrVersion::LATEST,
            settings_flag: SettingsFlag::AllSettings,
        };
        assert_eq!(image.object_count(), 4);
    }

    #[test]
    fn latex_block_is_reported_when_omitted() {
        let io = wide_io();
        for (version, expected) in [(JdrVersion::V1_5, 1), (JdrVersion::V1_8, 0)] {
            let (mut canvas, log) = logged();
            canvas.settings.latex.preamble = "\\usepackage{tikz}".into();
            let options = SaveOptions::new(Format::Ajr).with_version(version);
            io.save(Vec::new(), &portable_tree(), &mut canvas, options).unwrap();
            assert_eq!(log.warnings().len(), expected, "{version}: {:?}", log.warnings());
        }
    }

    fn three_segment_path() -> Path {
        Path::polyline(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).unwrap()
    }

    #[test]
    fn unordered_or_out_of_range_anchors_are_not_saved() {
        let io = wide_io();
        for anchors in [vec![1, 0], vec![1, 1], vec![0, 3]] {
            let mut path = three_segment_path();
            path.anchors = anchors.clone();
            let root = CompleteObject::group(vec![path_object(path)]);
            for format in [Format::Jdr, Format::Ajr] {
                let (mut canvas, _) = logged();
                let options = SaveOptions::new(format).with_version(JdrVersion::V1_8);
                let err = io.save(Vec::new(), &root, &mut canvas, options).unwrap_err();
                assert_eq!(
                    err.invalid_format().unwrap().tag,
                    FieldTag::AnchorIndex,
                    "{anchors:?}"
                );
            }
        }
    }

    #[test]
    fn valid_anchors_roundtrip_from_1_7() {
        let mut path = three_segment_path();
        path.anchors = vec![0, 2];
        let root = CompleteObject::group(vec![path_object(path)]);
        for format in [Format::Jdr, Format::Ajr] {
            let (loaded, warnings) = roundtrip(&root, format, JdrVersion::V1_7);
            assert_eq!(loaded, root);
            assert!(warnings.is_empty(), "{warnings:?}");
        }
    }

    fn grids() -> Vec<(Grid, JdrVersion)> {
        let spacing = GridSpacing {
            unit: Unit::Cm,
            major: 2.0,
            subdivisions: 4,
        };
        let shape = Shape::new(vec![
            ShapeElement::MoveTo(p(0.0, 0.0)),
            ShapeElement::LineTo(p(10.0, 0.0)),
            ShapeElement::QuadTo(p(12.0, 5.0), p(10.0, 10.0)),
            ShapeElement::CubicTo(p(8.0, 12.0), p(2.0, 12.0), p(0.0, 10.0)),
            ShapeElement::Close,
        ]);
        vec![
            (Grid::Radial { spacing, spokes: 12 }, JdrVersion::V1_8),
            (Grid::Iso(spacing), JdrVersion::V2_0),
            (Grid::Tschichold(spacing), JdrVersion::V2_0),
            (
                Grid::Path {
                    unit: Unit::Mm,
                    shape,
                    subdivisions: 3,
                },
                JdrVersion::V2_1,
            ),
        ]
    }

    #[test]
    fn grids_roundtrip_from_their_first_version() {
        let io = wide_io();
        for (grid, version) in grids() {
            for format in [Format::Jdr, Format::Ajr] {
                let (mut canvas, log) = logged();
                canvas.settings.grid = grid.clone();
                let options = SaveOptions::new(format).with_version(version);
                let bytes = io.save(Vec::new(), &portable_tree(), &mut canvas, options).unwrap();
                assert!(log.warnings().is_empty(), "{format} {version}: {:?}", log.warnings());

                let mut fresh = CanvasGraphics::new();
                io.load(&bytes, &mut fresh, None).unwrap();
                assert_eq!(fresh.settings.grid, grid, "{format} {version}");
            }
        }
    }

    #[test]
    fn grids_become_rectangular_before_their_first_version() {
        let io = wide_io();
        for (grid, version) in grids() {
            let earlier = previous(version);
            let (mut canvas, log) = logged();
            canvas.settings.grid = grid.clone();
            let options = SaveOptions::new(Format::Jdr).with_version(earlier);
            let bytes = io.save(Vec::new(), &portable_tree(), &mut canvas, options).unwrap();
            assert_eq!(log.warnings().len(), 1, "{earlier}: {:?}", log.warnings());

            let mut fresh = CanvasGraphics::new();
            io.load(&bytes, &mut fresh, None).unwrap();
            assert_eq!(fresh.settings.grid, grid.to_rectangular());
        }
    }

    fn previous(version: JdrVersion) -> JdrVersion {
        let index = JdrVersion::ALL.iter().position(|&v| v == version).unwrap();
        JdrVersion::ALL[index - 1]
    }

    fn painted(line_paint: Paint, fill_paint: Paint) -> ObjectBody {
        let mut path = Path::polyline(&[p(0.0, 0.0), p(4.0, 3.0)]).unwrap();
        path.line_paint = line_paint;
        path.fill_paint = fill_paint;
        ObjectBody::Path(path)
    }

    fn replicated(kind: PatternKind) -> ObjectBody {
        ObjectBody::Pattern(Pattern {
            kind,
            underlying: Box::new(ObjectBody::Path(three_segment_path())),
            anchor: p(5.0, 5.0),
            adjust: Some(p(0.5, -0.5)),
            replicas: 3,
            single_path: false,
            show_original: true,
        })
    }

    /// Each variant paired with the first version that stores it natively.
    fn first_versions(bitmap: &str) -> Vec<(&'static str, ObjectBody, JdrVersion)> {
        let radial = Radial::new(
            Paint::rgb(1.0, 0.5, 0.0, 1.0),
            Paint::Grey(Grey { grey: 0.75, alpha: 0.5 }),
            StartLocation::NorthEast,
        );

        let mut text_path = Path::polyline(&[p(2.0, 2.0), p(40.0, 2.0)]).unwrap();
        let mut content = TextContent::new("on a line");
        content.latex_text = Some("on a \\textbf{line}".into());
        text_path.style = PathStyle::TextPath(TextPathStyle { content });

        let half = Path::new(vec![
            Segment::line(p(0.0, 0.0), p(2.0, 1.0)),
            Segment::PartialBezier(BezierSpan::new(p(2.0, 1.0), p(3.0, 2.0), p(4.0, 2.0), p(5.0, 1.0))),
            Segment::PartialMove(LineSpan::new(p(5.0, 1.0), p(6.0, 3.0))),
            Segment::PartialLine(LineSpan::new(p(6.0, 3.0), p(7.0, 3.0))),
        ]);
        let symmetric = SymmetricPath {
            path: half,
            line_start: p(8.0, 0.0),
            line_end: p(8.0, 10.0),
            anchored: false,
            join: Some(Segment::PartialLine(LineSpan::new(p(7.0, 3.0), p(8.0, 3.0)))),
        };

        let mut anchored = three_segment_path();
        anchored.anchors = vec![1];

        let closing = Path::new(vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::ClosingMove(LineSpan::new(p(1.0, 0.0), p(3.0, 3.0))),
            Segment::line(p(3.0, 3.0), p(4.0, 3.0)),
        ]);

        vec![
            ("hsb", painted(hsb(120.0, 0.25), Paint::Transparent), JdrVersion::V1_1),
            (
                "grey",
                painted(Paint::Grey(Grey { grey: 0.5, alpha: 1.0 }), Paint::Transparent),
                JdrVersion::V1_1,
            ),
            ("radial", painted(Paint::BLACK, Paint::Radial(radial)), JdrVersion::V1_1),
            (
                "bitmap",
                ObjectBody::Bitmap(Bitmap {
                    latex_filename: Some("figures/photo".into()),
                    latex_command: "\\includegraphics[width=2cm]".into(),
                    transform: Transform::translation(3.0, 4.0),
                    ..Bitmap::new(bitmap)
                }),
                JdrVersion::V1_2,
            ),
            ("text path", ObjectBody::TextPath(text_path), JdrVersion::V1_5),
            ("symmetric", ObjectBody::Symmetric(symmetric), JdrVersion::V1_6),
            ("anchors", ObjectBody::Path(anchored), JdrVersion::V1_7),
            ("rotational", replicated(PatternKind::Rotational { angle: 1.25 }), JdrVersion::V1_8),
            (
                "scaled",
                replicated(PatternKind::Scaled {
                    scale_x: 1.5,
                    scale_y: 0.75,
                }),
                JdrVersion::V1_8,
            ),
            (
                "spiral",
                replicated(PatternKind::Spiral {
                    angle: 0.5,
                    distance: 2.0,
                }),
                JdrVersion::V1_8,
            ),
            ("closing move", ObjectBody::Path(closing), JdrVersion::V2_1),
            (
                "mid stop",
                painted(
                    Paint::Gradient(
                        Gradient::new(Paint::BLACK, Paint::rgb(1.0, 1.0, 1.0, 1.0), 0)
                            .with_mid(Paint::rgb(0.0, 0.0, 1.0, 1.0)),
                    ),
                    Paint::Transparent,
                ),
                JdrVersion::V2_2,
            ),
        ]
    }

    #[test]
    fn variants_roundtrip_at_their_first_version() {
        let dir = tempfile::tempdir().unwrap();
        let bitmap = dir.path().join("photo.png");
        std::fs::write(&bitmap, b"png").unwrap();
        let bitmap = bitmap.to_str().unwrap();

        for (name, body, version) in first_versions(bitmap) {
            let root = CompleteObject::group(vec![CompleteObject::new(body)]);
            for format in [Format::Jdr, Format::Ajr] {
                let (loaded, warnings) = roundtrip(&root, format, version);
                assert_eq!(loaded, root, "{name} {format} {version}");
                assert!(warnings.is_empty(), "{name} {format} {version}: {warnings:?}");

                let earlier = previous(version);
                let (_, warnings) = roundtrip(&root, format, earlier);
                assert!(!warnings.is_empty(), "{name} {format} {earlier} saved without loss");
            }
        }
    }

    fn unit() -> impl Strategy<Value = f64> {
        0.0..=1.0f64
    }

    proptest! {
        #[test]
        fn solid_colours_roundtrip(r in unit(), g in unit(), b in unit(), a in unit()) {
            let root = single_paint(Paint::Rgb(Rgb::new(r, g, b, a)));
            for format in [Format::Jdr, Format::Ajr] {
                let (loaded, warnings) = roundtrip(&root, format, JdrVersion::LATEST);
                prop_assert_eq!(&loaded, &root);
                prop_assert!(warnings.is_empty());
            }
        }

        #[test]
        fn text_transforms_roundtrip(m in proptest::array::uniform6(-1.0e6..1.0e6f64)) {
            let mut text = Text::new("x");
            text.content.transform = Transform(m);
            let root = CompleteObject::group(vec![CompleteObject::new(ObjectBody::Text(text))]);
            let (loaded, _) = roundtrip(&root, Format::Ajr, JdrVersion::LATEST);
            prop_assert_eq!(loaded, root);
        }
    }
}
