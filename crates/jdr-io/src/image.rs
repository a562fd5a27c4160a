//! Whole-image save and load: header, canvas settings, LaTeX block and the
//! root group.
//!
//! Header fields are read from and written to the `CanvasGraphics`
//! settings of the handle, so the storage unit is known before any
//! transform is read.

use jdr_types::{
    CompleteObject, Feature, JdrVersion, LatexSettings, Paper, Point, SettingsFlag, Tool, Unit,
};
use tracing::debug;

use crate::canvas::Message;
use crate::error::{JdrError, JdrResult};
use crate::handle::{DoubleRange, FormatReader, FormatWriter};
use crate::tag::FieldTag;

/// Result of [`load_image`].
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedImage {
    /// The root object. Its body is always a group.
    pub root: CompleteObject,
    pub version: JdrVersion,
    pub settings_flag: SettingsFlag,
}

impl LoadedImage {
    /// Number of objects below the root, at any depth.
    pub fn object_count(&self) -> usize {
        self.root.as_group().map_or(0, |g| g.deep_count())
    }
}

/// Write a complete image at the writer's version.
pub fn save_image(
    out: &mut dyn FormatWriter,
    root: &CompleteObject,
    settings_flag: SettingsFlag,
) -> JdrResult<()> {
    if root.as_group().is_none() {
        return Err(JdrError::MissingTopLevelGroup);
    }
    let version = out.version();
    debug!(%version, settings = %settings_flag, "saving image");
    out.write_format_tag()?;

    let settings = out.canvas().settings.clone();
    if out.supports(Feature::StorageUnit) {
        out.write_byte(settings.storage_unit.id())?;
    } else if settings.storage_unit != Unit::Bp {
        out.omitted("storage unit");
    }
    if out.supports(Feature::Origin) {
        out.write_point(settings.origin)?;
    } else if settings.origin != Point::default() {
        out.omitted("canvas origin");
    }

    let settings_flag = write_settings_flag(out, settings_flag)?;
    match settings_flag {
        SettingsFlag::NoSettings => {}
        SettingsFlag::AllSettings => {
            out.write_bool(settings.grid_lock)?;
            out.write_bool(settings.show_rulers)?;
            out.write_byte(settings.tool.id())?;
            out.registries().grids.save(out, &settings.grid)?;
            if !out.supports(Feature::LatexBlock) {
                out.write_int(settings.latex.normalsize)?;
            }
            write_paper(out, &settings.paper)?;
        }
        SettingsFlag::PaperOnly => write_paper(out, &settings.paper)?,
    }

    write_latex(out, &settings.latex)?;
    out.registries().objects.save(out, root)?;
    out.flush()
}

/// Before 1.3 the flag is a boolean; paper-only becomes all settings.
fn write_settings_flag(out: &mut dyn FormatWriter, flag: SettingsFlag) -> JdrResult<SettingsFlag> {
    if out.supports(Feature::SettingsFlagByte) {
        out.write_byte(flag.id())?;
        return Ok(flag);
    }
    let flag = match flag {
        SettingsFlag::PaperOnly => {
            let text = out.canvas().message("io.paper_only", &[&out.version()]);
            out.warning(text);
            SettingsFlag::AllSettings
        }
        other => other,
    };
    out.write_bool(flag == SettingsFlag::AllSettings)?;
    Ok(flag)
}

fn write_paper(out: &mut dyn FormatWriter, paper: &Paper) -> JdrResult<()> {
    out.write_byte(paper.id())?;
    if let Paper::User { width, height } = *paper {
        out.write_double(width)?;
        out.write_double(height)?;
    }
    Ok(())
}

fn write_latex(out: &mut dyn FormatWriter, latex: &LatexSettings) -> JdrResult<()> {
    if !out.supports(Feature::LatexBlock) {
        let defaults = LatexSettings::default();
        let payload = LatexSettings {
            normalsize: defaults.normalsize,
            ..latex.clone()
        };
        if payload != defaults {
            out.omitted("LaTeX settings block");
        }
        return Ok(());
    }

    out.write_int(latex.normalsize)?;
    out.write_string(&latex.preamble)?;
    if out.supports(Feature::MidEndPreamble) {
        out.write_string(&latex.mid_preamble)?;
        out.write_string(&latex.end_preamble)?;
    } else if !latex.mid_preamble.is_empty() || !latex.end_preamble.is_empty() {
        out.omitted("mid and end preamble");
    }
    if out.supports(Feature::DocumentBody) {
        out.write_string(&latex.doc_body)?;
        out.write_string(&latex.magic_comments)?;
    } else {
        if !latex.doc_body.is_empty() {
            out.omitted("document body");
        }
        if !latex.magic_comments.is_empty() {
            out.omitted("magic comments");
        }
    }
    out.write_string(&latex.doc_class)?;
    out.write_bool(latex.absolute_pages)
}

/// Read a complete image. The version comes from the header.
pub fn load_image(inp: &mut dyn FormatReader) -> JdrResult<LoadedImage> {
    let version = inp.read_format_tag()?;

    if inp.supports(Feature::StorageUnit) {
        let id = inp.read_byte(FieldTag::StorageUnit)?;
        let unit =
            Unit::from_id(id).map_err(|_| inp.invalid_value(FieldTag::StorageUnit, id.to_string()))?;
        inp.canvas_mut().settings.storage_unit = unit;
    } else {
        inp.canvas_mut().settings.storage_unit = Unit::Bp;
    }
    if inp.supports(Feature::Origin) {
        let x = inp.read_double_in(FieldTag::OriginX, DoubleRange::FINITE)?;
        let y = inp.read_double_in(FieldTag::OriginY, DoubleRange::FINITE)?;
        inp.canvas_mut().settings.origin = Point::new(x, y);
    }

    let settings_flag = if inp.supports(Feature::SettingsFlagByte) {
        SettingsFlag::from_id(inp.read_byte(FieldTag::SettingsFlag)?)?
    } else if inp.read_bool(FieldTag::SettingsFlag)? {
        SettingsFlag::AllSettings
    } else {
        SettingsFlag::NoSettings
    };

    match settings_flag {
        SettingsFlag::NoSettings => {}
        SettingsFlag::AllSettings => read_all_settings(inp)?,
        SettingsFlag::PaperOnly => {
            let paper = read_paper(inp)?;
            inp.canvas_mut().settings.paper = paper;
        }
    }

    if inp.supports(Feature::LatexBlock) {
        let latex = read_latex(inp)?;
        inp.canvas_mut().settings.latex = latex;
    }

    let root = match inp.registries().objects.load(inp)? {
        Some(root) if root.as_group().is_some() => root,
        _ => return Err(JdrError::MissingTopLevelGroup),
    };

    let loaded = LoadedImage {
        root,
        version,
        settings_flag,
    };
    let count = loaded.object_count();
    debug!(%version, objects = count, "loaded image");
    let text = inp.canvas().message("io.loaded", &[&count]);
    inp.canvas().publish(Message::Info(text));
    Ok(loaded)
}

fn read_all_settings(inp: &mut dyn FormatReader) -> JdrResult<()> {
    let grid_lock = inp.read_bool(FieldTag::GridLock)?;
    let show_rulers = inp.read_bool(FieldTag::ShowRulers)?;
    let id = inp.read_byte(FieldTag::Tool)?;
    let tool = Tool::from_id(id).map_err(|_| inp.invalid_value(FieldTag::Tool, id.to_string()))?;
    let grid = inp.registries().grids.load(inp)?;
    let normalsize = if inp.supports(Feature::LatexBlock) {
        None
    } else {
        Some(inp.read_int_in(FieldTag::Normalsize, 1, i32::MAX)?)
    };
    let paper = read_paper(inp)?;

    let settings = &mut inp.canvas_mut().settings;
    settings.grid_lock = grid_lock;
    settings.show_rulers = show_rulers;
    settings.tool = tool;
    settings.grid = grid;
    settings.paper = paper;
    if let Some(normalsize) = normalsize {
        settings.latex.normalsize = normalsize;
    }
    Ok(())
}

fn read_paper(inp: &mut dyn FormatReader) -> JdrResult<Paper> {
    let id = inp.read_byte(FieldTag::Paper)?;
    if id == Paper::USER_ID {
        let width = inp.read_double_in(FieldTag::PaperWidth, DoubleRange::POSITIVE)?;
        let height = inp.read_double_in(FieldTag::PaperHeight, DoubleRange::POSITIVE)?;
        return Ok(Paper::User { width, height });
    }
    Paper::named_from_id(id).map_err(|_| inp.invalid_value(FieldTag::Paper, id.to_string()))
}

fn read_latex(inp: &mut dyn FormatReader) -> JdrResult<LatexSettings> {
    let mut latex = LatexSettings {
        normalsize: inp.read_int_in(FieldTag::Normalsize, 1, i32::MAX)?,
        preamble: inp.read_string(FieldTag::Preamble)?,
        ..LatexSettings::default()
    };
    if inp.supports(Feature::MidEndPreamble) {
        latex.mid_preamble = inp.read_string(FieldTag::MidPreamble)?;
        latex.end_preamble = inp.read_string(FieldTag::EndPreamble)?;
    }
    if inp.supports(Feature::DocumentBody) {
        latex.doc_body = inp.read_string(FieldTag::DocBody)?;
        latex.magic_comments = inp.read_string(FieldTag::MagicComments)?;
    }
    latex.doc_class = inp.read_string(FieldTag::DocClass)?;
    latex.absolute_pages = inp.read_bool(FieldTag::AbsolutePages)?;
    Ok(latex)
}
