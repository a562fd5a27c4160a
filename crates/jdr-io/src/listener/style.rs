use jdr_types::{
    BasicStyle, CapStyle, DashPattern, Feature, JdrVersion, JoinStyle, Marker, PathStyle,
    PathStyleKind, TextPathStyle, WindingRule, MAX_MARKER_TYPE,
};

use crate::error::{JdrError, JdrResult};
use crate::handle::{DoubleRange, FormatReader, FormatWriter};
use crate::listener::text::{read_text_content, write_text_content};
use crate::registry::{Listener, PathStyleListener, Projection};
use crate::tag::FieldTag;

fn wrong_variant(listener: &'static str, style: &PathStyle) -> JdrError {
    JdrError::WrongVariant {
        listener,
        found: format!("{:?}", style.kind()),
    }
}

pub fn write_marker(out: &mut dyn FormatWriter, marker: &Marker) -> JdrResult<()> {
    out.write_int(marker.kind)?;
    if marker.is_none() {
        return Ok(());
    }
    out.write_double(marker.size)?;
    out.write_bool(marker.repeated)?;
    out.write_bool(marker.reversed)?;

    if !out.supports(Feature::ExtendedMarkers) {
        if marker.has_extended_fields() {
            out.omitted("marker orientation, offsets, paint and composites");
        }
        return Ok(());
    }
    out.write_bool(marker.auto_orient)?;
    out.write_double(marker.angle)?;
    write_optional_double(out, marker.user_offset)?;
    write_optional_double(out, marker.repeat_offset)?;
    match &marker.paint {
        Some(paint) => {
            out.write_bool(true)?;
            out.registries().paints.save(out, paint)?;
        }
        None => out.write_bool(false)?,
    }
    match &marker.composite {
        Some(composite) => {
            out.write_bool(true)?;
            write_marker(out, composite)
        }
        None => out.write_bool(false),
    }
}

fn write_optional_double(out: &mut dyn FormatWriter, value: Option<f64>) -> JdrResult<()> {
    match value {
        Some(v) => {
            out.write_bool(true)?;
            out.write_double(v)
        }
        None => out.write_bool(false),
    }
}

pub fn read_marker(inp: &mut dyn FormatReader) -> JdrResult<Marker> {
    let kind = inp.read_int_in(FieldTag::MarkerType, 0, MAX_MARKER_TYPE)?;
    if kind == 0 {
        return Ok(Marker::none());
    }
    let mut marker = Marker::of_kind(
        kind,
        inp.read_double_in(FieldTag::MarkerSize, DoubleRange::NON_NEGATIVE)?,
    );
    marker.repeated = inp.read_bool(FieldTag::MarkerFlag)?;
    marker.reversed = inp.read_bool(FieldTag::MarkerFlag)?;
    if !inp.supports(Feature::ExtendedMarkers) {
        return Ok(marker);
    }

    marker.auto_orient = inp.read_bool(FieldTag::MarkerFlag)?;
    marker.angle = inp.read_double_in(FieldTag::MarkerAngle, DoubleRange::FINITE)?;
    marker.user_offset = read_optional_double(inp)?;
    marker.repeat_offset = read_optional_double(inp)?;
    if inp.read_bool(FieldTag::MarkerFlag)? {
        marker.paint = Some(inp.registries().paints.load(inp)?);
    }
    if inp.read_bool(FieldTag::MarkerFlag)? {
        marker.composite = Some(Box::new(read_marker(inp)?));
    }
    Ok(marker)
}

fn read_optional_double(inp: &mut dyn FormatReader) -> JdrResult<Option<f64>> {
    if inp.read_bool(FieldTag::MarkerFlag)? {
        Ok(Some(inp.read_double_in(FieldTag::MarkerOffset, DoubleRange::FINITE)?))
    } else {
        Ok(None)
    }
}

/// `0`: pen, dash pattern, markers and winding rule.
pub struct BasicStyleListener;
impl_listener!(BasicStyleListener, PathStyleKind::Basic, u8 = 0, "basic path style");

impl PathStyleListener for BasicStyleListener {
    fn write(&self, out: &mut dyn FormatWriter, style: &PathStyle) -> JdrResult<()> {
        let PathStyle::Basic(style) = style else {
            return Err(wrong_variant(self.type_name(), style));
        };
        out.write_double(style.pen_width)?;
        out.write_byte(style.cap.id())?;
        out.write_byte(style.join.id())?;
        out.write_double(style.mitre_limit)?;

        out.write_int(style.dash.pattern.len() as i32)?;
        if !style.dash.is_solid() {
            for value in &style.dash.pattern {
                out.write_double(*value)?;
            }
            out.write_double(style.dash.offset)?;
        }

        if out.supports(Feature::Markers) {
            write_marker(out, &style.start_marker)?;
            write_marker(out, &style.mid_marker)?;
            write_marker(out, &style.end_marker)?;
        } else if style.has_markers() {
            out.omitted("path markers");
        }

        if out.supports(Feature::WindingRule) {
            out.write_byte(style.winding.id())?;
        } else if style.winding != WindingRule::default() {
            out.omitted("winding rule");
        }
        Ok(())
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<PathStyle> {
        let pen_width = inp.read_double_in(FieldTag::PenWidth, DoubleRange::NON_NEGATIVE)?;
        let cap = inp.read_byte(FieldTag::CapStyle)?;
        let cap =
            CapStyle::from_id(cap).map_err(|_| inp.invalid_value(FieldTag::CapStyle, cap.to_string()))?;
        let join = inp.read_byte(FieldTag::JoinStyle)?;
        let join = JoinStyle::from_id(join)
            .map_err(|_| inp.invalid_value(FieldTag::JoinStyle, join.to_string()))?;
        let mitre_limit = inp.read_double_in(FieldTag::MitreLimit, DoubleRange::closed(1.0, f64::MAX))?;

        let count = inp.read_int_in(FieldTag::DashLength, 0, i32::MAX)?;
        let dash = if count == 0 {
            DashPattern::solid()
        } else {
            let mut pattern = Vec::with_capacity((count as usize).min(256));
            for _ in 0..count {
                pattern.push(inp.read_double_in(FieldTag::DashValue, DoubleRange::NON_NEGATIVE)?);
            }
            let offset = inp.read_double_in(FieldTag::DashOffset, DoubleRange::FINITE)?;
            DashPattern { pattern, offset }
        };

        let mut style = BasicStyle {
            pen_width,
            cap,
            join,
            mitre_limit,
            dash,
            ..BasicStyle::default()
        };
        if inp.supports(Feature::Markers) {
            style.start_marker = read_marker(inp)?;
            style.mid_marker = read_marker(inp)?;
            style.end_marker = read_marker(inp)?;
        }
        if inp.supports(Feature::WindingRule) {
            let id = inp.read_byte(FieldTag::WindingRule)?;
            style.winding = WindingRule::from_id(id)
                .map_err(|_| inp.invalid_value(FieldTag::WindingRule, id.to_string()))?;
        }
        Ok(PathStyle::Basic(style))
    }
}

/// `1`: the font and text laid along the path.
pub struct TextPathStyleListener;
impl_listener!(TextPathStyleListener, PathStyleKind::TextPath, u8 = 1, "text-path style", since TextPath);

impl PathStyleListener for TextPathStyleListener {
    fn write(&self, out: &mut dyn FormatWriter, style: &PathStyle) -> JdrResult<()> {
        let PathStyle::TextPath(style) = style else {
            return Err(wrong_variant(self.type_name(), style));
        };
        write_text_content(out, &style.content)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<PathStyle> {
        Ok(PathStyle::TextPath(TextPathStyle {
            content: read_text_content(inp)?,
        }))
    }

    fn project(&self, style: &PathStyle, version: JdrVersion) -> Projection<PathStyle> {
        match style {
            PathStyle::TextPath(_) if !Feature::TextPath.is_supported_by(version) => {
                Projection::Projected(PathStyle::Basic(BasicStyle::default()))
            }
            _ => Projection::Native,
        }
    }
}
