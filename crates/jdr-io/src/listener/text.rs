use jdr_types::{
    Feature, FontSeries, FontShape, FontSpec, HAlign, LatexFont, ObjectBody, ObjectKind, Text,
    TextContent, VAlign,
};

use crate::error::{JdrError, JdrResult};
use crate::handle::{DoubleRange, FormatReader, FormatWriter};
use crate::registry::{Listener, ObjectListener};
use crate::tag::FieldTag;

/// Write the font, transform and text of a text object or text-path style.
pub fn write_text_content(out: &mut dyn FormatWriter, content: &TextContent) -> JdrResult<()> {
    let font = &content.font;
    out.write_string(&font.family)?;
    out.write_byte(font.series.id())?;
    out.write_byte(font.shape.id())?;
    out.write_double(font.size)?;

    if out.supports(Feature::LatexText) {
        let latex = &content.latex_font;
        out.write_string(&latex.family)?;
        out.write_string(&latex.size)?;
        out.write_string(&latex.series)?;
        out.write_string(&latex.shape)?;
        match &content.latex_text {
            Some(text) => {
                out.write_bool(true)?;
                out.write_string(text)?;
            }
            None => out.write_bool(false)?,
        }
    } else if content.latex_text.is_some() || content.latex_font != LatexFont::default() {
        out.omitted("LaTeX text and font");
    }

    out.write_transform(&content.transform)?;
    out.write_string(&content.text)
}

pub fn read_text_content(inp: &mut dyn FormatReader) -> JdrResult<TextContent> {
    let family = inp.read_string(FieldTag::FontFamily)?;
    let series = inp.read_byte(FieldTag::FontSeries)?;
    let series = FontSeries::from_id(series)
        .map_err(|_| inp.invalid_value(FieldTag::FontSeries, series.to_string()))?;
    let shape = inp.read_byte(FieldTag::FontShape)?;
    let shape = FontShape::from_id(shape)
        .map_err(|_| inp.invalid_value(FieldTag::FontShape, shape.to_string()))?;
    let size = inp.read_double_in(FieldTag::FontSize, DoubleRange::POSITIVE)?;
    let font = FontSpec {
        family,
        series,
        shape,
        size,
    };

    let (latex_font, latex_text) = if inp.supports(Feature::LatexText) {
        let latex_font = LatexFont {
            family: inp.read_string(FieldTag::LatexFont)?,
            size: inp.read_string(FieldTag::LatexFont)?,
            series: inp.read_string(FieldTag::LatexFont)?,
            shape: inp.read_string(FieldTag::LatexFont)?,
        };
        let latex_text = if inp.read_bool(FieldTag::LatexTextFlag)? {
            Some(inp.read_string(FieldTag::LatexText)?)
        } else {
            None
        };
        (latex_font, latex_text)
    } else {
        (LatexFont::default(), None)
    };

    let transform = inp.read_transform()?;
    let text = inp.read_string(FieldTag::Text)?;
    Ok(TextContent {
        font,
        latex_font,
        transform,
        text,
        latex_text,
    })
}

/// `T`: paint, text content, then the anchors from 1.5.
pub struct TextListener;
impl_listener!(TextListener, ObjectKind::Text, char = 'T', "text");

impl ObjectListener for TextListener {
    fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
        let ObjectBody::Text(text) = body else {
            return Err(JdrError::WrongVariant {
                listener: self.type_name(),
                found: body.kind().to_string(),
            });
        };
        out.registries().paints.save(out, &text.paint)?;
        write_text_content(out, &text.content)?;
        if out.supports(Feature::TextAnchors) {
            out.write_byte(text.halign.id())?;
            out.write_byte(text.valign.id())?;
        } else if text.halign != HAlign::default() || text.valign != VAlign::default() {
            out.omitted("text anchors");
        }
        Ok(())
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>> {
        let paint = inp.registries().paints.load(inp)?;
        let content = read_text_content(inp)?;
        let (halign, valign) = if inp.supports(Feature::TextAnchors) {
            let h = inp.read_byte(FieldTag::HAlign)?;
            let halign =
                HAlign::from_id(h).map_err(|_| inp.invalid_value(FieldTag::HAlign, h.to_string()))?;
            let v = inp.read_byte(FieldTag::VAlign)?;
            let valign =
                VAlign::from_id(v).map_err(|_| inp.invalid_value(FieldTag::VAlign, v.to_string()))?;
            (halign, valign)
        } else {
            (HAlign::default(), VAlign::default())
        };
        Ok(Some(ObjectBody::Text(Text {
            paint,
            content,
            halign,
            valign,
        })))
    }
}
