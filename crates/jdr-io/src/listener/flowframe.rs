//! Flow frame trailer attached to objects.

use jdr_types::{Feature, FlowFrame, FrameType, FrameVAlign, ParagraphShape};

use crate::error::JdrResult;
use crate::handle::{DoubleRange, FormatReader, FormatWriter};
use crate::tag::FieldTag;

pub fn write_flow_frame(out: &mut dyn FormatWriter, frame: &FlowFrame) -> JdrResult<()> {
    out.write_byte(frame.frame_type.id())?;
    out.write_bool(frame.border)?;
    out.write_string(&frame.label)?;
    out.write_string(&frame.pages)?;
    for margin in [frame.top, frame.bottom, frame.left, frame.right] {
        out.write_double(margin)?;
    }

    if out.supports(Feature::FlowFrameShape) {
        out.write_byte(frame.shape.id())?;
        out.write_byte(frame.valign.id())?;
    } else if frame.shape != ParagraphShape::default() || frame.valign != FrameVAlign::default() {
        out.omitted("flow frame paragraph shape and alignment");
    }

    if out.supports(Feature::FlowFrameContents) {
        out.write_string(&frame.contents)?;
    } else if !frame.contents.is_empty() {
        out.omitted("flow frame contents");
    }
    Ok(())
}

pub fn read_flow_frame(inp: &mut dyn FormatReader) -> JdrResult<FlowFrame> {
    let id = inp.read_byte(FieldTag::FlowFrameType)?;
    let frame_type = FrameType::from_id(id)
        .map_err(|_| inp.invalid_value(FieldTag::FlowFrameType, id.to_string()))?;
    let mut frame = FlowFrame::new(frame_type, "");
    frame.border = inp.read_bool(FieldTag::FlowFrameBorder)?;
    frame.label = inp.read_string(FieldTag::FlowFrameLabel)?;
    frame.pages = inp.read_string(FieldTag::FlowFramePages)?;
    frame.top = inp.read_double_in(FieldTag::FlowFrameMargin, DoubleRange::FINITE)?;
    frame.bottom = inp.read_double_in(FieldTag::FlowFrameMargin, DoubleRange::FINITE)?;
    frame.left = inp.read_double_in(FieldTag::FlowFrameMargin, DoubleRange::FINITE)?;
    frame.right = inp.read_double_in(FieldTag::FlowFrameMargin, DoubleRange::FINITE)?;

    if inp.supports(Feature::FlowFrameShape) {
        let id = inp.read_byte(FieldTag::FlowFrameShape)?;
        frame.shape = ParagraphShape::from_id(id)
            .map_err(|_| inp.invalid_value(FieldTag::FlowFrameShape, id.to_string()))?;
        let id = inp.read_byte(FieldTag::FlowFrameValign)?;
        frame.valign = FrameVAlign::from_id(id)
            .map_err(|_| inp.invalid_value(FieldTag::FlowFrameValign, id.to_string()))?;
    }
    if inp.supports(Feature::FlowFrameContents) {
        frame.contents = inp.read_string(FieldTag::FlowFrameContents)?;
    }
    Ok(frame)
}
