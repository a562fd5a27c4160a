use jdr_types::{CompleteObject, Feature, JdrVersion, ObjectBody, ObjectKind};

use crate::error::JdrResult;
use crate::handle::{FormatReader, FormatWriter};
use crate::listener::flowframe::{read_flow_frame, write_flow_frame};
use crate::listener::{bitmap, group, path, pattern, text};
use crate::registry::{Listener, Projection, Registry};
use crate::tag::FieldTag;

/// Codec for one object variant.
pub trait ObjectListener: Listener<Id = char, Kind = ObjectKind> {
    fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()>;

    /// `None` means the object was read but discarded, e.g. a bitmap whose
    /// file is missing.
    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>>;

    fn project(&self, _body: &ObjectBody, _version: JdrVersion) -> Projection<ObjectBody> {
        Projection::Native
    }
}

pub(crate) fn standard() -> Registry<dyn ObjectListener> {
    let mut registry: Registry<dyn ObjectListener> = Registry::new();
    registry.register(Box::new(group::GroupListener));
    registry.register(Box::new(path::PathListener));
    registry.register(Box::new(bitmap::BitmapListener));
    registry.register(Box::new(text::TextListener));
    registry.register(Box::new(path::TextPathListener));
    registry.register(Box::new(path::SymmetricPathListener));
    registry.register(Box::new(pattern::RotationalPatternListener));
    registry.register(Box::new(pattern::ScaledPatternListener));
    registry.register(Box::new(pattern::SpiralPatternListener));
    registry
}

impl Registry<dyn ObjectListener> {
    /// Write an object: discriminator, payload, then the flow frame,
    /// description and tag trailer.
    pub fn save(&self, out: &mut dyn FormatWriter, object: &CompleteObject) -> JdrResult<()> {
        let listener = self.listener_for(object.body.kind())?;
        let version = out.version();
        if let Projection::Projected(body) = listener.project(&object.body, version) {
            self.warn_projection(&*out, listener, body.kind());
            let projected = CompleteObject {
                body,
                flow_frame: object.flow_frame.clone(),
                description: object.description.clone(),
                tag: object.tag.clone(),
            };
            return self.save(out, &projected);
        }
        out.write_char(listener.id(version))?;
        listener.write(out, &object.body)?;
        self.write_trailer(out, object)
    }

    /// Write a shape without a trailer, as used inside patterns.
    pub fn save_shape(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
        let listener = self.listener_for(body.kind())?;
        let version = out.version();
        if let Projection::Projected(projected) = listener.project(body, version) {
            self.warn_projection(&*out, listener, projected.kind());
            return self.save_shape(out, &projected);
        }
        out.write_char(listener.id(version))?;
        listener.write(out, body)
    }

    /// Read an object and its trailer. The trailer is consumed even when
    /// the object itself is discarded.
    pub fn load(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<CompleteObject>> {
        let id = inp.read_char(FieldTag::ObjectId)?;
        let listener = self.resolve(&*inp, id, FieldTag::ObjectId)?;
        let body = listener.read(inp)?;

        let flow_frame = if inp.read_bool(FieldTag::FlowFrameFlag)? {
            Some(read_flow_frame(inp)?)
        } else {
            None
        };
        let description = if inp.supports(Feature::ObjectDescription) {
            inp.read_string(FieldTag::ObjectDescription)?
        } else {
            String::new()
        };
        let tag = if inp.supports(Feature::ObjectTag) {
            inp.read_string(FieldTag::ObjectTag)?
        } else {
            String::new()
        };

        Ok(body.map(|body| CompleteObject {
            body,
            flow_frame,
            description,
            tag,
        }))
    }

    /// Read a shape written by [`save_shape`](Self::save_shape).
    pub fn load_shape(&self, inp: &mut dyn FormatReader) -> JdrResult<ObjectBody> {
        let id = inp.read_char(FieldTag::PatternShape)?;
        let listener = self.resolve(&*inp, id, FieldTag::PatternShape)?;
        match listener.read(inp)? {
            Some(body) if body.is_shape() => Ok(body),
            _ => Err(inp.invalid_value(FieldTag::PatternShape, id.to_string())),
        }
    }

    fn write_trailer(&self, out: &mut dyn FormatWriter, object: &CompleteObject) -> JdrResult<()> {
        match &object.flow_frame {
            Some(frame) => {
                out.write_bool(true)?;
                write_flow_frame(out, frame)?;
            }
            None => out.write_bool(false)?,
        }
        if out.supports(Feature::ObjectDescription) {
            out.write_string(&object.description)?;
        } else if !object.description.is_empty() {
            out.omitted("object description");
        }
        if out.supports(Feature::ObjectTag) {
            out.write_string(&object.tag)?;
        } else if !object.tag.is_empty() {
            out.omitted("object tag");
        }
        Ok(())
    }
}
