use jdr_types::{JdrVersion, PathStyle, PathStyleKind};

use crate::error::JdrResult;
use crate::handle::{FormatReader, FormatWriter};
use crate::listener::style as listeners;
use crate::registry::{Listener, Projection, Registry};
use crate::tag::FieldTag;

/// Codec for one path style variant. Discriminators are bytes.
pub trait PathStyleListener: Listener<Id = u8, Kind = PathStyleKind> {
    fn write(&self, out: &mut dyn FormatWriter, style: &PathStyle) -> JdrResult<()>;
    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<PathStyle>;

    fn project(&self, _style: &PathStyle, _version: JdrVersion) -> Projection<PathStyle> {
        Projection::Native
    }
}

pub(crate) fn standard() -> Registry<dyn PathStyleListener> {
    let mut registry: Registry<dyn PathStyleListener> = Registry::new();
    registry.register(Box::new(listeners::BasicStyleListener));
    registry.register(Box::new(listeners::TextPathStyleListener));
    registry
}

impl Registry<dyn PathStyleListener> {
    pub fn save(&self, out: &mut dyn FormatWriter, style: &PathStyle) -> JdrResult<()> {
        let listener = self.listener_for(style.kind())?;
        let version = out.version();
        if let Projection::Projected(projected) = listener.project(style, version) {
            self.warn_projection(&*out, listener, projected.kind());
            return self.save(out, &projected);
        }
        out.write_byte(listener.id(version))?;
        listener.write(out, style)
    }

    pub fn load(&self, inp: &mut dyn FormatReader) -> JdrResult<PathStyle> {
        let id = inp.read_byte(FieldTag::PathStyleId)?;
        let listener = self.resolve(&*inp, id, FieldTag::PathStyleId)?;
        listener.read(inp)
    }
}
