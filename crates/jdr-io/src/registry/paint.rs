use jdr_types::{JdrVersion, Paint, PaintKind};

use crate::error::{JdrError, JdrResult};
use crate::handle::{FormatReader, FormatWriter};
use crate::listener::paint as listeners;
use crate::registry::{Listener, Projection, Registry};
use crate::tag::FieldTag;

/// Codec for one paint variant.
pub trait PaintListener: Listener<Id = char, Kind = PaintKind> {
    fn write(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()>;
    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint>;

    fn project(&self, _paint: &Paint, _version: JdrVersion) -> Projection<Paint> {
        Projection::Native
    }

    /// Id used by the configuration-string form.
    fn config_id(&self) -> u8;

    /// Fields after the config id, without a leading comma.
    fn config_fields(&self, paints: &Registry<dyn PaintListener>, paint: &Paint)
        -> JdrResult<String>;

    /// Parse the fields after the config id, returning the paint and the
    /// unparsed remainder.
    fn parse_config<'s>(
        &self,
        paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)>;
}

pub(crate) fn standard() -> Registry<dyn PaintListener> {
    let mut registry: Registry<dyn PaintListener> = Registry::new();
    registry.register(Box::new(listeners::TransparentListener));
    registry.register(Box::new(listeners::RgbListener));
    registry.register(Box::new(listeners::CmykListener));
    registry.register(Box::new(listeners::GradientListener));
    registry.register(Box::new(listeners::RadialListener));
    registry.register(Box::new(listeners::HsbListener));
    registry.register(Box::new(listeners::GreyListener));
    registry
}

impl Registry<dyn PaintListener> {
    pub fn save(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        let listener = self.listener_for(paint.kind())?;
        let version = out.version();
        if let Projection::Projected(projected) = listener.project(paint, version) {
            self.warn_projection(&*out, listener, projected.kind());
            return self.save(out, &projected);
        }
        out.write_char(listener.id(version))?;
        listener.write(out, paint)
    }

    pub fn load(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        let id = inp.read_char(FieldTag::PaintId)?;
        let listener = self.resolve(&*inp, id, FieldTag::PaintId)?;
        listener.read(inp)
    }

    /// Load a gradient stop, which must be a solid colour.
    pub fn load_solid(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        let paint = self.load(inp)?;
        if paint.is_solid() {
            Ok(paint)
        } else {
            Err(inp.invalid_value(FieldTag::GradientStop, paint.kind().to_string()))
        }
    }

    /// The compact configuration string for `paint`.
    pub fn config_string(&self, paint: &Paint) -> JdrResult<String> {
        let listener = self.listener_for(paint.kind())?;
        let fields = listener.config_fields(self, paint)?;
        if fields.is_empty() {
            Ok(listener.config_id().to_string())
        } else {
            Ok(format!("{},{fields}", listener.config_id()))
        }
    }

    /// Parse one paint from the start of `spec`, returning it with the
    /// unparsed remainder (after the separating comma, if any).
    pub fn parse_config<'s>(&self, spec: &'s str) -> JdrResult<(Paint, &'s str)> {
        let spec = spec.trim_start();
        let (head, rest) = match spec.find(',') {
            Some(i) => (&spec[..i], &spec[i + 1..]),
            None => (spec, ""),
        };
        let id: u8 = head.trim().parse().map_err(|_| JdrError::InvalidConfig {
            spec: spec.to_string(),
            reason: format!("'{head}' is not a paint id"),
        })?;
        let listener = self
            .iter()
            .find(|l| l.config_id() == id)
            .ok_or_else(|| JdrError::InvalidConfig {
                spec: spec.to_string(),
                reason: format!("unknown paint id {id}"),
            })?;
        listener.parse_config(self, rest)
    }

    /// Parse a complete specification; trailing text is an error.
    pub fn parse_config_str(&self, spec: &str) -> JdrResult<Paint> {
        let (paint, rest) = self.parse_config(spec)?;
        if rest.trim().is_empty() {
            Ok(paint)
        } else {
            Err(JdrError::InvalidConfig {
                spec: spec.to_string(),
                reason: format!("unexpected trailing text '{rest}'"),
            })
        }
    }
}
