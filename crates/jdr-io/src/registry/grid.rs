use jdr_types::{Feature, Grid, GridKind, JdrVersion};

use crate::error::JdrResult;
use crate::handle::{FormatReader, FormatWriter};
use crate::listener::grid as listeners;
use crate::registry::{Listener, Projection, Registry};
use crate::tag::FieldTag;

/// Grid ids were introduced together with the radial grid. Older files
/// hold a bare rectangular grid payload.
const GRID_IDS: Feature = Feature::RadialGrid;

/// Codec for one grid variant. Discriminators are bytes.
pub trait GridListener: Listener<Id = u8, Kind = GridKind> {
    fn write(&self, out: &mut dyn FormatWriter, grid: &Grid) -> JdrResult<()>;
    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Grid>;

    fn project(&self, _grid: &Grid, _version: JdrVersion) -> Projection<Grid> {
        Projection::Native
    }
}

pub(crate) fn standard() -> Registry<dyn GridListener> {
    let mut registry: Registry<dyn GridListener> = Registry::new();
    registry.register(Box::new(listeners::RectangularGridListener));
    registry.register(Box::new(listeners::RadialGridListener));
    registry.register(Box::new(listeners::IsoGridListener));
    registry.register(Box::new(listeners::TschicholdGridListener));
    registry.register(Box::new(listeners::PathGridListener));
    registry
}

impl Registry<dyn GridListener> {
    pub fn save(&self, out: &mut dyn FormatWriter, grid: &Grid) -> JdrResult<()> {
        let listener = self.listener_for(grid.kind())?;
        let version = out.version();
        if let Projection::Projected(projected) = listener.project(grid, version) {
            self.warn_projection(&*out, listener, projected.kind());
            return self.save(out, &projected);
        }
        if out.supports(GRID_IDS) {
            out.write_byte(listener.id(version))?;
        }
        listener.write(out, grid)
    }

    pub fn load(&self, inp: &mut dyn FormatReader) -> JdrResult<Grid> {
        let listener = if inp.supports(GRID_IDS) {
            let id = inp.read_byte(FieldTag::GridId)?;
            self.resolve(&*inp, id, FieldTag::GridId)?
        } else {
            self.listener_for(GridKind::Rectangular)?
        };
        listener.read(inp)
    }
}
