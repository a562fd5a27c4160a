use jdr_types::{Grid, GridKind, GridSpacing, JdrVersion, Unit};

use crate::error::{JdrError, JdrResult};
use crate::handle::{DoubleRange, FormatReader, FormatWriter};
use crate::registry::{GridListener, Listener, Projection};
use crate::tag::FieldTag;

fn wrong_variant(listener: &'static str, grid: &Grid) -> JdrError {
    JdrError::WrongVariant {
        listener,
        found: format!("{:?}", grid.kind()),
    }
}

fn read_unit(inp: &mut dyn FormatReader) -> JdrResult<Unit> {
    let id = inp.read_byte(FieldTag::GridUnit)?;
    Unit::from_id(id).map_err(|_| inp.invalid_value(FieldTag::GridUnit, id.to_string()))
}

fn write_spacing(out: &mut dyn FormatWriter, spacing: &GridSpacing) -> JdrResult<()> {
    out.write_byte(spacing.unit.id())?;
    out.write_double(spacing.major)?;
    out.write_int(spacing.subdivisions)
}

fn read_spacing(inp: &mut dyn FormatReader) -> JdrResult<GridSpacing> {
    let unit = read_unit(inp)?;
    let major = inp.read_double_in(FieldTag::GridMajor, DoubleRange::POSITIVE)?;
    let subdivisions = inp.read_int_in(FieldTag::GridSubdivisions, 0, i32::MAX)?;
    Ok(GridSpacing {
        unit,
        major,
        subdivisions,
    })
}

/// Rectangular fallback for grids `version` cannot hold.
fn project_grid(grid: &Grid, min_version: JdrVersion, version: JdrVersion) -> Projection<Grid> {
    if version >= min_version {
        Projection::Native
    } else {
        Projection::Projected(grid.to_rectangular())
    }
}

/// Grids whose payload is a bare [`GridSpacing`].
macro_rules! spacing_grid_listener {
    ($name:ident, $variant:ident, $id:literal, $type_name:literal $(, since $feature:ident)?) => {
        pub struct $name;
        impl_listener!($name, GridKind::$variant, u8 = $id, $type_name $(, since $feature)?);

        impl GridListener for $name {
            fn write(&self, out: &mut dyn FormatWriter, grid: &Grid) -> JdrResult<()> {
                match grid {
                    Grid::$variant(spacing) => write_spacing(out, spacing),
                    other => Err(wrong_variant(self.type_name(), other)),
                }
            }

            fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Grid> {
                Ok(Grid::$variant(read_spacing(inp)?))
            }

            fn project(&self, grid: &Grid, version: JdrVersion) -> Projection<Grid> {
                project_grid(grid, self.min_version(), version)
            }
        }
    };
}

spacing_grid_listener!(RectangularGridListener, Rectangular, 0, "rectangular grid");
spacing_grid_listener!(IsoGridListener, Iso, 2, "isometric grid", since IsoGrid);
spacing_grid_listener!(TschicholdGridListener, Tschichold, 3, "Tschichold grid", since TschicholdGrid);

/// `1`: rectangular spacing plus the number of spokes.
pub struct RadialGridListener;
impl_listener!(RadialGridListener, GridKind::Radial, u8 = 1, "radial grid", since RadialGrid);

impl GridListener for RadialGridListener {
    fn write(&self, out: &mut dyn FormatWriter, grid: &Grid) -> JdrResult<()> {
        let Grid::Radial { spacing, spokes } = grid else {
            return Err(wrong_variant(self.type_name(), grid));
        };
        write_spacing(out, spacing)?;
        out.write_int(*spokes)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Grid> {
        let spacing = read_spacing(inp)?;
        let spokes = inp.read_int_in(FieldTag::GridSpokes, 1, i32::MAX)?;
        Ok(Grid::Radial { spacing, spokes })
    }

    fn project(&self, grid: &Grid, version: JdrVersion) -> Projection<Grid> {
        project_grid(grid, self.min_version(), version)
    }
}

/// `4`: snapping to an arbitrary shape.
pub struct PathGridListener;
impl_listener!(PathGridListener, GridKind::Path, u8 = 4, "path grid", since PathGrid);

impl GridListener for PathGridListener {
    fn write(&self, out: &mut dyn FormatWriter, grid: &Grid) -> JdrResult<()> {
        let Grid::Path {
            unit,
            shape,
            subdivisions,
        } = grid
        else {
            return Err(wrong_variant(self.type_name(), grid));
        };
        out.write_byte(unit.id())?;
        out.write_shape(shape)?;
        out.write_int(*subdivisions)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Grid> {
        let unit = read_unit(inp)?;
        let shape = inp.read_shape()?;
        let subdivisions = inp.read_int_in(FieldTag::GridSubdivisions, 0, i32::MAX)?;
        Ok(Grid::Path {
            unit,
            shape,
            subdivisions,
        })
    }

    fn project(&self, grid: &Grid, version: JdrVersion) -> Projection<Grid> {
        project_grid(grid, self.min_version(), version)
    }
}
