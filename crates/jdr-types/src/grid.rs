use serde::{Deserialize, Serialize};

use crate::geom::Shape;
use crate::unit::Unit;

/// Spacing shared by the regular grids.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpacing {
    pub unit: Unit,
    /// Major interval in `unit`; strictly positive.
    pub major: f64,
    /// Minor divisions per major interval.
    pub subdivisions: i32,
}

impl Default for GridSpacing {
    fn default() -> Self {
        Self {
            unit: Unit::Bp,
            major: 100.0,
            subdivisions: 10,
        }
    }
}

/// Canvas snapping grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Grid {
    Rectangular(GridSpacing),
    Radial { spacing: GridSpacing, spokes: i32 },
    Iso(GridSpacing),
    Tschichold(GridSpacing),
    Path {
        unit: Unit,
        shape: Shape,
        subdivisions: i32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridKind {
    Rectangular,
    Radial,
    Iso,
    Tschichold,
    Path,
}

impl Grid {
    pub fn kind(&self) -> GridKind {
        match self {
            Self::Rectangular(_) => GridKind::Rectangular,
            Self::Radial { .. } => GridKind::Radial,
            Self::Iso(_) => GridKind::Iso,
            Self::Tschichold(_) => GridKind::Tschichold,
            Self::Path { .. } => GridKind::Path,
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Self::Rectangular(s) | Self::Iso(s) | Self::Tschichold(s) => s.unit,
            Self::Radial { spacing, .. } => spacing.unit,
            Self::Path { unit, .. } => *unit,
        }
    }

    /// Rectangular grid with the nearest equivalent spacing.
    pub fn to_rectangular(&self) -> Grid {
        match self {
            Self::Rectangular(s) | Self::Iso(s) | Self::Tschichold(s) => Self::Rectangular(*s),
            Self::Radial { spacing, .. } => Self::Rectangular(*spacing),
            Self::Path {
                unit, subdivisions, ..
            } => Self::Rectangular(GridSpacing {
                unit: *unit,
                subdivisions: *subdivisions,
                ..GridSpacing::default()
            }),
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::Rectangular(GridSpacing::default())
    }
}
