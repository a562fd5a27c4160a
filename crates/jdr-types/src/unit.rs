use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// A TeX length unit.
///
/// Drawings are stored in a single storage unit; grids carry their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// TeX point (1/72.27 in).
    Pt,
    In,
    Cm,
    /// PostScript (big) point (1/72 in).
    #[default]
    Bp,
    Mm,
    /// Pica (12 pt).
    Pc,
    /// Didot point.
    Dd,
    /// Cicero (12 dd).
    Cc,
    /// Scaled point (1/65536 pt).
    Sp,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Self::Pt,
        Self::In,
        Self::Cm,
        Self::Bp,
        Self::Mm,
        Self::Pc,
        Self::Dd,
        Self::Cc,
        Self::Sp,
    ];

    /// Wire id.
    pub const fn id(self) -> u8 {
        match self {
            Self::Pt => 0,
            Self::In => 1,
            Self::Cm => 2,
            Self::Bp => 3,
            Self::Mm => 4,
            Self::Pc => 5,
            Self::Dd => 6,
            Self::Cc => 7,
            Self::Sp => 8,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        Self::ALL
            .into_iter()
            .find(|u| u.id() == id)
            .ok_or(TypeError::UnknownId {
                kind: "unit",
                id: id as i64,
            })
    }

    /// Size of one unit in PostScript points.
    pub fn to_bp(self) -> f64 {
        const PT: f64 = 72.0 / 72.27;
        match self {
            Self::Pt => PT,
            Self::In => 72.0,
            Self::Cm => 72.0 / 2.54,
            Self::Bp => 1.0,
            Self::Mm => 72.0 / 25.4,
            Self::Pc => 12.0 * PT,
            Self::Dd => 1238.0 / 1157.0 * PT,
            Self::Cc => 12.0 * 1238.0 / 1157.0 * PT,
            Self::Sp => PT / 65536.0,
        }
    }

    /// Convert `value` expressed in `self` into `target` units.
    pub fn convert(self, value: f64, target: Unit) -> f64 {
        if self == target {
            value
        } else {
            value * self.to_bp() / target.to_bp()
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Bp => "bp",
            Self::Mm => "mm",
            Self::Pc => "pc",
            Self::Dd => "dd",
            Self::Cc => "cc",
            Self::Sp => "sp",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
