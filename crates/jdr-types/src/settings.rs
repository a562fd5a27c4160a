use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::geom::Point;
use crate::grid::Grid;
use crate::unit::Unit;

/// How much canvas configuration accompanies the object tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SettingsFlag {
    #[serde(rename = "none")]
    NoSettings,
    #[default]
    #[serde(rename = "all")]
    AllSettings,
    #[serde(rename = "paper")]
    PaperOnly,
}

impl SettingsFlag {
    pub const fn id(self) -> u8 {
        match self {
            Self::NoSettings => 0,
            Self::AllSettings => 1,
            Self::PaperOnly => 2,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::NoSettings),
            1 => Ok(Self::AllSettings),
            2 => Ok(Self::PaperOnly),
            _ => Err(TypeError::InvalidSettingsFlag(id)),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NoSettings => "none",
            Self::AllSettings => "all",
            Self::PaperOnly => "paper",
        }
    }
}

impl fmt::Display for SettingsFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingsFlag {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::NoSettings),
            "all" => Ok(Self::AllSettings),
            "paper" => Ok(Self::PaperOnly),
            other => Err(TypeError::UnknownName {
                kind: "settings flag",
                name: other.to_string(),
            }),
        }
    }
}

/// Editing tool selected when the file was saved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Select,
    OpenLine,
    ClosedLine,
    OpenCurve,
    ClosedCurve,
    Rectangle,
    Ellipse,
    Text,
    MathText,
}

impl Tool {
    pub const ALL: [Tool; 9] = [
        Self::Select,
        Self::OpenLine,
        Self::ClosedLine,
        Self::OpenCurve,
        Self::ClosedCurve,
        Self::Rectangle,
        Self::Ellipse,
        Self::Text,
        Self::MathText,
    ];

    pub fn id(self) -> u8 {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0) as u8
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(TypeError::UnknownId {
                kind: "tool",
                id: id as i64,
            })
    }
}

/// Named paper sizes. Each has a portrait and a landscape wire id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Executive,
}

impl PaperSize {
    pub const ALL: [PaperSize; 9] = [
        Self::A0,
        Self::A1,
        Self::A2,
        Self::A3,
        Self::A4,
        Self::A5,
        Self::Letter,
        Self::Legal,
        Self::Executive,
    ];

    /// Portrait width and height in bp.
    pub const fn portrait_bp(self) -> (f64, f64) {
        match self {
            Self::A0 => (2383.94, 3370.39),
            Self::A1 => (1683.78, 2383.94),
            Self::A2 => (1190.55, 1683.78),
            Self::A3 => (841.89, 1190.55),
            Self::A4 => (595.28, 841.89),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Executive => (522.0, 756.0),
        }
    }
}

/// Page size of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Paper {
    Named { size: PaperSize, landscape: bool },
    /// User-defined dimensions in bp.
    User { width: f64, height: f64 },
}

impl Paper {
    pub const USER_ID: u8 = 18;

    pub const A4: Paper = Paper::Named {
        size: PaperSize::A4,
        landscape: false,
    };

    pub fn id(&self) -> u8 {
        match self {
            Self::Named { size, landscape } => {
                let index = PaperSize::ALL.iter().position(|s| s == size).unwrap_or(0) as u8;
                index * 2 + u8::from(*landscape)
            }
            Self::User { .. } => Self::USER_ID,
        }
    }

    /// Named paper for `id`; user-defined paper is read separately.
    pub fn named_from_id(id: u8) -> TypeResult<Self> {
        PaperSize::ALL
            .get((id / 2) as usize)
            .filter(|_| id < Self::USER_ID)
            .map(|size| Self::Named {
                size: *size,
                landscape: id % 2 == 1,
            })
            .ok_or(TypeError::UnknownId {
                kind: "paper",
                id: id as i64,
            })
    }

    /// Width and height in bp.
    pub fn size_bp(&self) -> (f64, f64) {
        match *self {
            Self::Named { size, landscape } => {
                let (w, h) = size.portrait_bp();
                if landscape {
                    (h, w)
                } else {
                    (w, h)
                }
            }
            Self::User { width, height } => (width, height),
        }
    }
}

impl Default for Paper {
    fn default() -> Self {
        Self::A4
    }
}

/// LaTeX export configuration stored with the drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatexSettings {
    /// Normal font size in points.
    pub normalsize: i32,
    pub preamble: String,
    pub mid_preamble: String,
    pub end_preamble: String,
    pub doc_body: String,
    pub magic_comments: String,
    pub doc_class: String,
    pub absolute_pages: bool,
}

impl Default for LatexSettings {
    fn default() -> Self {
        Self {
            normalsize: 10,
            preamble: String::new(),
            mid_preamble: String::new(),
            end_preamble: String::new(),
            doc_body: String::new(),
            magic_comments: String::new(),
            doc_class: String::new(),
            absolute_pages: false,
        }
    }
}

/// Canvas configuration that may be embedded in a file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub grid_lock: bool,
    pub show_rulers: bool,
    pub tool: Tool,
    pub grid: Grid,
    pub paper: Paper,
    pub storage_unit: Unit,
    pub origin: Point,
    pub latex: LatexSettings,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_lock: false,
            show_rulers: true,
            tool: Tool::Select,
            grid: Grid::default(),
            paper: Paper::default(),
            storage_unit: Unit::Bp,
            origin: Point::default(),
            latex: LatexSettings::default(),
        }
    }
}
