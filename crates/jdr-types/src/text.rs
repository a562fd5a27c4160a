use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::geom::Transform;
use crate::paint::Paint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontSeries {
    #[default]
    Medium,
    Bold,
}

impl FontSeries {
    pub const fn id(self) -> u8 {
        match self {
            Self::Medium => 0,
            Self::Bold => 1,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Medium),
            1 => Ok(Self::Bold),
            _ => Err(TypeError::UnknownId {
                kind: "font series",
                id: id as i64,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontShape {
    #[default]
    Upright,
    Italic,
}

impl FontShape {
    pub const fn id(self) -> u8 {
        match self {
            Self::Upright => 0,
            Self::Italic => 1,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Upright),
            1 => Ok(Self::Italic),
            _ => Err(TypeError::UnknownId {
                kind: "font shape",
                id: id as i64,
            }),
        }
    }
}

/// Font used to render text on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub series: FontSeries,
    pub shape: FontShape,
    /// Size in storage units; strictly positive.
    pub size: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Serif".into(),
            series: FontSeries::Medium,
            shape: FontShape::Upright,
            size: 10.0,
        }
    }
}

/// LaTeX font declarations emitted for the text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatexFont {
    pub family: String,
    pub size: String,
    pub series: String,
    pub shape: String,
}

impl Default for LatexFont {
    fn default() -> Self {
        Self {
            family: "\\rmfamily".into(),
            size: "\\normalsize".into(),
            series: "\\mdseries".into(),
            shape: "\\upshape".into(),
        }
    }
}

/// Font, transformation and text shared by text objects and text-path styles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct TextContent {
    pub font: FontSpec,
    pub latex_font: LatexFont,
    pub transform: Transform,
    pub text: String,
    /// Alternative text used when exporting to LaTeX.
    pub latex_text: Option<String>,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HAlign {
    #[default]
    Left,
    Centre,
    Right,
}

impl HAlign {
    pub const fn id(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Centre => 1,
            Self::Right => 2,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Left),
            1 => Ok(Self::Centre),
            2 => Ok(Self::Right),
            _ => Err(TypeError::UnknownId {
                kind: "horizontal alignment",
                id: id as i64,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VAlign {
    Top,
    Centre,
    #[default]
    Base,
    Bottom,
}

impl VAlign {
    pub const fn id(self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Centre => 1,
            Self::Base => 2,
            Self::Bottom => 3,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Top),
            1 => Ok(Self::Centre),
            2 => Ok(Self::Base),
            3 => Ok(Self::Bottom),
            _ => Err(TypeError::UnknownId {
                kind: "vertical alignment",
                id: id as i64,
            }),
        }
    }
}

/// A text object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Text {
    pub paint: Paint,
    pub content: TextContent,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content: TextContent::new(text),
            ..Default::default()
        }
    }
}
