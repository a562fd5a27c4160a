use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameType {
    Static,
    Flow,
    Dynamic,
    Typeblock,
}

impl FrameType {
    pub const fn id(self) -> u8 {
        match self {
            Self::Static => 0,
            Self::Flow => 1,
            Self::Dynamic => 2,
            Self::Typeblock => 3,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Static),
            1 => Ok(Self::Flow),
            2 => Ok(Self::Dynamic),
            3 => Ok(Self::Typeblock),
            _ => Err(TypeError::UnknownId {
                kind: "frame type",
                id: id as i64,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParagraphShape {
    #[default]
    Standard,
    Parshape,
    Shapepar,
}

impl ParagraphShape {
    pub const fn id(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Parshape => 1,
            Self::Shapepar => 2,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Standard),
            1 => Ok(Self::Parshape),
            2 => Ok(Self::Shapepar),
            _ => Err(TypeError::UnknownId {
                kind: "paragraph shape",
                id: id as i64,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FrameVAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl FrameVAlign {
    pub const fn id(self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Middle => 1,
            Self::Bottom => 2,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Top),
            1 => Ok(Self::Middle),
            2 => Ok(Self::Bottom),
            _ => Err(TypeError::UnknownId {
                kind: "frame alignment",
                id: id as i64,
            }),
        }
    }
}

/// LaTeX page-flow placement attached to a top-level object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowFrame {
    pub frame_type: FrameType,
    pub border: bool,
    pub label: String,
    /// Page list, e.g. `all`, `odd`, `1,3-5`.
    pub pages: String,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub shape: ParagraphShape,
    pub valign: FrameVAlign,
    /// Initial contents of a static or dynamic frame.
    pub contents: String,
}

impl FlowFrame {
    pub fn new(frame_type: FrameType, label: impl Into<String>) -> Self {
        Self {
            frame_type,
            border: false,
            label: label.into(),
            pages: "all".into(),
            top: 0.0,
            bottom: 0.0,
            left: 0.0,
            right: 0.0,
            shape: ParagraphShape::Standard,
            valign: FrameVAlign::Top,
            contents: String::new(),
        }
    }
}
