use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::paint::Paint;
use crate::text::TextContent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CapStyle {
    #[default]
    Butt,
    Round,
    Square,
}

impl CapStyle {
    pub const fn id(self) -> u8 {
        match self {
            Self::Butt => 0,
            Self::Round => 1,
            Self::Square => 2,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Butt),
            1 => Ok(Self::Round),
            2 => Ok(Self::Square),
            _ => Err(TypeError::UnknownId {
                kind: "cap style",
                id: id as i64,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JoinStyle {
    #[default]
    Mitre,
    Round,
    Bevel,
}

impl JoinStyle {
    pub const fn id(self) -> u8 {
        match self {
            Self::Mitre => 0,
            Self::Round => 1,
            Self::Bevel => 2,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::Mitre),
            1 => Ok(Self::Round),
            2 => Ok(Self::Bevel),
            _ => Err(TypeError::UnknownId {
                kind: "join style",
                id: id as i64,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WindingRule {
    EvenOdd,
    #[default]
    NonZero,
}

impl WindingRule {
    pub const fn id(self) -> u8 {
        match self {
            Self::EvenOdd => 0,
            Self::NonZero => 1,
        }
    }

    pub fn from_id(id: u8) -> TypeResult<Self> {
        match id {
            0 => Ok(Self::EvenOdd),
            1 => Ok(Self::NonZero),
            _ => Err(TypeError::UnknownId {
                kind: "winding rule",
                id: id as i64,
            }),
        }
    }
}

/// Dash pattern. An empty pattern is a solid line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct DashPattern {
    pub pattern: Vec<f64>,
    pub offset: f64,
}

impl DashPattern {
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn is_solid(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// Highest marker type id.
pub const MAX_MARKER_TYPE: i32 = 84;

/// Start, mid or end marker of a path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Marker shape id; `0` means no marker.
    pub kind: i32,
    pub size: f64,
    pub repeated: bool,
    pub reversed: bool,
    pub auto_orient: bool,
    /// Orientation in radians when `auto_orient` is off.
    pub angle: f64,
    pub user_offset: Option<f64>,
    pub repeat_offset: Option<f64>,
    /// Own paint; `None` uses the path's line paint.
    pub paint: Option<Paint>,
    pub composite: Option<Box<Marker>>,
}

impl Marker {
    pub fn none() -> Self {
        Self {
            kind: 0,
            size: 5.0,
            repeated: false,
            reversed: false,
            auto_orient: true,
            angle: 0.0,
            user_offset: None,
            repeat_offset: None,
            paint: None,
            composite: None,
        }
    }

    pub fn of_kind(kind: i32, size: f64) -> Self {
        Self {
            kind,
            size,
            ..Self::none()
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == 0
    }

    /// Whether any field beyond type, size, repeat and reverse is set.
    pub fn has_extended_fields(&self) -> bool {
        !self.auto_orient
            || self.angle != 0.0
            || self.user_offset.is_some()
            || self.repeat_offset.is_some()
            || self.paint.is_some()
            || self.composite.is_some()
    }

    /// The same marker with only the basic fields kept.
    pub fn basic(&self) -> Marker {
        Marker {
            kind: self.kind,
            size: self.size,
            repeated: self.repeated,
            reversed: self.reversed,
            ..Marker::none()
        }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::none()
    }
}

/// Stroke of an ordinary path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasicStyle {
    pub pen_width: f64,
    pub cap: CapStyle,
    pub join: JoinStyle,
    pub mitre_limit: f64,
    pub dash: DashPattern,
    pub start_marker: Marker,
    pub mid_marker: Marker,
    pub end_marker: Marker,
    pub winding: WindingRule,
}

impl BasicStyle {
    pub fn has_markers(&self) -> bool {
        !(self.start_marker.is_none() && self.mid_marker.is_none() && self.end_marker.is_none())
    }
}

impl Default for BasicStyle {
    fn default() -> Self {
        Self {
            pen_width: 1.0,
            cap: CapStyle::Butt,
            join: JoinStyle::Mitre,
            mitre_limit: 10.0,
            dash: DashPattern::solid(),
            start_marker: Marker::none(),
            mid_marker: Marker::none(),
            end_marker: Marker::none(),
            winding: WindingRule::NonZero,
        }
    }
}

/// Stroke of a text path: text laid along the path outline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct TextPathStyle {
    pub content: TextContent,
}

/// How a path outline is drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathStyle {
    Basic(BasicStyle),
    TextPath(TextPathStyle),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathStyleKind {
    Basic,
    TextPath,
}

impl PathStyle {
    pub fn kind(&self) -> PathStyleKind {
        match self {
            Self::Basic(_) => PathStyleKind::Basic,
            Self::TextPath(_) => PathStyleKind::TextPath,
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::Basic(BasicStyle::default())
    }
}
