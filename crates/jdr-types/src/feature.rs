use crate::version::JdrVersion;

/// A version-gated part of the file format.
///
/// Writers and readers consult the same table, so a field's threshold is
/// stated exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    HsbPaint,
    GreyPaint,
    RadialPaint,
    Markers,
    ObjectDescription,
    LatexText,
    BitmapLatex,
    WindingRule,
    SettingsFlagByte,
    PathStartPoint,
    ExtendedMarkers,
    TextPath,
    TextAnchors,
    SymmetricPath,
    PartialSegments,
    ClosingMoveId,
    FlowFrameShape,
    PathAnchors,
    StorageUnit,
    LatexBlock,
    UnscaledTransform,
    RadialGrid,
    Patterns,
    MidEndPreamble,
    IsoGrid,
    TschicholdGrid,
    FlowFrameContents,
    Origin,
    DocumentBody,
    MagicComments,
    ObjectTag,
    ClosingMove,
    PathGrid,
    CharsetToken,
    GradientMidStop,
}

impl Feature {
    pub const ALL: [Feature; 35] = [
        Self::HsbPaint,
        Self::GreyPaint,
        Self::RadialPaint,
        Self::Markers,
        Self::ObjectDescription,
        Self::LatexText,
        Self::BitmapLatex,
        Self::WindingRule,
        Self::SettingsFlagByte,
        Self::PathStartPoint,
        Self::ExtendedMarkers,
        Self::TextPath,
        Self::TextAnchors,
        Self::SymmetricPath,
        Self::PartialSegments,
        Self::ClosingMoveId,
        Self::FlowFrameShape,
        Self::PathAnchors,
        Self::StorageUnit,
        Self::LatexBlock,
        Self::UnscaledTransform,
        Self::RadialGrid,
        Self::Patterns,
        Self::MidEndPreamble,
        Self::IsoGrid,
        Self::TschicholdGrid,
        Self::FlowFrameContents,
        Self::Origin,
        Self::DocumentBody,
        Self::MagicComments,
        Self::ObjectTag,
        Self::ClosingMove,
        Self::PathGrid,
        Self::CharsetToken,
        Self::GradientMidStop,
    ];

    /// The first version that can represent this feature.
    pub const fn min_version(self) -> JdrVersion {
        use JdrVersion as V;
        match self {
            Self::HsbPaint | Self::GreyPaint | Self::RadialPaint | Self::Markers => V::V1_1,
            Self::ObjectDescription | Self::LatexText | Self::BitmapLatex | Self::WindingRule => {
                V::V1_2
            }
            Self::SettingsFlagByte | Self::PathStartPoint => V::V1_3,
            Self::ExtendedMarkers => V::V1_4,
            Self::TextPath | Self::TextAnchors => V::V1_5,
            Self::SymmetricPath
            | Self::PartialSegments
            | Self::ClosingMoveId
            | Self::FlowFrameShape => V::V1_6,
            Self::PathAnchors => V::V1_7,
            Self::StorageUnit
            | Self::LatexBlock
            | Self::UnscaledTransform
            | Self::RadialGrid
            | Self::Patterns => V::V1_8,
            Self::MidEndPreamble => V::V1_9,
            Self::IsoGrid | Self::TschicholdGrid | Self::FlowFrameContents => V::V2_0,
            Self::Origin
            | Self::DocumentBody
            | Self::MagicComments
            | Self::ObjectTag
            | Self::ClosingMove
            | Self::PathGrid => V::V2_1,
            Self::CharsetToken | Self::GradientMidStop => V::V2_2,
        }
    }

    /// Whether `version` can represent this feature.
    pub fn is_supported_by(self, version: JdrVersion) -> bool {
        version >= self.min_version()
    }

    /// Short human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::HsbPaint => "HSB paint",
            Self::GreyPaint => "grey paint",
            Self::RadialPaint => "radial gradient paint",
            Self::Markers => "path markers",
            Self::ObjectDescription => "object descriptions",
            Self::LatexText => "LaTeX text alternatives and fonts",
            Self::BitmapLatex => "bitmap LaTeX link and command",
            Self::WindingRule => "winding rule",
            Self::SettingsFlagByte => "paper-only settings flag",
            Self::PathStartPoint => "explicit path start point",
            Self::ExtendedMarkers => "marker orientation, offsets, paint and composites",
            Self::TextPath => "text paths",
            Self::TextAnchors => "text anchors",
            Self::SymmetricPath => "symmetric paths",
            Self::PartialSegments => "partial segments",
            Self::ClosingMoveId => "closing-move discriminator",
            Self::FlowFrameShape => "flow frame paragraph shape and alignment",
            Self::PathAnchors => "path anchor indices",
            Self::StorageUnit => "storage unit",
            Self::LatexBlock => "LaTeX settings block",
            Self::UnscaledTransform => "unscaled transform translation",
            Self::RadialGrid => "radial grid",
            Self::Patterns => "pattern objects",
            Self::MidEndPreamble => "mid and end preamble",
            Self::IsoGrid => "isometric grid",
            Self::TschicholdGrid => "Tschichold grid",
            Self::FlowFrameContents => "flow frame contents",
            Self::Origin => "canvas origin",
            Self::DocumentBody => "document body",
            Self::MagicComments => "magic comments",
            Self::ObjectTag => "object tags",
            Self::ClosingMove => "closing moves",
            Self::PathGrid => "path grid",
            Self::CharsetToken => "AJR charset token",
            Self::GradientMidStop => "gradient mid stop",
        }
    }

    /// Features first available at exactly `version`.
    pub fn introduced_in(version: JdrVersion) -> impl Iterator<Item = Feature> {
        Self::ALL.into_iter().filter(move |f| f.min_version() == version)
    }
}
