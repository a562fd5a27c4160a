use std::fmt;

macro_rules! field_tags {
    ($($variant:ident => $name:literal, $describe:literal;)+) => {
        /// Identifies the field being read when a value turns out to be invalid.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum FieldTag {
            $($variant,)+
        }

        impl FieldTag {
            pub const ALL: &'static [FieldTag] = &[$(Self::$variant,)+];

            /// Symbolic name, e.g. `PAINT_ID`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Human-readable description of what was invalid.
            pub const fn describe(self) -> &'static str {
                match self {
                    $(Self::$variant => $describe,)+
                }
            }
        }
    };
}

field_tags! {
    FormatTag => "FORMAT_TAG", "Invalid file format tag";
    Version => "VERSION", "Invalid file version";
    Encoding => "ENCODING", "Invalid or mismatched character encoding";
    StorageUnit => "STORAGE_UNIT", "Invalid storage unit";
    OriginX => "ORIGIN_X", "Invalid origin x coordinate";
    OriginY => "ORIGIN_Y", "Invalid origin y coordinate";
    SettingsFlag => "SETTINGS_FLAG", "Invalid settings flag";
    GridLock => "SETTING_GRID_LOCK", "Invalid grid lock setting";
    ShowRulers => "SETTING_SHOW_RULERS", "Invalid ruler setting";
    Tool => "SETTING_TOOL", "Invalid tool id";
    Paper => "SETTING_PAPER", "Invalid paper id";
    PaperWidth => "SETTING_PAPER_WIDTH", "Invalid paper width";
    PaperHeight => "SETTING_PAPER_HEIGHT", "Invalid paper height";
    Normalsize => "SETTING_NORMALSIZE", "Invalid normal font size";
    Preamble => "SETTING_PREAMBLE", "Invalid preamble";
    MidPreamble => "SETTING_MID_PREAMBLE", "Invalid mid preamble";
    EndPreamble => "SETTING_END_PREAMBLE", "Invalid end preamble";
    DocBody => "SETTING_DOC_BODY", "Invalid document body";
    MagicComments => "SETTING_MAGIC_COMMENTS", "Invalid magic comments";
    DocClass => "SETTING_DOC_CLASS", "Invalid document class";
    AbsolutePages => "SETTING_ABSOLUTE_PAGES", "Invalid absolute pages setting";
    ObjectId => "OBJECT_ID", "Invalid object id";
    ObjectDescription => "OBJECT_DESCRIPTION", "Invalid object description";
    ObjectTag => "OBJECT_TAG", "Invalid object tag";
    FlowFrameFlag => "FLOWFRAME_FLAG", "Invalid flow frame flag";
    FlowFrameType => "FLOWFRAME_TYPE", "Invalid flow frame type";
    FlowFrameBorder => "FLOWFRAME_BORDER", "Invalid flow frame border flag";
    FlowFrameLabel => "FLOWFRAME_LABEL", "Invalid flow frame label";
    FlowFramePages => "FLOWFRAME_PAGES", "Invalid flow frame page list";
    FlowFrameMargin => "FLOWFRAME_MARGIN", "Invalid flow frame margin";
    FlowFrameShape => "FLOWFRAME_SHAPE", "Invalid flow frame paragraph shape";
    FlowFrameValign => "FLOWFRAME_VALIGN", "Invalid flow frame alignment";
    FlowFrameContents => "FLOWFRAME_CONTENTS", "Invalid flow frame contents";
    GroupSize => "GROUP_SIZE", "Invalid group size";
    PathOpenClose => "PATH_OPEN_CLOSE", "Invalid path open/closed character";
    PathSize => "PATH_SIZE", "Invalid number of path segments";
    Coordinate => "COORDINATE", "Invalid coordinate";
    AnchorIndex => "ANCHOR_INDEX", "Invalid anchor index";
    SegmentId => "SEGMENT_ID", "Invalid segment id";
    PaintId => "PAINT_ID", "Invalid paint id";
    Red => "RED", "Invalid red value";
    Green => "GREEN", "Invalid green value";
    Blue => "BLUE", "Invalid blue value";
    Alpha => "ALPHA", "Invalid alpha value";
    Cyan => "CYAN", "Invalid cyan value";
    Magenta => "MAGENTA", "Invalid magenta value";
    Yellow => "YELLOW", "Invalid yellow value";
    Black => "BLACK", "Invalid black value";
    Hue => "HUE", "Invalid hue value";
    Saturation => "SATURATION", "Invalid saturation value";
    Brightness => "BRIGHTNESS", "Invalid brightness value";
    Grey => "GREY", "Invalid grey value";
    GradientStop => "GRADIENT_STOP", "Invalid gradient stop colour";
    GradientMidFlag => "GRADIENT_MID_FLAG", "Invalid gradient mid stop flag";
    GradientDirection => "GRADIENT_DIRECTION", "Invalid gradient direction";
    RadialLocation => "RADIAL_START_LOCATION", "Invalid radial start location";
    PathStyleId => "PATH_STYLE_ID", "Invalid path style id";
    PenWidth => "PEN_WIDTH", "Invalid pen width";
    CapStyle => "CAP_STYLE", "Invalid cap style";
    JoinStyle => "JOIN_STYLE", "Invalid join style";
    MitreLimit => "MITRE_LIMIT", "Invalid mitre limit";
    DashLength => "DASH_LENGTH", "Invalid dash pattern length";
    DashValue => "DASH_VALUE", "Invalid dash pattern value";
    DashOffset => "DASH_OFFSET", "Invalid dash offset";
    WindingRule => "WINDING_RULE", "Invalid winding rule";
    MarkerType => "MARKER_TYPE", "Invalid marker type";
    MarkerSize => "MARKER_SIZE", "Invalid marker size";
    MarkerFlag => "MARKER_FLAG", "Invalid marker flag";
    MarkerAngle => "MARKER_ANGLE", "Invalid marker angle";
    MarkerOffset => "MARKER_OFFSET", "Invalid marker offset";
    FontFamily => "FONT_FAMILY", "Invalid font family";
    FontSeries => "FONT_SERIES", "Invalid font series";
    FontShape => "FONT_SHAPE", "Invalid font shape";
    FontSize => "FONT_SIZE", "Invalid font size";
    LatexFont => "LATEX_FONT", "Invalid LaTeX font declaration";
    LatexTextFlag => "LATEX_TEXT_FLAG", "Invalid LaTeX text flag";
    LatexText => "LATEX_TEXT", "Invalid LaTeX text";
    Text => "TEXT", "Invalid text";
    HAlign => "TEXT_HALIGN", "Invalid horizontal text alignment";
    VAlign => "TEXT_VALIGN", "Invalid vertical text alignment";
    Transform => "TRANSFORM", "Invalid transformation matrix";
    BitmapFilename => "BITMAP_FILENAME", "Invalid bitmap filename";
    BitmapLatexFlag => "BITMAP_LATEX_FLAG", "Invalid bitmap LaTeX link flag";
    BitmapLatexFilename => "BITMAP_LATEX_FILENAME", "Invalid bitmap LaTeX filename";
    BitmapCommand => "BITMAP_COMMAND", "Invalid bitmap LaTeX command";
    SymmetryAnchored => "SYMMETRY_ANCHORED", "Invalid symmetry anchor flag";
    SymmetryJoinFlag => "SYMMETRY_JOIN_FLAG", "Invalid symmetry join flag";
    SymmetryJoin => "SYMMETRY_JOIN", "Invalid symmetry join segment";
    PatternShape => "PATTERN_SHAPE", "Invalid pattern underlying shape";
    PatternAdjustFlag => "PATTERN_ADJUST_FLAG", "Invalid pattern adjust flag";
    PatternReplicas => "PATTERN_REPLICAS", "Invalid number of pattern replicas";
    PatternFlag => "PATTERN_FLAG", "Invalid pattern flag";
    PatternAngle => "PATTERN_ANGLE", "Invalid pattern angle";
    PatternScale => "PATTERN_SCALE", "Invalid pattern scale factor";
    PatternDistance => "PATTERN_DISTANCE", "Invalid pattern distance";
    GridId => "GRID_ID", "Invalid grid id";
    GridUnit => "GRID_UNIT", "Invalid grid unit";
    GridMajor => "GRID_MAJOR", "Invalid grid major interval";
    GridSubdivisions => "GRID_SUBDIVISIONS", "Invalid grid subdivisions";
    GridSpokes => "GRID_SPOKES", "Invalid number of radial grid spokes";
    ShapeSize => "SHAPE_SIZE", "Invalid shape size";
    ShapeOp => "SHAPE_OPERATION", "Invalid shape operation";
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn symbolic_names_are_unique() {
        let names: HashSet<_> = FieldTag::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names.len(), FieldTag::ALL.len());
    }

    #[test]
    fn display_uses_symbolic_name() {
        assert_eq!(FieldTag::PaintId.to_string(), "PAINT_ID");
        assert_eq!(FieldTag::AnchorIndex.describe(), "Invalid anchor index");
    }
}
