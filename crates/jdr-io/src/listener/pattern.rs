//! Rotational, scaled and spiral patterns. They share a payload and differ
//! only in their trailing parameters.

use jdr_types::{Feature, JdrVersion, ObjectBody, ObjectKind, Pattern, PatternKind};

use crate::error::{JdrError, JdrResult};
use crate::handle::{DoubleRange, FormatReader, FormatWriter};
use crate::registry::{Listener, ObjectListener, Projection};
use crate::tag::FieldTag;

fn write_pattern(out: &mut dyn FormatWriter, pattern: &Pattern) -> JdrResult<()> {
    out.registries().objects.save_shape(out, &pattern.underlying)?;
    out.write_point(pattern.anchor)?;
    match pattern.adjust {
        Some(adjust) => {
            out.write_bool(true)?;
            out.write_point(adjust)?;
        }
        None => out.write_bool(false)?,
    }
    out.write_int(pattern.replicas)?;
    out.write_bool(pattern.single_path)?;
    out.write_bool(pattern.show_original)?;
    match pattern.kind {
        PatternKind::Rotational { angle } => out.write_double(angle),
        PatternKind::Scaled { scale_x, scale_y } => {
            out.write_double(scale_x)?;
            out.write_double(scale_y)
        }
        PatternKind::Spiral { angle, distance } => {
            out.write_double(angle)?;
            out.write_double(distance)
        }
    }
}

/// Everything but the kind-specific parameters, which `read_kind` supplies.
fn read_pattern(
    inp: &mut dyn FormatReader,
    read_kind: fn(&mut dyn FormatReader) -> JdrResult<PatternKind>,
) -> JdrResult<Option<ObjectBody>> {
    let underlying = inp.registries().objects.load_shape(inp)?;
    let anchor = inp.read_point(FieldTag::Coordinate)?;
    let adjust = if inp.read_bool(FieldTag::PatternAdjustFlag)? {
        Some(inp.read_point(FieldTag::Coordinate)?)
    } else {
        None
    };
    let replicas = inp.read_int_in(FieldTag::PatternReplicas, 1, i32::MAX)?;
    let single_path = inp.read_bool(FieldTag::PatternFlag)?;
    let show_original = inp.read_bool(FieldTag::PatternFlag)?;
    let kind = read_kind(inp)?;
    Ok(Some(ObjectBody::Pattern(Pattern {
        kind,
        underlying: Box::new(underlying),
        anchor,
        adjust,
        replicas,
        single_path,
        show_original,
    })))
}

fn pattern_of<'a>(listener: &'static str, body: &'a ObjectBody) -> JdrResult<&'a Pattern> {
    match body {
        ObjectBody::Pattern(pattern) => Ok(pattern),
        other => Err(JdrError::WrongVariant {
            listener,
            found: other.kind().to_string(),
        }),
    }
}

fn project_pattern(body: &ObjectBody, version: JdrVersion) -> Projection<ObjectBody> {
    match body {
        ObjectBody::Pattern(pattern) if !Feature::Patterns.is_supported_by(version) => {
            Projection::Projected((*pattern.underlying).clone())
        }
        _ => Projection::Native,
    }
}

macro_rules! pattern_listener {
    ($name:ident, $kind:ident, $id:literal, $type_name:literal, $read_kind:expr) => {
        pub struct $name;
        impl_listener!($name, ObjectKind::$kind, char = $id, $type_name, since Patterns);

        impl ObjectListener for $name {
            fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
                write_pattern(out, pattern_of(self.type_name(), body)?)
            }

            fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>> {
                read_pattern(inp, $read_kind)
            }

            fn project(&self, body: &ObjectBody, version: JdrVersion) -> Projection<ObjectBody> {
                project_pattern(body, version)
            }
        }
    };
}

pattern_listener!(RotationalPatternListener, RotationalPattern, 'R', "rotational pattern", |inp| {
    Ok(PatternKind::Rotational {
        angle: inp.read_double_in(FieldTag::PatternAngle, DoubleRange::FINITE)?,
    })
});

pattern_listener!(ScaledPatternListener, ScaledPattern, 'C', "scaled pattern", |inp| {
    Ok(PatternKind::Scaled {
        scale_x: inp.read_double_in(FieldTag::PatternScale, DoubleRange::FINITE)?,
        scale_y: inp.read_double_in(FieldTag::PatternScale, DoubleRange::FINITE)?,
    })
});

pattern_listener!(SpiralPatternListener, SpiralPattern, 'L', "spiral pattern", |inp| {
    Ok(PatternKind::Spiral {
        angle: inp.read_double_in(FieldTag::PatternAngle, DoubleRange::FINITE)?,
        distance: inp.read_double_in(FieldTag::PatternDistance, DoubleRange::FINITE)?,
    })
});

#[cfg(test)]
mod tests {
    use super::*;
    use jdr_types::{Path, Point};

    #[test]
    fn pattern_projects_to_underlying_shape() {
        let path = Path::polyline(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap();
        let body = ObjectBody::Pattern(Pattern {
            kind: PatternKind::Rotational { angle: 0.5 },
            underlying: Box::new(ObjectBody::Path(path.clone())),
            anchor: Point::new(0.0, 0.0),
            adjust: None,
            replicas: 3,
            single_path: false,
            show_original: true,
        });
        assert_eq!(
            RotationalPatternListener.project(&body, JdrVersion::V1_7),
            Projection::Projected(ObjectBody::Path(path))
        );
        assert_eq!(RotationalPatternListener.project(&body, JdrVersion::V1_8), Projection::Native);
    }
}
