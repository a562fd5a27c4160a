//! Paint listeners: transparent, RGB, CMYK, HSB, grey, linear and radial
//! gradients.

use jdr_types::{
    Cmyk, Feature, Gradient, Grey, Hsb, JdrVersion, Paint, PaintKind, Radial, Rgb, StartLocation,
};

use crate::error::{JdrError, JdrResult};
use crate::handle::{DoubleRange, FormatReader, FormatWriter};
use crate::listener::config::{invalid, parse_double, parse_int, take_bracketed, take_fields};
use crate::registry::{Listener, PaintListener, Projection, Registry};
use crate::tag::FieldTag;

fn wrong_variant(listener: &'static str, paint: &Paint) -> JdrError {
    JdrError::WrongVariant {
        listener,
        found: paint.kind().to_string(),
    }
}

fn format_double(value: f64) -> String {
    format!("{value}")
}

/// `T`: no payload.
pub struct TransparentListener;
impl_listener!(TransparentListener, PaintKind::Transparent, char = 'T', "transparent paint");

impl PaintListener for TransparentListener {
    fn write(&self, _out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        match paint {
            Paint::Transparent => Ok(()),
            other => Err(wrong_variant(self.type_name(), other)),
        }
    }

    fn read(&self, _inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        Ok(Paint::Transparent)
    }

    fn config_id(&self) -> u8 {
        0
    }

    fn config_fields(&self, _paints: &Registry<dyn PaintListener>, _paint: &Paint) -> JdrResult<String> {
        Ok(String::new())
    }

    fn parse_config<'s>(
        &self,
        _paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)> {
        Ok((Paint::Transparent, spec))
    }
}

/// `R`: red, green, blue, alpha.
pub struct RgbListener;
impl_listener!(RgbListener, PaintKind::Rgb, char = 'R', "RGB paint");

impl PaintListener for RgbListener {
    fn write(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        let Paint::Rgb(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        out.write_double(c.red)?;
        out.write_double(c.green)?;
        out.write_double(c.blue)?;
        out.write_double(c.alpha)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        let red = inp.read_double_in(FieldTag::Red, DoubleRange::UNIT)?;
        let green = inp.read_double_in(FieldTag::Green, DoubleRange::UNIT)?;
        let blue = inp.read_double_in(FieldTag::Blue, DoubleRange::UNIT)?;
        let alpha = inp.read_double_in(FieldTag::Alpha, DoubleRange::UNIT)?;
        Ok(Paint::Rgb(Rgb::new(red, green, blue, alpha)))
    }

    fn config_id(&self) -> u8 {
        1
    }

    fn config_fields(&self, _paints: &Registry<dyn PaintListener>, paint: &Paint) -> JdrResult<String> {
        let Paint::Rgb(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        Ok([c.red, c.green, c.blue, c.alpha]
            .map(format_double)
            .join(","))
    }

    fn parse_config<'s>(
        &self,
        _paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)> {
        let (f, rest) = take_fields(spec, 4)?;
        let unit = |field, name| parse_double(spec, field, name, DoubleRange::UNIT);
        let paint = Paint::Rgb(Rgb::new(
            unit(f[0], "red")?,
            unit(f[1], "green")?,
            unit(f[2], "blue")?,
            unit(f[3], "alpha")?,
        ));
        Ok((paint, rest))
    }
}

/// `C`: cyan, magenta, yellow, black, alpha.
pub struct CmykListener;
impl_listener!(CmykListener, PaintKind::Cmyk, char = 'C', "CMYK paint");

impl PaintListener for CmykListener {
    fn write(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        let Paint::Cmyk(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        out.write_double(c.cyan)?;
        out.write_double(c.magenta)?;
        out.write_double(c.yellow)?;
        out.write_double(c.key)?;
        out.write_double(c.alpha)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        Ok(Paint::Cmyk(Cmyk {
            cyan: inp.read_double_in(FieldTag::Cyan, DoubleRange::UNIT)?,
            magenta: inp.read_double_in(FieldTag::Magenta, DoubleRange::UNIT)?,
            yellow: inp.read_double_in(FieldTag::Yellow, DoubleRange::UNIT)?,
            key: inp.read_double_in(FieldTag::Black, DoubleRange::UNIT)?,
            alpha: inp.read_double_in(FieldTag::Alpha, DoubleRange::UNIT)?,
        }))
    }

    fn config_id(&self) -> u8 {
        2
    }

    fn config_fields(&self, _paints: &Registry<dyn PaintListener>, paint: &Paint) -> JdrResult<String> {
        let Paint::Cmyk(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        Ok([c.cyan, c.magenta, c.yellow, c.key, c.alpha]
            .map(format_double)
            .join(","))
    }

    fn parse_config<'s>(
        &self,
        _paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)> {
        let (f, rest) = take_fields(spec, 5)?;
        let unit = |field, name| parse_double(spec, field, name, DoubleRange::UNIT);
        let paint = Paint::Cmyk(Cmyk {
            cyan: unit(f[0], "cyan")?,
            magenta: unit(f[1], "magenta")?,
            yellow: unit(f[2], "yellow")?,
            key: unit(f[3], "black")?,
            alpha: unit(f[4], "alpha")?,
        });
        Ok((paint, rest))
    }
}

/// `S`: hue in degrees, saturation, brightness, alpha.
pub struct HsbListener;
impl_listener!(HsbListener, PaintKind::Hsb, char = 'S', "HSB paint", since HsbPaint);

impl PaintListener for HsbListener {
    fn write(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        let Paint::Hsb(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        out.write_double(c.hue)?;
        out.write_double(c.saturation)?;
        out.write_double(c.brightness)?;
        out.write_double(c.alpha)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        Ok(Paint::Hsb(Hsb {
            hue: inp.read_double_in(FieldTag::Hue, DoubleRange::HUE)?,
            saturation: inp.read_double_in(FieldTag::Saturation, DoubleRange::UNIT)?,
            brightness: inp.read_double_in(FieldTag::Brightness, DoubleRange::UNIT)?,
            alpha: inp.read_double_in(FieldTag::Alpha, DoubleRange::UNIT)?,
        }))
    }

    fn project(&self, paint: &Paint, version: JdrVersion) -> Projection<Paint> {
        match paint {
            Paint::Hsb(c) if !Feature::HsbPaint.is_supported_by(version) => {
                Projection::Projected(Paint::Rgb(c.to_rgb()))
            }
            _ => Projection::Native,
        }
    }

    fn config_id(&self) -> u8 {
        3
    }

    fn config_fields(&self, _paints: &Registry<dyn PaintListener>, paint: &Paint) -> JdrResult<String> {
        let Paint::Hsb(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        Ok([c.hue, c.saturation, c.brightness, c.alpha]
            .map(format_double)
            .join(","))
    }

    fn parse_config<'s>(
        &self,
        _paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)> {
        let (f, rest) = take_fields(spec, 4)?;
        let unit = |field, name| parse_double(spec, field, name, DoubleRange::UNIT);
        let paint = Paint::Hsb(Hsb {
            hue: parse_double(spec, f[0], "hue", DoubleRange::HUE)?,
            saturation: unit(f[1], "saturation")?,
            brightness: unit(f[2], "brightness")?,
            alpha: unit(f[3], "alpha")?,
        });
        Ok((paint, rest))
    }
}

/// `Y`: grey, alpha.
pub struct GreyListener;
impl_listener!(GreyListener, PaintKind::Grey, char = 'Y', "grey paint", since GreyPaint);

impl PaintListener for GreyListener {
    fn write(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        let Paint::Grey(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        out.write_double(c.grey)?;
        out.write_double(c.alpha)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        Ok(Paint::Grey(Grey {
            grey: inp.read_double_in(FieldTag::Grey, DoubleRange::UNIT)?,
            alpha: inp.read_double_in(FieldTag::Alpha, DoubleRange::UNIT)?,
        }))
    }

    fn project(&self, paint: &Paint, version: JdrVersion) -> Projection<Paint> {
        match paint {
            Paint::Grey(c) if !Feature::GreyPaint.is_supported_by(version) => {
                Projection::Projected(Paint::Rgb(c.to_rgb()))
            }
            _ => Projection::Native,
        }
    }

    fn config_id(&self) -> u8 {
        4
    }

    fn config_fields(&self, _paints: &Registry<dyn PaintListener>, paint: &Paint) -> JdrResult<String> {
        let Paint::Grey(c) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        Ok(format!("{},{}", format_double(c.grey), format_double(c.alpha)))
    }

    fn parse_config<'s>(
        &self,
        _paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)> {
        let (f, rest) = take_fields(spec, 2)?;
        let paint = Paint::Grey(Grey {
            grey: parse_double(spec, f[0], "grey", DoubleRange::UNIT)?,
            alpha: parse_double(spec, f[1], "alpha", DoubleRange::UNIT)?,
        });
        Ok((paint, rest))
    }
}

/// Stops shared by the linear and radial gradients.
struct Stops<'a> {
    start: &'a Paint,
    mid: Option<&'a Paint>,
    end: &'a Paint,
}

fn write_stops(out: &mut dyn FormatWriter, stops: &Stops<'_>) -> JdrResult<()> {
    let registries = out.registries();
    registries.paints.save(out, stops.start)?;
    registries.paints.save(out, stops.end)?;
    if out.supports(Feature::GradientMidStop) {
        match stops.mid {
            Some(mid) => {
                out.write_bool(true)?;
                registries.paints.save(out, mid)?;
            }
            None => out.write_bool(false)?,
        }
    }
    Ok(())
}

fn read_stops(inp: &mut dyn FormatReader) -> JdrResult<(Paint, Option<Paint>, Paint)> {
    let registries = inp.registries();
    let start = registries.paints.load_solid(inp)?;
    let end = registries.paints.load_solid(inp)?;
    let mid = if inp.supports(Feature::GradientMidStop) && inp.read_bool(FieldTag::GradientMidFlag)? {
        Some(registries.paints.load_solid(inp)?)
    } else {
        None
    };
    Ok((start, mid, end))
}

fn stops_config(paints: &Registry<dyn PaintListener>, stops: &Stops<'_>) -> JdrResult<String> {
    let mut text = format!(
        "[{}],[{}]",
        paints.config_string(stops.start)?,
        paints.config_string(stops.end)?
    );
    if let Some(mid) = stops.mid {
        text.push_str(&format!(",[{}]", paints.config_string(mid)?));
    }
    Ok(text)
}

fn parse_stop(paints: &Registry<dyn PaintListener>, spec: &str) -> JdrResult<Paint> {
    let paint = paints.parse_config_str(spec)?;
    if paint.is_solid() {
        Ok(paint)
    } else {
        Err(invalid(spec, format!("gradient stop must be a solid colour, found {}", paint.kind())))
    }
}

/// Parse `[start],[end][,[mid]],` returning the stops and the remainder.
fn parse_stops<'s>(
    paints: &Registry<dyn PaintListener>,
    spec: &'s str,
) -> JdrResult<(Paint, Option<Paint>, Paint, &'s str)> {
    let (start, rest) = take_bracketed(spec)?;
    let start = parse_stop(paints, start)?;
    let (end, rest) = take_bracketed(rest)?;
    let end = parse_stop(paints, end)?;
    if rest.trim_start().starts_with('[') {
        let (mid, rest) = take_bracketed(rest)?;
        Ok((start, Some(parse_stop(paints, mid)?), end, rest))
    } else {
        Ok((start, None, end, rest))
    }
}

/// `G`: start, end, optional mid stop, direction.
pub struct GradientListener;
impl_listener!(GradientListener, PaintKind::Gradient, char = 'G', "gradient paint");

impl PaintListener for GradientListener {
    fn write(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        let Paint::Gradient(g) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        let stops = Stops {
            start: &g.start,
            mid: g.mid.as_deref(),
            end: &g.end,
        };
        write_stops(out, &stops)?;
        out.write_int(g.direction)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        let (start, mid, end) = read_stops(inp)?;
        let direction = inp.read_int(FieldTag::GradientDirection)?;
        if !Gradient::is_valid_direction(direction) {
            return Err(inp.invalid_value(FieldTag::GradientDirection, direction.to_string()));
        }
        let mut gradient = Gradient::new(start, end, direction);
        gradient.mid = mid.map(Box::new);
        Ok(Paint::Gradient(gradient))
    }

    fn project(&self, paint: &Paint, version: JdrVersion) -> Projection<Paint> {
        match paint {
            Paint::Gradient(g) if g.mid.is_some() && !Feature::GradientMidStop.is_supported_by(version) => {
                Projection::Projected(Paint::Gradient(Gradient {
                    mid: None,
                    ..g.clone()
                }))
            }
            _ => Projection::Native,
        }
    }

    fn config_id(&self) -> u8 {
        5
    }

    fn config_fields(&self, paints: &Registry<dyn PaintListener>, paint: &Paint) -> JdrResult<String> {
        let Paint::Gradient(g) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        let stops = Stops {
            start: &g.start,
            mid: g.mid.as_deref(),
            end: &g.end,
        };
        Ok(format!("{},{}", stops_config(paints, &stops)?, g.direction))
    }

    fn parse_config<'s>(
        &self,
        paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)> {
        let (start, mid, end, rest) = parse_stops(paints, spec)?;
        let (f, rest) = take_fields(rest, 1)?;
        let direction = parse_int(spec, f[0], "direction")?;
        if !Gradient::is_valid_direction(direction) {
            return Err(invalid(spec, format!("invalid gradient direction {direction}")));
        }
        let mut gradient = Gradient::new(start, end, direction);
        gradient.mid = mid.map(Box::new);
        Ok((Paint::Gradient(gradient), rest))
    }
}

/// `D`: start, end, optional mid stop, start location.
pub struct RadialListener;
impl_listener!(RadialListener, PaintKind::Radial, char = 'D', "radial paint", since RadialPaint);

impl PaintListener for RadialListener {
    fn write(&self, out: &mut dyn FormatWriter, paint: &Paint) -> JdrResult<()> {
        let Paint::Radial(r) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        let stops = Stops {
            start: &r.start,
            mid: r.mid.as_deref(),
            end: &r.end,
        };
        write_stops(out, &stops)?;
        out.write_int(r.location.id())
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Paint> {
        let (start, mid, end) = read_stops(inp)?;
        let id = inp.read_int(FieldTag::RadialLocation)?;
        let location = StartLocation::from_id(id)
            .map_err(|_| inp.invalid_value(FieldTag::RadialLocation, id.to_string()))?;
        let mut radial = Radial::new(start, end, location);
        radial.mid = mid.map(Box::new);
        Ok(Paint::Radial(radial))
    }

    fn project(&self, paint: &Paint, version: JdrVersion) -> Projection<Paint> {
        let Paint::Radial(r) = paint else {
            return Projection::Native;
        };
        if !Feature::RadialPaint.is_supported_by(version) {
            Projection::Projected(Paint::Gradient(Gradient {
                start: r.start.clone(),
                mid: r.mid.clone(),
                end: r.end.clone(),
                direction: 0,
            }))
        } else if r.mid.is_some() && !Feature::GradientMidStop.is_supported_by(version) {
            Projection::Projected(Paint::Radial(Radial {
                mid: None,
                ..r.clone()
            }))
        } else {
            Projection::Native
        }
    }

    fn config_id(&self) -> u8 {
        6
    }

    fn config_fields(&self, paints: &Registry<dyn PaintListener>, paint: &Paint) -> JdrResult<String> {
        let Paint::Radial(r) = paint else {
            return Err(wrong_variant(self.type_name(), paint));
        };
        let stops = Stops {
            start: &r.start,
            mid: r.mid.as_deref(),
            end: &r.end,
        };
        Ok(format!("{},{}", stops_config(paints, &stops)?, r.location.id()))
    }

    fn parse_config<'s>(
        &self,
        paints: &Registry<dyn PaintListener>,
        spec: &'s str,
    ) -> JdrResult<(Paint, &'s str)> {
        let (start, mid, end, rest) = parse_stops(paints, spec)?;
        let (f, rest) = take_fields(rest, 1)?;
        let id = parse_int(spec, f[0], "start location")?;
        let location = StartLocation::from_id(id)
            .map_err(|_| invalid(spec, format!("invalid start location {id}")))?;
        let mut radial = Radial::new(start, end, location);
        radial.mid = mid.map(Box::new);
        Ok((Paint::Radial(radial), rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registries;

    fn paints() -> Registries {
        Registries::new()
    }

    #[test]
    fn rgb_config_string() {
        let r = paints();
        let paint = Paint::rgb(1.0, 0.5, 0.0, 1.0);
        assert_eq!(r.paints.config_string(&paint).unwrap(), "1,1,0.5,0,1");
        assert_eq!(r.paints.parse_config_str("1,1,0.5,0,1").unwrap(), paint);
    }

    #[test]
    fn transparent_config_string() {
        let r = paints();
        assert_eq!(r.paints.config_string(&Paint::Transparent).unwrap(), "0");
        assert_eq!(r.paints.parse_config_str("0").unwrap(), Paint::Transparent);
    }

    #[test]
    fn gradient_config_with_mid() {
        let r = paints();
        let paint = Paint::Gradient(
            Gradient::new(Paint::BLACK, Paint::Grey(Grey { grey: 1.0, alpha: 1.0 }), 90)
                .with_mid(Paint::rgb(1.0, 0.0, 0.0, 1.0)),
        );
        let text = r.paints.config_string(&paint).unwrap();
        assert_eq!(text, "5,[1,0,0,0,1],[4,1,1],[1,1,0,0,1],90");
        assert_eq!(r.paints.parse_config_str(&text).unwrap(), paint);
    }

    #[test]
    fn radial_config_without_mid() {
        let r = paints();
        let paint = Paint::Radial(Radial::new(Paint::BLACK, Paint::BLACK, StartLocation::Centre));
        let text = r.paints.config_string(&paint).unwrap();
        assert_eq!(text, "6,[1,0,0,0,1],[1,0,0,0,1],8");
        assert_eq!(r.paints.parse_config_str(&text).unwrap(), paint);
    }

    #[test]
    fn parse_returns_remainder() {
        let r = paints();
        let (paint, rest) = r.paints.parse_config("4,0.5,1,next").unwrap();
        assert_eq!(paint, Paint::Grey(Grey { grey: 0.5, alpha: 1.0 }));
        assert_eq!(rest, "next");
    }

    #[test]
    fn config_rejects_bad_values() {
        let r = paints();
        assert!(r.paints.parse_config_str("1,2,0,0,1").is_err());
        assert!(r.paints.parse_config_str("3,360,0,0,1").is_err());
        assert!(r.paints.parse_config_str("5,[1,0,0,0,1],[1,0,0,0,1],10").is_err());
        assert!(r.paints.parse_config_str("5,[0],[1,0,0,0,1],0").is_err());
        assert!(r.paints.parse_config_str("9").is_err());
        assert!(r.paints.parse_config_str("1,0,0,0,1,extra").is_err());
    }

    #[test]
    fn projections() {
        let hsb = Paint::Hsb(Hsb { hue: 0.0, saturation: 1.0, brightness: 1.0, alpha: 1.0 });
        assert_eq!(
            HsbListener.project(&hsb, JdrVersion::V1_0),
            Projection::Projected(Paint::rgb(1.0, 0.0, 0.0, 1.0))
        );
        assert_eq!(HsbListener.project(&hsb, JdrVersion::V1_1), Projection::Native);

        let radial = Paint::Radial(
            Radial::new(Paint::BLACK, Paint::BLACK, StartLocation::North).with_mid(Paint::BLACK),
        );
        let Projection::Projected(Paint::Gradient(g)) = RadialListener.project(&radial, JdrVersion::V1_0)
        else {
            panic!("expected gradient projection");
        };
        assert_eq!(g.direction, 0);
        assert!(g.mid.is_some());

        let Projection::Projected(Paint::Radial(r)) = RadialListener.project(&radial, JdrVersion::V2_1)
        else {
            panic!("expected radial without mid");
        };
        assert!(r.mid.is_none());
        assert_eq!(RadialListener.project(&radial, JdrVersion::V2_2), Projection::Native);
    }
}
