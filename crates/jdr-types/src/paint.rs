use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// RGB colour; every channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// CMYK colour; every channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cmyk {
    pub cyan: f64,
    pub magenta: f64,
    pub yellow: f64,
    pub key: f64,
    pub alpha: f64,
}

impl Cmyk {
    pub fn to_rgb(&self) -> Rgb {
        Rgb::new(
            (1.0 - self.cyan) * (1.0 - self.key),
            (1.0 - self.magenta) * (1.0 - self.key),
            (1.0 - self.yellow) * (1.0 - self.key),
            self.alpha,
        )
    }
}

/// HSB colour. Hue is in degrees, `[0, 360)`; the rest in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub alpha: f64,
}

impl Hsb {
    pub fn to_rgb(&self) -> Rgb {
        let v = self.brightness;
        if self.saturation == 0.0 {
            return Rgb::new(v, v, v, self.alpha);
        }
        let h = (self.hue / 60.0).rem_euclid(6.0);
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - self.saturation);
        let q = v * (1.0 - self.saturation * f);
        let t = v * (1.0 - self.saturation * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Rgb::new(r, g, b, self.alpha)
    }
}

/// Grey colour; both channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grey {
    pub grey: f64,
    pub alpha: f64,
}

impl Grey {
    pub fn to_rgb(&self) -> Rgb {
        Rgb::new(self.grey, self.grey, self.grey, self.alpha)
    }
}

/// Compass position where a radial gradient starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartLocation {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Centre,
}

impl StartLocation {
    pub const ALL: [StartLocation; 9] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::Centre,
    ];

    pub fn id(self) -> i32 {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(8) as i32
    }

    pub fn from_id(id: i32) -> TypeResult<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(TypeError::UnknownId {
                kind: "radial start location",
                id: id as i64,
            })
    }
}

/// Linear gradient. Stops are solid colours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub start: Box<Paint>,
    pub mid: Option<Box<Paint>>,
    pub end: Box<Paint>,
    /// Direction in degrees: a multiple of 45 in `0..=315`.
    pub direction: i32,
}

impl Gradient {
    pub fn new(start: Paint, end: Paint, direction: i32) -> Self {
        Self {
            start: Box::new(start),
            mid: None,
            end: Box::new(end),
            direction,
        }
    }

    pub fn with_mid(mut self, mid: Paint) -> Self {
        self.mid = Some(Box::new(mid));
        self
    }

    pub fn is_valid_direction(direction: i32) -> bool {
        (0..=315).contains(&direction) && direction % 45 == 0
    }
}

/// Radial gradient. Stops are solid colours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Radial {
    pub start: Box<Paint>,
    pub mid: Option<Box<Paint>>,
    pub end: Box<Paint>,
    pub location: StartLocation,
}

impl Radial {
    pub fn new(start: Paint, end: Paint, location: StartLocation) -> Self {
        Self {
            start: Box::new(start),
            mid: None,
            end: Box::new(end),
            location,
        }
    }

    pub fn with_mid(mut self, mid: Paint) -> Self {
        self.mid = Some(Box::new(mid));
        self
    }
}

/// Fill or line paint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Transparent,
    Rgb(Rgb),
    Cmyk(Cmyk),
    Hsb(Hsb),
    Grey(Grey),
    Gradient(Gradient),
    Radial(Radial),
}

/// Discriminant of [`Paint`], used to pick a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaintKind {
    Transparent,
    Rgb,
    Cmyk,
    Hsb,
    Grey,
    Gradient,
    Radial,
}

impl fmt::Display for PaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transparent => "transparent",
            Self::Rgb => "RGB",
            Self::Cmyk => "CMYK",
            Self::Hsb => "HSB",
            Self::Grey => "grey",
            Self::Gradient => "gradient",
            Self::Radial => "radial",
        };
        f.write_str(name)
    }
}

impl Paint {
    pub const BLACK: Paint = Paint::Rgb(Rgb::BLACK);

    pub fn rgb(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self::Rgb(Rgb::new(red, green, blue, alpha))
    }

    pub fn kind(&self) -> PaintKind {
        match self {
            Self::Transparent => PaintKind::Transparent,
            Self::Rgb(_) => PaintKind::Rgb,
            Self::Cmyk(_) => PaintKind::Cmyk,
            Self::Hsb(_) => PaintKind::Hsb,
            Self::Grey(_) => PaintKind::Grey,
            Self::Gradient(_) => PaintKind::Gradient,
            Self::Radial(_) => PaintKind::Radial,
        }
    }

    /// Solid colours may be used as gradient stops.
    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            Self::Rgb(_) | Self::Cmyk(_) | Self::Hsb(_) | Self::Grey(_)
        )
    }

    pub fn alpha(&self) -> f64 {
        match self {
            Self::Transparent => 0.0,
            Self::Rgb(c) => c.alpha,
            Self::Cmyk(c) => c.alpha,
            Self::Hsb(c) => c.alpha,
            Self::Grey(c) => c.alpha,
            Self::Gradient(g) => (g.start.alpha() + g.end.alpha()) / 2.0,
            Self::Radial(r) => (r.start.alpha() + r.end.alpha()) / 2.0,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.red - b.red).abs() < 1e-9
            && (a.green - b.green).abs() < 1e-9
            && (a.blue - b.blue).abs() < 1e-9
            && (a.alpha - b.alpha).abs() < 1e-9
    }

    #[test]
    fn hsb_primaries() {
        let red = Hsb { hue: 0.0, saturation: 1.0, brightness: 1.0, alpha: 1.0 };
        assert!(close(red.to_rgb(), Rgb::new(1.0, 0.0, 0.0, 1.0)));
        let green = Hsb { hue: 120.0, saturation: 1.0, brightness: 1.0, alpha: 0.5 };
        assert!(close(green.to_rgb(), Rgb::new(0.0, 1.0, 0.0, 0.5)));
        let blue = Hsb { hue: 240.0, saturation: 1.0, brightness: 1.0, alpha: 1.0 };
        assert!(close(blue.to_rgb(), Rgb::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn hsb_unsaturated_is_grey() {
        let c = Hsb { hue: 200.0, saturation: 0.0, brightness: 0.25, alpha: 1.0 };
        assert!(close(c.to_rgb(), Rgb::new(0.25, 0.25, 0.25, 1.0)));
    }

    #[test]
    fn cmyk_and_grey_to_rgb() {
        let white = Cmyk { cyan: 0.0, magenta: 0.0, yellow: 0.0, key: 0.0, alpha: 1.0 };
        assert!(close(white.to_rgb(), Rgb::new(1.0, 1.0, 1.0, 1.0)));
        let g = Grey { grey: 0.3, alpha: 0.7 };
        assert!(close(g.to_rgb(), Rgb::new(0.3, 0.3, 0.3, 0.7)));
    }

    #[test]
    fn gradient_directions() {
        assert!(Gradient::is_valid_direction(0));
        assert!(Gradient::is_valid_direction(315));
        assert!(!Gradient::is_valid_direction(360));
        assert!(!Gradient::is_valid_direction(10));
        assert!(!Gradient::is_valid_direction(-45));
    }

    #[test]
    fn start_location_ids() {
        for loc in StartLocation::ALL {
            assert_eq!(StartLocation::from_id(loc.id()).unwrap(), loc);
        }
        assert!(StartLocation::from_id(9).is_err());
        assert!(StartLocation::from_id(-1).is_err());
    }

    #[test]
    fn solid_paints() {
        assert!(Paint::BLACK.is_solid());
        assert!(!Paint::Transparent.is_solid());
        let g = Paint::Gradient(Gradient::new(Paint::BLACK, Paint::BLACK, 0));
        assert!(!g.is_solid());
        assert_eq!(g.kind(), PaintKind::Gradient);
    }

    fn channel() -> impl Strategy<Value = f64> {
        0.0..=1.0f64
    }

    fn in_gamut(c: Rgb) -> bool {
        [c.red, c.green, c.blue]
            .iter()
            .all(|v| (-1e-12..=1.0 + 1e-12).contains(v))
    }

    proptest! {
        #[test]
        fn hsb_stays_in_gamut(
            hue in 0.0..360.0f64,
            saturation in channel(),
            brightness in channel(),
            alpha in channel(),
        ) {
            let rgb = Hsb { hue, saturation, brightness, alpha }.to_rgb();
            prop_assert!(in_gamut(rgb), "{rgb:?}");
            let max = rgb.red.max(rgb.green).max(rgb.blue);
            prop_assert!((max - brightness).abs() < 1e-9);
            prop_assert_eq!(rgb.alpha, alpha);
        }

        #[test]
        fn cmyk_stays_in_gamut(
            cyan in channel(),
            magenta in channel(),
            yellow in channel(),
            key in channel(),
        ) {
            let rgb = Cmyk { cyan, magenta, yellow, key, alpha: 1.0 }.to_rgb();
            prop_assert!(in_gamut(rgb), "{rgb:?}");
        }
    }
}
