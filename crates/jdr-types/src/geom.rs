use serde::{Deserialize, Serialize};

/// A point in storage units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reflect this point in the infinite line through `a` and `b`.
    ///
    /// A degenerate line (`a == b`) reflects through the point `a`.
    pub fn reflect(self, a: Point, b: Point) -> Point {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return Point::new(2.0 * a.x - self.x, 2.0 * a.y - self.y);
        }
        let t = ((self.x - a.x) * dx + (self.y - a.y) * dy) / len2;
        let foot = Point::new(a.x + t * dx, a.y + t * dy);
        Point::new(2.0 * foot.x - self.x, 2.0 * foot.y - self.y)
    }
}

/// An affine transformation.
///
/// The six components are stored in the order they appear on the wire:
/// `[scale_x, shear_y, shear_x, scale_y, translate_x, translate_y]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [f64; 6]);

impl Transform {
    pub const IDENTITY: Transform = Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    pub fn translate_x(&self) -> f64 {
        self.0[4]
    }

    pub fn translate_y(&self) -> f64 {
        self.0[5]
    }

    pub fn apply(&self, p: Point) -> Point {
        let [m00, m10, m01, m11, m02, m12] = self.0;
        Point::new(m00 * p.x + m01 * p.y + m02, m10 * p.x + m11 * p.y + m12)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One element of a geometric shape outline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShapeElement {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

impl ShapeElement {
    /// Wire operation code.
    pub const fn op(&self) -> i32 {
        match self {
            Self::MoveTo(_) => 0,
            Self::LineTo(_) => 1,
            Self::QuadTo(..) => 2,
            Self::CubicTo(..) => 3,
            Self::Close => 4,
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => vec![p],
            Self::QuadTo(a, b) => vec![a, b],
            Self::CubicTo(a, b, c) => vec![a, b, c],
            Self::Close => Vec::new(),
        }
    }
}

/// A plain geometric outline with no styling.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Shape {
    pub elements: Vec<ShapeElement>,
}

impl Shape {
    pub fn new(elements: Vec<ShapeElement>) -> Self {
        Self { elements }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
