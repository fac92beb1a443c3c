//! Geometry and color types carried by animated values

// ─────────────────────────────────────────────────────────────────────────────
// Sizes and Offsets
// ─────────────────────────────────────────────────────────────────────────────

/// 2D size (used for animated bounds)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Scroll position of a scroller, in pixels from its origin
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

impl ScrollOffset {
    pub const ZERO: ScrollOffset = ScrollOffset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset moved by a scroll delta
    pub fn with_delta(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise clamp into `[min, max]`
    pub fn clamp(self, min: ScrollOffset, max: ScrollOffset) -> Self {
        Self::new(self.x.max(min.x).min(max.x), self.y.max(min.y).min(max.y))
    }

    /// Difference `self - other`
    pub fn delta_from(self, other: ScrollOffset) -> (f32, f32) {
        (self.x - other.x, self.y - other.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color (linear space, components in 0.0..=1.0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Interpolate in premultiplied space so a fade to transparent does not
    /// drift towards black.
    pub fn lerp(&self, to: &Color, t: f32) -> Color {
        let a = self.a + (to.a - self.a) * t;
        if a <= 0.0 {
            return Color::TRANSPARENT;
        }
        let channel = |from: f32, to_c: f32, from_a: f32, to_a: f32| {
            let premul = from * from_a + (to_c * to_a - from * from_a) * t;
            (premul / a).clamp(0.0, 1.0)
        };
        Color {
            r: channel(self.r, to.r, self.a, to.a),
            g: channel(self.g, to.g, self.a, to.a),
            b: channel(self.b, to.b, self.a, to.a),
            a: a.clamp(0.0, 1.0),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Matrix
// ─────────────────────────────────────────────────────────────────────────────

/// 4x4 transformation matrix (column-major)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [x, y, z, 1.0];
        m
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = x;
        m.cols[1][1] = y;
        m.cols[2][2] = z;
        m
    }

    /// Rotation about the z axis
    pub fn rotation_z(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut m = Self::IDENTITY;
        m.cols[0] = [c, s, 0.0, 0.0];
        m.cols[1] = [-s, c, 0.0, 0.0];
        m
    }

    /// 2D skew, angles in degrees
    pub fn skew(x_degrees: f32, y_degrees: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[1][0] = x_degrees.to_radians().tan();
        m.cols[0][1] = y_degrees.to_radians().tan();
        m
    }

    /// Multiply two matrices (`self * other`, `other` applied first)
    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0f32; 4]; 4];
        for (i, col) in result.iter_mut().enumerate() {
            for (j, cell) in col.iter_mut().enumerate() {
                for k in 0..4 {
                    *cell += self.cols[k][j] * other.cols[i][k];
                }
            }
        }
        Mat4 { cols: result }
    }

    /// True when the matrix only translates
    pub fn is_translation(&self) -> bool {
        let upper = [
            self.cols[0][0..3] == [1.0, 0.0, 0.0],
            self.cols[1][0..3] == [0.0, 1.0, 0.0],
            self.cols[2][0..3] == [0.0, 0.0, 1.0],
        ];
        upper.iter().all(|ok| *ok) && self.cols[0][3] == 0.0 && self.cols[1][3] == 0.0
    }

    /// Transform a 2D point (z = 0, w = 1)
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.cols[0][0] * x + self.cols[1][0] * y + self.cols[3][0],
            self.cols[0][1] * x + self.cols[1][1] * y + self.cols[3][1],
        )
    }
}
