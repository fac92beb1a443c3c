//! Transform operation lists
//!
//! A transform is kept as a list of primitive operations rather than a
//! flattened matrix so that two lists with the same shape can be blended
//! operation by operation (a rotation from 0 to 270 degrees turns three
//! quarters instead of snapping through the shortest path).

use smallvec::SmallVec;

use crate::geometry::Mat4;

/// A single primitive transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOperation {
    Translate { x: f32, y: f32, z: f32 },
    Scale { x: f32, y: f32, z: f32 },
    /// Rotation about the z axis, in degrees
    Rotate { degrees: f32 },
    /// Skew, in degrees
    Skew { x: f32, y: f32 },
    Matrix(Mat4),
}

impl TransformOperation {
    /// The identity operation of the same kind (blend partner for a missing entry)
    pub fn identity_like(&self) -> TransformOperation {
        match self {
            Self::Translate { .. } => Self::Translate {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            Self::Scale { .. } => Self::Scale {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
            Self::Rotate { .. } => Self::Rotate { degrees: 0.0 },
            Self::Skew { .. } => Self::Skew { x: 0.0, y: 0.0 },
            Self::Matrix(_) => Self::Matrix(Mat4::IDENTITY),
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        match *self {
            Self::Translate { x, y, z } => Mat4::translation(x, y, z),
            Self::Scale { x, y, z } => Mat4::scale(x, y, z),
            Self::Rotate { degrees } => Mat4::rotation_z(degrees),
            Self::Skew { x, y } => Mat4::skew(x, y),
            Self::Matrix(m) => m,
        }
    }

    /// Blend two operations of the same kind; `None` when the kinds differ
    fn blend(from: &Self, to: &Self, t: f32) -> Option<Self> {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        let op = match (*from, *to) {
            (Self::Translate { x: x0, y: y0, z: z0 }, Self::Translate { x, y, z }) => {
                Self::Translate {
                    x: mix(x0, x),
                    y: mix(y0, y),
                    z: mix(z0, z),
                }
            }
            (Self::Scale { x: x0, y: y0, z: z0 }, Self::Scale { x, y, z }) => Self::Scale {
                x: mix(x0, x),
                y: mix(y0, y),
                z: mix(z0, z),
            },
            (Self::Rotate { degrees: d0 }, Self::Rotate { degrees }) => Self::Rotate {
                degrees: mix(d0, degrees),
            },
            (Self::Skew { x: x0, y: y0 }, Self::Skew { x, y }) => Self::Skew {
                x: mix(x0, x),
                y: mix(y0, y),
            },
            _ => return None,
        };
        Some(op)
    }
}

/// An ordered list of transform operations, applied first to last
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformOperations {
    operations: SmallVec<[TransformOperation; 4]>,
}

impl TransformOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_operations(operations: impl IntoIterator<Item = TransformOperation>) -> Self {
        Self {
            operations: operations.into_iter().collect(),
        }
    }

    /// Builder: append a translation
    pub fn translate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.operations
            .push(TransformOperation::Translate { x, y, z });
        self
    }

    /// Builder: append a scale
    pub fn scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.operations.push(TransformOperation::Scale { x, y, z });
        self
    }

    /// Builder: append a z rotation
    pub fn rotate(mut self, degrees: f32) -> Self {
        self.operations.push(TransformOperation::Rotate { degrees });
        self
    }

    /// Builder: append a skew
    pub fn skew(mut self, x: f32, y: f32) -> Self {
        self.operations.push(TransformOperation::Skew { x, y });
        self
    }

    pub fn operations(&self) -> &[TransformOperation] {
        &self.operations
    }

    pub fn is_identity(&self) -> bool {
        self.operations.is_empty()
    }

    /// Flatten to a matrix
    pub fn apply(&self) -> Mat4 {
        self.operations
            .iter()
            .fold(Mat4::IDENTITY, |acc, op| acc.mul(&op.to_matrix()))
    }

    /// Whether every operation is a translation
    pub fn is_translation(&self) -> bool {
        self.operations.iter().all(|op| match op {
            TransformOperation::Translate { .. } => true,
            TransformOperation::Matrix(m) => m.is_translation(),
            _ => false,
        })
    }

    /// Whether axis-aligned rectangles stay axis-aligned
    pub fn preserves_axis_alignment(&self) -> bool {
        self.operations.iter().all(|op| match op {
            TransformOperation::Translate { .. } | TransformOperation::Scale { .. } => true,
            TransformOperation::Rotate { degrees } => (degrees % 90.0).abs() < f32::EPSILON,
            TransformOperation::Skew { x, y } => *x == 0.0 && *y == 0.0,
            TransformOperation::Matrix(m) => m.is_translation(),
        })
    }

    /// Largest axis scale this transform applies
    pub fn maximum_scale(&self) -> f32 {
        self.operations
            .iter()
            .map(|op| match op {
                TransformOperation::Scale { x, y, z } => x.abs().max(y.abs()).max(z.abs()),
                TransformOperation::Matrix(m) => {
                    let col_len = |c: usize| {
                        let col = m.cols[c];
                        (col[0] * col[0] + col[1] * col[1] + col[2] * col[2]).sqrt()
                    };
                    col_len(0).max(col_len(1)).max(col_len(2))
                }
                _ => 1.0,
            })
            .product()
    }

    /// Blend from `from` to `self` at progress `t`.
    ///
    /// Lists of matching shape blend per operation, a missing tail is blended
    /// against the identity of the same kind. Mismatched shapes cannot be
    /// blended per operation and switch discretely at the midpoint.
    pub fn blend(&self, from: &TransformOperations, t: f32) -> TransformOperations {
        let len = self.operations.len().max(from.operations.len());
        let mut blended = SmallVec::with_capacity(len);
        for i in 0..len {
            let (a, b) = match (from.operations.get(i), self.operations.get(i)) {
                (Some(a), Some(b)) => (*a, *b),
                (Some(a), None) => (*a, a.identity_like()),
                (None, Some(b)) => (b.identity_like(), *b),
                (None, None) => unreachable!("index below max length"),
            };
            match TransformOperation::blend(&a, &b, t) {
                Some(op) => blended.push(op),
                None => {
                    return if t < 0.5 { from.clone() } else { self.clone() };
                }
            }
        }
        TransformOperations {
            operations: blended,
        }
    }
}
