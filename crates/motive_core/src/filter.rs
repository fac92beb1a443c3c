//! Filter operation lists

use smallvec::SmallVec;

/// A single filter primitive
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOperation {
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    /// Hue rotation in degrees
    HueRotate(f32),
    Invert(f32),
    Brightness(f32),
    Contrast(f32),
    Opacity(f32),
    /// Blur radius in pixels
    Blur(f32),
}

impl FilterOperation {
    /// The no-op filter of the same kind
    pub fn identity_like(&self) -> FilterOperation {
        match self {
            Self::Grayscale(_) => Self::Grayscale(0.0),
            Self::Sepia(_) => Self::Sepia(0.0),
            Self::Saturate(_) => Self::Saturate(1.0),
            Self::HueRotate(_) => Self::HueRotate(0.0),
            Self::Invert(_) => Self::Invert(0.0),
            Self::Brightness(_) => Self::Brightness(1.0),
            Self::Contrast(_) => Self::Contrast(1.0),
            Self::Opacity(_) => Self::Opacity(1.0),
            Self::Blur(_) => Self::Blur(0.0),
        }
    }

    fn amount(&self) -> f32 {
        match *self {
            Self::Grayscale(v)
            | Self::Sepia(v)
            | Self::Saturate(v)
            | Self::HueRotate(v)
            | Self::Invert(v)
            | Self::Brightness(v)
            | Self::Contrast(v)
            | Self::Opacity(v)
            | Self::Blur(v) => v,
        }
    }

    fn with_amount(&self, v: f32) -> FilterOperation {
        match self {
            Self::Grayscale(_) => Self::Grayscale(v.clamp(0.0, 1.0)),
            Self::Sepia(_) => Self::Sepia(v.clamp(0.0, 1.0)),
            Self::Saturate(_) => Self::Saturate(v.max(0.0)),
            Self::HueRotate(_) => Self::HueRotate(v),
            Self::Invert(_) => Self::Invert(v.clamp(0.0, 1.0)),
            Self::Brightness(_) => Self::Brightness(v.max(0.0)),
            Self::Contrast(_) => Self::Contrast(v.max(0.0)),
            Self::Opacity(_) => Self::Opacity(v.clamp(0.0, 1.0)),
            Self::Blur(_) => Self::Blur(v.max(0.0)),
        }
    }

    fn same_kind(&self, other: &FilterOperation) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Whether the filter reads pixels outside the filtered area
    pub fn moves_pixels(&self) -> bool {
        matches!(self, Self::Blur(_))
    }
}

/// An ordered list of filters, applied first to last
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOperations {
    operations: SmallVec<[FilterOperation; 2]>,
}

impl FilterOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a filter
    pub fn with(mut self, operation: FilterOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn operations(&self) -> &[FilterOperation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn has_filter_that_moves_pixels(&self) -> bool {
        self.operations.iter().any(FilterOperation::moves_pixels)
    }

    /// Blend from `from` to `self` at progress `t`.
    ///
    /// Same rules as transform lists: per-entry blending against the
    /// identity filter for a missing entry, discrete switch on a kind
    /// mismatch.
    pub fn blend(&self, from: &FilterOperations, t: f32) -> FilterOperations {
        let len = self.operations.len().max(from.operations.len());
        let mut blended = SmallVec::with_capacity(len);
        for i in 0..len {
            let (a, b) = match (from.operations.get(i), self.operations.get(i)) {
                (Some(a), Some(b)) => (*a, *b),
                (Some(a), None) => (*a, a.identity_like()),
                (None, Some(b)) => (b.identity_like(), *b),
                (None, None) => unreachable!("index below max length"),
            };
            if !a.same_kind(&b) {
                return if t < 0.5 { from.clone() } else { self.clone() };
            }
            let v = a.amount() + (b.amount() - a.amount()) * t;
            blended.push(b.with_amount(v));
        }
        FilterOperations {
            operations: blended,
        }
    }
}
