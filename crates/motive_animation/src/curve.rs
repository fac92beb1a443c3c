//! Animation curves and animated values
//!
//! [`AnimationCurve`] is the closed set of curve kinds an animation can own,
//! one case per value kind. [`AnimatedValue`] is what sampling a curve
//! produces.

use motive_core::{
    Color, FilterOperations, ScrollOffset, Size, TransformOperations, ValueKind,
};

use crate::easing::Easing;
use crate::keyframe::KeyframedCurve;
use crate::scroll_offset::ScrollOffsetAnimationCurve;

/// A sampled curve value
#[derive(Clone, Debug, PartialEq)]
pub enum AnimatedValue {
    Float(f32),
    Color(Color),
    Transform(TransformOperations),
    Filter(FilterOperations),
    ScrollOffset(ScrollOffset),
    Size(Size),
    Boolean(bool),
}

impl AnimatedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AnimatedValue::Float(_) => ValueKind::Float,
            AnimatedValue::Color(_) => ValueKind::Color,
            AnimatedValue::Transform(_) => ValueKind::Transform,
            AnimatedValue::Filter(_) => ValueKind::Filter,
            AnimatedValue::ScrollOffset(_) => ValueKind::ScrollOffset,
            AnimatedValue::Size(_) => ValueKind::Size,
            AnimatedValue::Boolean(_) => ValueKind::Boolean,
        }
    }
}

/// The curve owned by an animation
#[derive(Clone, Debug, PartialEq)]
pub enum AnimationCurve {
    Float(KeyframedCurve<f32>),
    Color(KeyframedCurve<Color>),
    Transform(KeyframedCurve<TransformOperations>),
    Filter(KeyframedCurve<FilterOperations>),
    ScrollOffset(ScrollOffsetAnimationCurve),
    Size(KeyframedCurve<Size>),
    Boolean(KeyframedCurve<bool>),
}

impl AnimationCurve {
    /// Two-keyframe curve between two values of the same kind; `None` when
    /// the kinds differ or the value kind has no keyframed curve.
    pub fn tween(
        from: AnimatedValue,
        to: AnimatedValue,
        duration: f64,
        easing: Easing,
    ) -> Option<AnimationCurve> {
        let curve = match (from, to) {
            (AnimatedValue::Float(a), AnimatedValue::Float(b)) => {
                AnimationCurve::Float(KeyframedCurve::tween(a, b, duration, easing))
            }
            (AnimatedValue::Color(a), AnimatedValue::Color(b)) => {
                AnimationCurve::Color(KeyframedCurve::tween(a, b, duration, easing))
            }
            (AnimatedValue::Transform(a), AnimatedValue::Transform(b)) => {
                AnimationCurve::Transform(KeyframedCurve::tween(a, b, duration, easing))
            }
            (AnimatedValue::Filter(a), AnimatedValue::Filter(b)) => {
                AnimationCurve::Filter(KeyframedCurve::tween(a, b, duration, easing))
            }
            (AnimatedValue::Size(a), AnimatedValue::Size(b)) => {
                AnimationCurve::Size(KeyframedCurve::tween(a, b, duration, easing))
            }
            (AnimatedValue::Boolean(a), AnimatedValue::Boolean(b)) => {
                AnimationCurve::Boolean(KeyframedCurve::tween(a, b, duration, easing))
            }
            _ => return None,
        };
        Some(curve)
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            AnimationCurve::Float(_) => ValueKind::Float,
            AnimationCurve::Color(_) => ValueKind::Color,
            AnimationCurve::Transform(_) => ValueKind::Transform,
            AnimationCurve::Filter(_) => ValueKind::Filter,
            AnimationCurve::ScrollOffset(_) => ValueKind::ScrollOffset,
            AnimationCurve::Size(_) => ValueKind::Size,
            AnimationCurve::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Total span in seconds
    pub fn duration(&self) -> f64 {
        match self {
            AnimationCurve::Float(c) => c.duration(),
            AnimationCurve::Color(c) => c.duration(),
            AnimationCurve::Transform(c) => c.duration(),
            AnimationCurve::Filter(c) => c.duration(),
            AnimationCurve::ScrollOffset(c) => c.duration(),
            AnimationCurve::Size(c) => c.duration(),
            AnimationCurve::Boolean(c) => c.duration(),
        }
    }

    /// Sample at curve time `t`
    pub fn value_at(&self, t: f64) -> AnimatedValue {
        match self {
            AnimationCurve::Float(c) => AnimatedValue::Float(c.value_at(t)),
            AnimationCurve::Color(c) => AnimatedValue::Color(c.value_at(t)),
            AnimationCurve::Transform(c) => AnimatedValue::Transform(c.value_at(t)),
            AnimationCurve::Filter(c) => AnimatedValue::Filter(c.value_at(t)),
            AnimationCurve::ScrollOffset(c) => AnimatedValue::ScrollOffset(c.value_at(t)),
            AnimationCurve::Size(c) => AnimatedValue::Size(c.value_at(t)),
            AnimationCurve::Boolean(c) => AnimatedValue::Boolean(c.value_at(t)),
        }
    }

    pub fn start_value(&self) -> AnimatedValue {
        self.value_at(0.0)
    }

    pub fn end_value(&self) -> AnimatedValue {
        self.value_at(self.duration())
    }

    pub fn as_transform(&self) -> Option<&KeyframedCurve<TransformOperations>> {
        match self {
            AnimationCurve::Transform(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_scroll_offset(&self) -> Option<&ScrollOffsetAnimationCurve> {
        match self {
            AnimationCurve::ScrollOffset(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_scroll_offset_mut(&mut self) -> Option<&mut ScrollOffsetAnimationCurve> {
        match self {
            AnimationCurve::ScrollOffset(c) => Some(c),
            _ => None,
        }
    }
}

macro_rules! impl_curve_from {
    ($($curve:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$curve> for AnimationCurve {
                fn from(curve: $curve) -> Self {
                    AnimationCurve::$variant(curve)
                }
            }
        )*
    };
}

impl_curve_from! {
    KeyframedCurve<f32> => Float,
    KeyframedCurve<Color> => Color,
    KeyframedCurve<TransformOperations> => Transform,
    KeyframedCurve<FilterOperations> => Filter,
    ScrollOffsetAnimationCurve => ScrollOffset,
    KeyframedCurve<Size> => Size,
    KeyframedCurve<bool> => Boolean,
}
