//! Keyframes and keyframed curves
//!
//! A [`KeyframedCurve`] is an ordered list of timestamped values of one
//! value type. Sampling finds the bracketing keyframe pair, eases the local
//! progress with the *leading* keyframe's easing and interpolates.

use motive_core::{Color, FilterOperations, ScrollOffset, Size, TransformOperations};

use crate::easing::Easing;
use crate::error::CurveError;

// ─────────────────────────────────────────────────────────────────────────────
// Interpolation
// ─────────────────────────────────────────────────────────────────────────────

/// Values that can be blended between two keyframes
pub trait Interpolate: Clone {
    /// Value at progress `t` (0.0 = `from`, 1.0 = `to`); `t` may overshoot
    /// for easings that leave the unit range.
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        (*from as f64 + (*to as f64 - *from as f64) * t) as f32
    }
}

impl Interpolate for Color {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from.lerp(to, t as f32)
    }
}

impl Interpolate for Size {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Size::new(
            f32::interpolate(&from.width, &to.width, t).max(0.0),
            f32::interpolate(&from.height, &to.height, t).max(0.0),
        )
    }
}

impl Interpolate for ScrollOffset {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        ScrollOffset::new(
            f32::interpolate(&from.x, &to.x, t),
            f32::interpolate(&from.y, &to.y, t),
        )
    }
}

impl Interpolate for TransformOperations {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        to.blend(from, t as f32)
    }
}

impl Interpolate for FilterOperations {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        to.blend(from, t as f32)
    }
}

/// Booleans hold the leading value until the segment completes
impl Interpolate for bool {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        if t < 1.0 {
            *from
        } else {
            *to
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyframes
// ─────────────────────────────────────────────────────────────────────────────

/// A single keyframe
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    /// Time position in seconds from the start of the curve
    pub time: f64,
    /// Value at this keyframe
    pub value: T,
    /// Easing applied on the way FROM this keyframe to the next
    pub easing: Easing,
}

impl<T> Keyframe<T> {
    pub fn new(time: f64, value: T) -> Self {
        Self {
            time,
            value,
            easing: Easing::Linear,
        }
    }

    /// Builder: set the easing of the segment that starts here
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// A value trajectory built from keyframes with strictly increasing times
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframedCurve<T> {
    keyframes: Vec<Keyframe<T>>,
}

impl<T: Interpolate> KeyframedCurve<T> {
    /// Curve starting with `first`.
    ///
    /// # Panics
    ///
    /// Panics if the keyframe time is negative or not finite.
    pub fn new(first: Keyframe<T>) -> Self {
        Self {
            keyframes: Vec::with_capacity(2),
        }
        .keyframe(first)
    }

    /// Build a curve from a keyframe list, validating the order
    pub fn from_keyframes(
        keyframes: impl IntoIterator<Item = Keyframe<T>>,
    ) -> Result<Self, CurveError> {
        let mut curve = Self {
            keyframes: Vec::new(),
        };
        for keyframe in keyframes {
            curve.try_push(keyframe)?;
        }
        if curve.keyframes.is_empty() {
            return Err(CurveError::Empty);
        }
        Ok(curve)
    }

    /// Two-keyframe curve from `from` at 0 to `to` at `duration`
    pub fn tween(from: T, to: T, duration: f64, easing: Easing) -> Self {
        Self::new(Keyframe::new(0.0, from).with_easing(easing))
            .keyframe(Keyframe::new(duration, to))
    }

    /// Builder: append a keyframe.
    ///
    /// # Panics
    ///
    /// Panics if the keyframe does not come strictly after the last one.
    pub fn keyframe(mut self, keyframe: Keyframe<T>) -> Self {
        if let Err(err) = self.try_push(keyframe) {
            panic!("invalid keyframe: {err}");
        }
        self
    }

    /// Append a keyframe, rejecting non-monotonic times
    pub fn try_push(&mut self, keyframe: Keyframe<T>) -> Result<(), CurveError> {
        if !keyframe.time.is_finite() || keyframe.time < 0.0 {
            return Err(CurveError::InvalidTime(keyframe.time));
        }
        if let Some(last) = self.keyframes.last() {
            if keyframe.time <= last.time {
                return Err(CurveError::NonMonotonicKeyframe {
                    time: keyframe.time,
                    previous: last.time,
                });
            }
        }
        self.keyframes.push(keyframe);
        Ok(())
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    /// Time of the last keyframe
    pub fn duration(&self) -> f64 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    /// Interpolated value at curve time `t`
    pub fn value_at(&self, t: f64) -> T {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => unreachable!("curves always hold a keyframe"),
        };
        if t <= first.time {
            return first.value.clone();
        }
        if t >= last.time {
            return last.value.clone();
        }

        // First keyframe strictly after t; t lies in [from.time, to.time)
        let next = self.keyframes.partition_point(|k| k.time <= t);
        let from = &self.keyframes[next - 1];
        let to = &self.keyframes[next];
        let progress = (t - from.time) / (to.time - from.time);
        T::interpolate(&from.value, &to.value, from.easing.apply(progress))
    }

    /// Value at the end of the curve
    pub fn end_value(&self) -> T {
        self.value_at(self.duration())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform Analytics
// ─────────────────────────────────────────────────────────────────────────────

impl KeyframedCurve<TransformOperations> {
    pub fn is_translation(&self) -> bool {
        self.keyframes.iter().all(|k| k.value.is_translation())
    }

    pub fn preserves_axis_alignment(&self) -> bool {
        self.keyframes
            .iter()
            .all(|k| k.value.preserves_axis_alignment())
    }

    /// Largest scale reached after the starting keyframe of the playback direction
    pub fn maximum_target_scale(&self, forward: bool) -> f32 {
        let skip = if forward { 0 } else { self.keyframes.len() - 1 };
        self.keyframes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip || self.keyframes.len() == 1)
            .map(|(_, k)| k.value.maximum_scale())
            .fold(0.0, f32::max)
    }

    /// Scale of the keyframe the playback direction starts from
    pub fn animation_start_scale(&self, forward: bool) -> f32 {
        let start = if forward {
            self.keyframes.first()
        } else {
            self.keyframes.last()
        };
        start.map_or(1.0, |k| k.value.maximum_scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade() -> KeyframedCurve<f32> {
        KeyframedCurve::new(Keyframe::new(0.0, 0.7)).keyframe(Keyframe::new(1.0, 0.3))
    }

    #[test]
    fn test_linear_float_curve() {
        let curve = fade();
        assert_eq!(curve.duration(), 1.0);
        assert_eq!(curve.value_at(0.0), 0.7);
        assert_eq!(curve.value_at(1.0), 0.3);
        assert!((curve.value_at(0.5) - 0.5).abs() < 1e-6);
        // Clamped outside the keyframe range
        assert_eq!(curve.value_at(-1.0), 0.7);
        assert_eq!(curve.value_at(2.0), 0.3);
    }

    #[test]
    fn test_leading_keyframe_easing_applies() {
        let curve = KeyframedCurve::new(
            Keyframe::new(0.0, 0.0_f32).with_easing(Easing::Steps(2, Default::default())),
        )
        .keyframe(Keyframe::new(1.0, 1.0).with_easing(Easing::EaseIn))
        .keyframe(Keyframe::new(2.0, 0.0));

        assert_eq!(curve.value_at(0.4), 0.0);
        assert_eq!(curve.value_at(0.6), 0.5);
        // Second segment uses the second keyframe's easing
        assert!(curve.value_at(1.5) > 0.5);
    }

    #[test]
    fn test_rejects_non_monotonic_keyframes() {
        let mut curve = fade();
        assert_eq!(
            curve.try_push(Keyframe::new(1.0, 0.0)),
            Err(CurveError::NonMonotonicKeyframe {
                time: 1.0,
                previous: 1.0
            })
        );
        assert!(matches!(
            curve.try_push(Keyframe::new(f64::NAN, 0.0)),
            Err(CurveError::InvalidTime(_))
        ));
        assert_eq!(curve.keyframes().len(), 2);

        let empty: Result<KeyframedCurve<f32>, _> = KeyframedCurve::from_keyframes(vec![]);
        assert_eq!(empty.unwrap_err(), CurveError::Empty);
    }

    #[test]
    #[should_panic(expected = "invalid keyframe")]
    fn test_builder_panics_on_non_monotonic() {
        let _ = fade().keyframe(Keyframe::new(0.5, 1.0));
    }

    #[test]
    fn test_zero_duration_curve_is_its_last_value() {
        let curve = KeyframedCurve::new(Keyframe::new(0.0, Color::RED));
        assert_eq!(curve.duration(), 0.0);
        assert_eq!(curve.value_at(0.0), Color::RED);
        assert_eq!(curve.value_at(5.0), Color::RED);
    }

    #[test]
    fn test_boolean_curve_holds_until_keyframe() {
        let curve = KeyframedCurve::tween(false, true, 1.0, Easing::Linear);
        assert!(!curve.value_at(0.99));
        assert!(curve.value_at(1.0));
    }

    #[test]
    fn test_transform_scale_analytics() {
        let curve = KeyframedCurve::tween(
            TransformOperations::new().scale(2.0, 2.0, 1.0),
            TransformOperations::new().scale(3.0, 1.0, 1.0),
            1.0,
            Easing::Linear,
        );
        assert!(!curve.is_translation());
        assert!(curve.preserves_axis_alignment());
        assert_eq!(curve.animation_start_scale(true), 2.0);
        assert_eq!(curve.animation_start_scale(false), 3.0);
        assert_eq!(curve.maximum_target_scale(true), 3.0);
        assert_eq!(curve.maximum_target_scale(false), 2.0);
    }
}
