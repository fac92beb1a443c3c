//! Scroll offset curves
//!
//! Unlike keyframed curves, a scroll offset curve is defined by its target.
//! The initial value is filled in when the animation is handed to the
//! instance that runs it (the current scroll position), and the duration
//! follows from the distance to travel. The target can be moved while the
//! curve is running; the curve then restarts from its current value.

use motive_core::ScrollOffset;

use crate::easing::Easing;
use crate::keyframe::Interpolate;
use crate::settings::ScrollCurveSettings;

/// How the duration of a scroll segment follows from its length
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DurationBehavior {
    /// Same duration regardless of distance
    Constant,
    /// Longer scrolls take longer (square root of the distance)
    #[default]
    DeltaBased,
    /// Longer scrolls are faster, for small programmatic scrolls
    InverseDelta,
}

/// Curve animating a scroller towards a target offset
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollOffsetAnimationCurve {
    initial_value: Option<ScrollOffset>,
    target_value: ScrollOffset,
    total_animation_duration: f64,
    /// Curve time of the last retarget; the current segment starts here
    last_retarget: f64,
    easing: Easing,
    duration_behavior: DurationBehavior,
    constants: ScrollCurveSettings,
}

impl ScrollOffsetAnimationCurve {
    pub fn new(
        target_value: ScrollOffset,
        easing: Easing,
        duration_behavior: DurationBehavior,
        constants: ScrollCurveSettings,
    ) -> Self {
        Self {
            initial_value: None,
            target_value,
            total_animation_duration: 0.0,
            last_retarget: 0.0,
            easing,
            duration_behavior,
            constants,
        }
    }

    pub fn set_initial_value(&mut self, initial_value: ScrollOffset) {
        self.initial_value = Some(initial_value);
        self.total_animation_duration =
            self.segment_duration(self.target_value.delta_from(initial_value));
    }

    pub fn has_set_initial_value(&self) -> bool {
        self.initial_value.is_some()
    }

    pub fn target_value(&self) -> ScrollOffset {
        self.target_value
    }

    pub fn duration_behavior(&self) -> DurationBehavior {
        self.duration_behavior
    }

    pub fn duration(&self) -> f64 {
        self.total_animation_duration
    }

    pub fn value_at(&self, t: f64) -> ScrollOffset {
        let initial = self.initial_value.unwrap_or(self.target_value);
        let duration = self.total_animation_duration - self.last_retarget;
        let t = t - self.last_retarget;

        if duration <= 0.0 || t >= duration {
            return self.target_value;
        }
        if t <= 0.0 {
            return initial;
        }
        let progress = self.easing.apply(t / duration);
        ScrollOffset::interpolate(&initial, &self.target_value, progress)
    }

    /// Move the target while the curve runs; `t` is the current curve time
    pub fn update_target(&mut self, t: f64, new_target: ScrollOffset) {
        let (dx, dy) = self.target_value.delta_from(new_target);
        if dx.abs().max(dy.abs()) < f32::EPSILON {
            self.target_value = new_target;
            return;
        }

        let t = t.max(self.last_retarget);
        let current = self.value_at(t);
        let remaining = self.segment_duration(new_target.delta_from(current));

        self.initial_value = Some(current);
        self.target_value = new_target;
        self.last_retarget = t;
        self.total_animation_duration = t + remaining;
    }

    fn segment_duration(&self, (dx, dy): (f32, f32)) -> f64 {
        let delta = dx.abs().max(dy.abs()) as f64;
        let c = &self.constants;
        match self.duration_behavior {
            DurationBehavior::Constant => c.constant_duration,
            // One 60Hz frame per square-root pixel
            DurationBehavior::DeltaBased => (delta.sqrt() / 60.0).min(c.delta_based_max_duration),
            DurationBehavior::InverseDelta => {
                let slope = (c.inverse_delta_min_duration - c.inverse_delta_max_duration)
                    / (c.inverse_delta_ramp_end - c.inverse_delta_ramp_start);
                let offset = c.inverse_delta_max_duration - c.inverse_delta_ramp_start * slope;
                (offset + delta * slope)
                    .clamp(c.inverse_delta_min_duration, c.inverse_delta_max_duration)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(behavior: DurationBehavior) -> ScrollOffsetAnimationCurve {
        ScrollOffsetAnimationCurve::new(
            ScrollOffset::new(0.0, 400.0),
            Easing::Linear,
            behavior,
            ScrollCurveSettings::default(),
        )
    }

    #[test]
    fn test_duration_follows_initial_value() {
        let mut constant = curve(DurationBehavior::Constant);
        assert!(!constant.has_set_initial_value());
        constant.set_initial_value(ScrollOffset::ZERO);
        assert_eq!(constant.duration(), 9.0 / 60.0);

        let mut delta_based = curve(DurationBehavior::DeltaBased);
        delta_based.set_initial_value(ScrollOffset::new(0.0, 300.0));
        assert!((delta_based.duration() - 10.0 / 60.0).abs() < 1e-9);

        let mut inverse = curve(DurationBehavior::InverseDelta);
        inverse.set_initial_value(ScrollOffset::new(0.0, 350.0));
        // Short scroll: before the ramp, longest duration
        assert_eq!(inverse.duration(), 12.0 / 60.0);
        inverse.set_initial_value(ScrollOffset::new(0.0, -400.0));
        // Long scroll: past the ramp, shortest duration
        assert_eq!(inverse.duration(), 6.0 / 60.0);
    }

    #[test]
    fn test_value_at_endpoints() {
        let mut c = curve(DurationBehavior::Constant);
        c.set_initial_value(ScrollOffset::new(0.0, 100.0));
        assert_eq!(c.value_at(0.0), ScrollOffset::new(0.0, 100.0));
        assert_eq!(c.value_at(c.duration()), ScrollOffset::new(0.0, 400.0));
        let mid = c.value_at(c.duration() / 2.0);
        assert!((mid.y - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_update_target_restarts_from_current_value() {
        let mut c = curve(DurationBehavior::Constant);
        c.set_initial_value(ScrollOffset::ZERO);
        let t = c.duration() / 2.0;
        let before = c.value_at(t);

        c.update_target(t, ScrollOffset::new(0.0, 800.0));
        assert_eq!(c.target_value(), ScrollOffset::new(0.0, 800.0));
        assert_eq!(c.value_at(t), before);
        assert!((c.duration() - (t + 9.0 / 60.0)).abs() < 1e-9);
        assert_eq!(c.value_at(c.duration()), ScrollOffset::new(0.0, 800.0));
    }
}
