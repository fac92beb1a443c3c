//! Implicit transitions
//!
//! A player with a [`Transition`] animates value changes of the listed
//! properties instead of applying them at once: each change becomes a
//! two-keyframe animation from the current value to the new one. A change
//! back to where a running transition came from reverses that transition.

use motive_core::{IdProvider, TargetProperties, TargetProperty};

use crate::animation::Animation;
use crate::curve::{AnimatedValue, AnimationCurve};
use crate::easing::Easing;
use crate::player::AnimationPlayer;
use crate::target::{self, AnimationTarget};

/// Which properties a player transitions, and how
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub properties: TargetProperties,
    /// Seconds
    pub duration: f64,
    pub easing: Easing,
}

impl Transition {
    pub fn new(duration: f64) -> Self {
        Self {
            properties: TargetProperties::empty(),
            duration,
            easing: Easing::Ease,
        }
    }

    /// Builder: transition changes of `property`
    pub fn with_property(mut self, property: TargetProperty) -> Self {
        self.properties.insert(property);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(0.3)
    }
}

/// What a call to [`AnimationPlayer::transition_to`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Property not transitioned; the value was applied directly
    Applied,
    /// A running transition was heading back; it was reversed
    Reversed,
    /// Nothing runs and the value already matches
    Unchanged,
    /// A new transition animation was added
    Started,
}

impl AnimationPlayer {
    /// Move `property` from `from` (its current value) to `to`.
    ///
    /// # Panics
    ///
    /// Panics if the values are not of the property's value kind or the
    /// property has no keyframed curve (scroll offsets).
    pub fn transition_to(
        &mut self,
        now: f64,
        property: TargetProperty,
        from: AnimatedValue,
        to: AnimatedValue,
        ids: &mut IdProvider,
        target: &mut dyn AnimationTarget,
    ) -> TransitionOutcome {
        if !self.transition().properties.contains(property) {
            target::deliver(target, &to, property, None);
            return TransitionOutcome::Applied;
        }
        // A zero-length transition jumps to the new value
        if self.transition().duration <= 0.0 {
            self.remove_property_animations(property);
            target::deliver(target, &to, property, None);
            return TransitionOutcome::Applied;
        }

        match self.ticker().running_animation_for_property(property) {
            Some(running) if running.curve().start_value() == to => {
                let id = running.id();
                self.reverse_animation_at(id, now);
                return TransitionOutcome::Reversed;
            }
            Some(_) => {}
            None if from == to => return TransitionOutcome::Unchanged,
            None => {}
        }

        assert!(
            from.kind() == property.value_kind() && to.kind() == property.value_kind(),
            "{property} cannot transition between {from:?} and {to:?}"
        );
        let transition = self.transition().clone();
        let curve = match AnimationCurve::tween(from, to, transition.duration, transition.easing) {
            Some(curve) => curve,
            None => panic!("{property} has no keyframed curve to transition with"),
        };

        self.remove_property_animations(property);
        let animation = Animation::new(curve, ids.next_animation_id(), ids.next_group_id(), property);
        tracing::debug!(player = %self.id(), %property, animation = %animation.id(), "transition started");
        self.add_animation(animation);
        TransitionOutcome::Started
    }

    fn remove_property_animations(&mut self, property: TargetProperty) {
        let stale: Vec<_> = self
            .ticker()
            .animations()
            .iter()
            .filter(|a| a.property() == property)
            .map(|a| a.id())
            .collect();
        for id in stale {
            self.remove_animation(id);
        }
    }
}
