//! Animation ticker
//!
//! [`AnimationTicker`] owns the animations of one player and drives them
//! through their lifecycle. Each frame the owning player calls, in order:
//!
//! 1. [`AnimationTicker::start_animations`] - waiting groups whose properties
//!    are free move to `Starting`
//! 2. [`AnimationTicker::tick_animations`] - values are sampled and handed
//!    to the target
//! 3. [`AnimationTicker::promote_started_animations`],
//!    [`AnimationTicker::mark_finished_animations`],
//!    [`AnimationTicker::mark_animations_for_deletion`] and
//!    [`AnimationTicker::purge_animations_marked_for_deletion`] - the
//!    lifecycle advances and events are emitted
//!
//! The sync steps at the bottom of this file run on the main instance's
//! ticker with the impl counterpart as argument.

use std::fmt;

use motive_core::{
    AnimationId, ElementId, ScrollOffset, TargetProperties, TargetProperty,
};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::animation::{Animation, Direction, ElementReach, RunState};
use crate::element::PropertyAnimationState;
use crate::events::{AnimationEvent, AnimationEventType, AnimationEvents};
use crate::target::{self, AnimationTarget, ElementListType};

// ─────────────────────────────────────────────────────────────────────────────
// Blocked Properties
// ─────────────────────────────────────────────────────────────────────────────

/// Properties occupied by started animations, per element list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockedProperties {
    pub active: TargetProperties,
    pub pending: TargetProperties,
}

impl BlockedProperties {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.pending.is_empty()
    }

    pub fn union(self, other: BlockedProperties) -> BlockedProperties {
        BlockedProperties {
            active: self.active.union(other.active),
            pending: self.pending.union(other.pending),
        }
    }

    /// Occupy `property` in the lists `reach` covers
    pub fn insert(&mut self, property: TargetProperty, reach: ElementReach) {
        if reach.affects_active() {
            self.active.insert(property);
        }
        if reach.affects_pending() {
            self.pending.insert(property);
        }
    }
}

/// Whether an animation emits or waits for its own finished event before
/// it may be deleted
fn sends_or_received_finished_event(animation: &Animation) -> bool {
    animation.is_controlling_instance()
        || animation.is_impl_only()
        || animation.received_finished_event()
}

fn plays_forward(animation: &Animation) -> bool {
    match animation.direction() {
        Direction::Normal | Direction::AlternateNormal => animation.playback_rate() >= 0.0,
        Direction::Reverse | Direction::AlternateReverse => animation.playback_rate() < 0.0,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ticker
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered collection of the animations of one player
#[derive(Clone, Debug, Default)]
pub struct AnimationTicker {
    animations: Vec<Animation>,
}

impl AnimationTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// Append an animation; it starts on a later frame
    pub fn add_animation(&mut self, animation: Animation) {
        trace!(%animation, "animation added");
        self.animations.push(animation);
    }

    /// Remove an animation outright; returns whether it existed
    pub fn remove_animation(&mut self, id: AnimationId) -> bool {
        let before = self.animations.len();
        self.animations.retain(|animation| animation.id() != id);
        self.animations.len() != before
    }

    /// Pause a started animation so its active time reads `offset`
    pub fn pause_animation(&mut self, id: AnimationId, offset: f64) -> bool {
        match self.animation_by_id_mut(id) {
            Some(animation) if animation.run_state().is_active() => {
                animation.pause_at(offset);
                true
            }
            _ => false,
        }
    }

    /// Pause every started animation at active time `offset`
    pub fn pause_animations_at(&mut self, offset: f64) {
        for animation in &mut self.animations {
            if animation.run_state().is_active() {
                animation.pause_at(offset);
            }
        }
    }

    pub fn abort_animation(&mut self, id: AnimationId, now: f64) -> bool {
        match self.animation_by_id_mut(id) {
            Some(animation) if !animation.is_finished() => {
                animation.set_run_state(RunState::Aborted, now);
                true
            }
            _ => false,
        }
    }

    /// Abort every unfinished animation of `property`.
    ///
    /// With `needs_completion` the animations move to
    /// `AbortedButNeedsCompletion`: the instance running them completes them
    /// instead of dropping them.
    pub fn abort_animations(
        &mut self,
        property: TargetProperty,
        needs_completion: bool,
        now: f64,
    ) -> bool {
        let state = if needs_completion {
            RunState::AbortedButNeedsCompletion
        } else {
            RunState::Aborted
        };
        let mut aborted = false;
        for animation in &mut self.animations {
            if animation.property() == property && !animation.is_finished() {
                animation.set_run_state(state, now);
                aborted = true;
            }
        }
        aborted
    }

    pub fn reverse_animation(&mut self, id: AnimationId, now: f64) -> bool {
        match self.animation_by_id_mut(id) {
            Some(animation) => {
                animation.reverse(now);
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Properties held by started animations of this ticker
    pub fn blocked_properties(&self) -> BlockedProperties {
        let mut blocked = BlockedProperties::default();
        for animation in &self.animations {
            if animation.run_state().is_active() {
                blocked.insert(animation.property(), animation.reach());
            }
        }
        blocked
    }

    /// Start waiting groups whose properties are free.
    ///
    /// A group starts only if none of its properties is blocked in the
    /// element lists the group reaches, counting `externally_blocked`
    /// (properties held by other players on the same element). Groups are
    /// considered in insertion order and block the properties they claim,
    /// so at most one animation per property starts.
    pub fn start_animations(&mut self, now: f64, externally_blocked: &BlockedProperties) {
        let mut blocked = externally_blocked.union(self.blocked_properties());
        let waiting: SmallVec<[usize; 4]> = self
            .animations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.run_state() == RunState::WaitingForTargetAvailability)
            .map(|(i, _)| i)
            .collect();

        for index in waiting {
            // An earlier group member may have started it already
            if self.animations[index].run_state() != RunState::WaitingForTargetAvailability {
                continue;
            }
            let group = self.animations[index].group();
            let is_member = |a: &Animation| {
                a.group() == group && a.run_state() == RunState::WaitingForTargetAvailability
            };

            let mut enqueued = TargetProperties::empty();
            let mut affects_active = false;
            let mut affects_pending = false;
            for animation in self.animations[index..].iter().filter(|a| is_member(*a)) {
                enqueued.insert(animation.property());
                affects_active |= animation.reach().affects_active();
                affects_pending |= animation.reach().affects_pending();
            }

            // Claim the group's properties even when it cannot start
            let mut free = true;
            for property in enqueued.iter() {
                if affects_active {
                    if blocked.active.contains(property) {
                        free = false;
                    } else {
                        blocked.active.insert(property);
                    }
                }
                if affects_pending {
                    if blocked.pending.contains(property) {
                        free = false;
                    } else {
                        blocked.pending.insert(property);
                    }
                }
            }
            if !free {
                continue;
            }

            for animation in self.animations[index..].iter_mut() {
                if !is_member(&*animation) {
                    continue;
                }
                animation.set_run_state(RunState::Starting, now);
                if animation.start_time().is_none() && !animation.needs_synchronized_start_time()
                {
                    animation.set_start_time(now);
                }
                debug!(animation = %animation.id(), property = %animation.property(), now, "animation starting");
            }
        }
    }

    /// Move starting animations that reach the active list to `Running`
    pub fn promote_started_animations(
        &mut self,
        element: ElementId,
        now: f64,
        events: &mut AnimationEvents,
    ) {
        for animation in &mut self.animations {
            if animation.run_state() != RunState::Starting || !animation.reach().affects_active()
            {
                continue;
            }
            animation.set_run_state(RunState::Running, now);
            if animation.start_time().is_none() && !animation.needs_synchronized_start_time() {
                animation.set_start_time(now);
            }
            let start_time = animation.start_time().unwrap_or(now);
            events.push(AnimationEvent::new(
                AnimationEventType::Started,
                element,
                animation,
                start_time,
            ));
        }
    }

    /// Finish animations that played out; abort those no element list sees
    pub fn mark_finished_animations(&mut self, now: f64) -> bool {
        let mut changed = false;
        for animation in &mut self.animations {
            if !animation.is_finished() && animation.is_finished_at(now) {
                animation.set_run_state(RunState::Finished, now);
                debug!(animation = %animation.id(), now, "animation finished");
                changed = true;
            }
            if animation.reach() == ElementReach::Detached && !animation.is_finished() {
                animation.set_run_state(RunState::Aborted, now);
                changed = true;
            }
        }
        changed
    }

    /// Move done animations to `WaitingForDeletion`, emitting events.
    ///
    /// `events` is present on the instance that reports lifecycle events.
    /// Aborted animations are deleted right away there, and elsewhere once
    /// their finished event arrived. A finished animation is only deleted
    /// together with its whole group, once every member is finished and has
    /// sent or received its finished event.
    pub fn mark_animations_for_deletion(
        &mut self,
        element: ElementId,
        now: f64,
        mut events: Option<&mut AnimationEvents>,
    ) -> bool {
        let mut marked = false;

        for i in 0..self.animations.len() {
            let animation = &self.animations[i];
            let group = animation.group();

            match animation.run_state() {
                RunState::Aborted => {
                    let has_events = events.is_some();
                    if let Some(events) = events.as_deref_mut() {
                        if !animation.is_impl_only() && animation.reach() != ElementReach::Detached
                        {
                            events.push(AnimationEvent::new(
                                AnimationEventType::Aborted,
                                element,
                                animation,
                                now,
                            ));
                        }
                    }
                    if has_events || animation.received_finished_event() {
                        self.animations[i].set_run_state(RunState::WaitingForDeletion, now);
                        marked = true;
                    }
                    continue;
                }
                RunState::AbortedButNeedsCompletion if animation.is_controlling_instance() => {
                    if let Some(events) = events.as_deref_mut() {
                        let mut takeover =
                            AnimationEvent::new(AnimationEventType::Takeover, element, animation, now);
                        takeover.animation_start_time = animation.start_time();
                        takeover.curve = Some(animation.curve().clone());
                        events.push(takeover);
                        self.animations[i].set_run_state(RunState::WaitingForDeletion, now);
                        marked = true;
                    }
                    continue;
                }
                RunState::Finished if sends_or_received_finished_event(animation) => {}
                _ => continue,
            }

            let group_done = self
                .animations
                .iter()
                .filter(|a| a.group() == group)
                .all(|a| {
                    a.is_finished()
                        && !(a.run_state() == RunState::Finished
                            && !sends_or_received_finished_event(a))
                });
            if !group_done {
                continue;
            }

            for j in i..self.animations.len() {
                let member = &self.animations[j];
                if member.group() != group || member.run_state() != RunState::Finished {
                    continue;
                }
                if let Some(events) = events.as_deref_mut() {
                    events.push(AnimationEvent::new(
                        AnimationEventType::Finished,
                        element,
                        member,
                        now,
                    ));
                }
                self.animations[j].set_run_state(RunState::WaitingForDeletion, now);
            }
            marked = true;
        }
        marked
    }

    /// Drop animations waiting for deletion.
    ///
    /// With `impl_only` only impl-only animations go; the others wait until
    /// the main instance has seen them complete.
    pub fn purge_animations_marked_for_deletion(&mut self, impl_only: bool) {
        self.animations.retain(|animation| {
            !(animation.run_state() == RunState::WaitingForDeletion
                && (!impl_only || animation.is_impl_only()))
        });
    }

    /// The pending list became active
    pub fn activate_animations(&mut self) -> bool {
        let mut changed = false;
        for animation in &mut self.animations {
            let reach = animation.reach().activate();
            if reach != animation.reach() {
                animation.set_reach(reach);
                changed = true;
            }
        }
        let before = self.animations.len();
        self.animations
            .retain(|animation| animation.reach() != ElementReach::Detached);
        changed || before != self.animations.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ticking
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tick_animations(&self, now: f64, target: &mut dyn AnimationTarget) {
        for animation in &self.animations {
            Self::tick_animation(now, animation, target);
        }
    }

    /// Sample one started, in-effect animation and hand the value to `target`
    pub fn tick_animation(now: f64, animation: &Animation, target: &mut dyn AnimationTarget) {
        if !animation.run_state().is_active() || !animation.in_effect(now) {
            return;
        }
        let t = animation.trim_time_to_current_iteration(now);
        let value = animation.curve().value_at(t);
        target::deliver(target, &value, animation.property(), Some(animation));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Notifications
    // ─────────────────────────────────────────────────────────────────────────

    /// The impl instance started the animation; adopt its start time.
    ///
    /// Returns whether an animation waiting for a synchronized start time
    /// took it from the event.
    pub fn notify_animation_started(&mut self, event: &AnimationEvent) -> bool {
        let Some(animation) = self.animation_by_id_mut(event.animation) else {
            return false;
        };
        if !animation.needs_synchronized_start_time() {
            return false;
        }
        animation.set_needs_synchronized_start_time(false);
        if animation.start_time().is_none() {
            animation.set_start_time(event.monotonic_time);
        }
        true
    }

    /// Returns `false` for unknown animations and repeated events
    pub fn notify_animation_finished(&mut self, event: &AnimationEvent) -> bool {
        let Some(animation) = self.animation_by_id_mut(event.animation) else {
            return false;
        };
        if animation.received_finished_event() {
            return false;
        }
        animation.set_received_finished_event(true);
        true
    }

    pub fn notify_animation_aborted(&mut self, event: &AnimationEvent) -> bool {
        let Some(animation) = self.animation_by_id_mut(event.animation) else {
            return false;
        };
        if !animation.is_finished() {
            animation.set_run_state(RunState::Aborted, event.monotonic_time);
        }
        animation.set_received_finished_event(true);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Any animation that has not finished
    pub fn has_ticking_animation(&self) -> bool {
        self.animations.iter().any(|a| !a.is_finished())
    }

    pub fn has_non_deleted_animation(&self) -> bool {
        self.animations
            .iter()
            .any(|a| a.run_state() != RunState::WaitingForDeletion)
    }

    pub fn is_potentially_animating_property(
        &self,
        property: TargetProperty,
        list: ElementListType,
    ) -> bool {
        self.animations.iter().any(|a| {
            !a.is_finished() && a.property() == property && a.reach().affects(list)
        })
    }

    pub fn is_currently_animating_property(
        &self,
        property: TargetProperty,
        list: ElementListType,
        now: f64,
    ) -> bool {
        self.animations.iter().any(|a| {
            !a.is_finished() && a.in_effect(now) && a.property() == property && a.reach().affects(list)
        })
    }

    /// Most recently added animation of `property`
    pub fn animation_for_property(&self, property: TargetProperty) -> Option<&Animation> {
        self.animations.iter().rev().find(|a| a.property() == property)
    }

    /// Most recently added started animation of `property`
    pub fn running_animation_for_property(&self, property: TargetProperty) -> Option<&Animation> {
        self.animations
            .iter()
            .rev()
            .find(|a| a.property() == property && a.run_state().is_active())
    }

    pub fn animation_by_id(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.iter().find(|a| a.id() == id)
    }

    pub fn animation_by_id_mut(&mut self, id: AnimationId) -> Option<&mut Animation> {
        self.animations.iter_mut().find(|a| a.id() == id)
    }

    /// Animating properties in the pending and active lists at `now`
    pub fn property_animation_state(
        &self,
        now: f64,
    ) -> (PropertyAnimationState, PropertyAnimationState) {
        let mut pending = PropertyAnimationState::default();
        let mut active = PropertyAnimationState::default();
        for animation in self.animations.iter().filter(|a| !a.is_finished()) {
            let in_effect = animation.in_effect(now);
            if animation.reach().affects_pending() {
                pending.insert(animation.property(), in_effect);
            }
            if animation.reach().affects_active() {
                active.insert(animation.property(), in_effect);
            }
        }
        (pending, active)
    }

    /// Whether a scroll offset curve still lacks its starting value
    pub fn needs_scroll_initial_value(&self) -> bool {
        self.animations.iter().any(|a| {
            a.curve()
                .as_scroll_offset()
                .is_some_and(|curve| !curve.has_set_initial_value())
        })
    }

    fn transform_animations(
        &self,
        list: Option<ElementListType>,
    ) -> impl Iterator<Item = &Animation> + '_ {
        self.animations.iter().filter(move |a| {
            !a.is_finished()
                && a.property() == TargetProperty::Transform
                && list.map_or(true, |list| a.reach().affects(list))
        })
    }

    pub fn has_only_translation_transforms(&self, list: ElementListType) -> bool {
        self.transform_animations(Some(list))
            .all(|a| a.curve().as_transform().map_or(true, |c| c.is_translation()))
    }

    pub fn animations_preserve_axis_alignment(&self) -> bool {
        self.transform_animations(None).all(|a| {
            a.curve()
                .as_transform()
                .map_or(true, |c| c.preserves_axis_alignment())
        })
    }

    /// Largest scale any transform animation reaches, 0 without any
    pub fn maximum_target_scale(&self, list: ElementListType) -> f32 {
        self.transform_animations(Some(list))
            .filter_map(|a| {
                a.curve()
                    .as_transform()
                    .map(|c| c.maximum_target_scale(plays_forward(a)))
            })
            .fold(0.0, f32::max)
    }

    /// Largest starting scale of the transform animations, 0 without any
    pub fn animation_start_scale(&self, list: ElementListType) -> f32 {
        self.transform_animations(Some(list))
            .filter_map(|a| {
                a.curve()
                    .as_transform()
                    .map(|c| c.animation_start_scale(plays_forward(a)))
            })
            .fold(0.0, f32::max)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Main -> Impl Sync
    // ─────────────────────────────────────────────────────────────────────────

    /// Retire impl counterparts of animations aborted on main.
    ///
    /// A counterpart of an animation aborted with `needs_completion` first
    /// writes the curve's end value through `impl_target`.
    pub fn mark_aborted_animations_for_deletion(
        &mut self,
        other: &mut AnimationTicker,
        main_now: f64,
        impl_now: f64,
        impl_target: &mut dyn AnimationTarget,
    ) -> bool {
        let mut changed = false;
        for animation in &mut self.animations {
            let needs_completion = match animation.run_state() {
                RunState::Aborted => false,
                RunState::AbortedButNeedsCompletion => true,
                _ => continue,
            };
            if let Some(counterpart) = other.animation_by_id_mut(animation.id()) {
                if needs_completion && !counterpart.is_finished() {
                    let end = counterpart.curve().end_value();
                    target::deliver(impl_target, &end, counterpart.property(), Some(counterpart));
                }
                counterpart.retire(impl_now);
            }
            animation.set_run_state(RunState::WaitingForDeletion, main_now);
            changed = true;
        }
        changed
    }

    /// Clone animations the impl ticker does not have yet
    pub fn push_new_animations_to_impl_thread(
        &mut self,
        other: &mut AnimationTicker,
        initial_scroll_offset: ScrollOffset,
    ) {
        for animation in &mut self.animations {
            if animation.is_finished() || other.animation_by_id(animation.id()).is_some() {
                continue;
            }
            if let Some(curve) = animation.curve_mut().as_scroll_offset_mut() {
                if !curve.has_set_initial_value() {
                    curve.set_initial_value(initial_scroll_offset);
                }
            }
            // The impl instance decides when it starts
            if animation.start_time().is_none() {
                animation.set_needs_synchronized_start_time(true);
            }
            let mut clone = animation.clone_and_initialize(RunState::WaitingForTargetAvailability);
            clone.set_reach(ElementReach::PendingOnly);
            debug!(animation = %clone.id(), property = %clone.property(), "animation pushed");
            other.add_animation(clone);
        }
    }

    /// Stop impl animations that no longer exist on main from reaching the
    /// pending list, and drop those that are also done
    pub fn remove_animations_completed_on_main_thread(&self, other: &mut AnimationTicker) -> bool {
        let mut changed = false;
        for counterpart in &mut other.animations {
            let completed = if counterpart.is_impl_only() {
                counterpart.run_state() == RunState::WaitingForDeletion
            } else {
                self.animation_by_id(counterpart.id()).is_none()
            };
            if completed && counterpart.reach().affects_pending() {
                counterpart.set_reach(counterpart.reach().remove_from_pending());
                changed = true;
            }
        }
        let before = other.animations.len();
        other.animations.retain(|a| {
            !(a.run_state() == RunState::WaitingForDeletion && !a.reach().affects_pending())
        });
        changed || before != other.animations.len()
    }

    /// Copy per-animation state onto the counterparts by id
    pub fn push_properties_to_impl_thread(&self, other: &mut AnimationTicker) {
        for counterpart in &mut other.animations {
            if let Some(animation) = self.animation_by_id(counterpart.id()) {
                animation.push_properties_to(counterpart);
            }
        }
    }
}

impl fmt::Display for AnimationTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, animation) in self.animations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{animation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::AnimatedValue;
    use crate::easing::Easing;
    use crate::keyframe::KeyframedCurve;
    use motive_core::{GroupId, TransformOperations};

    const ELEMENT: ElementId = ElementId(1);

    #[derive(Default)]
    struct Values(Vec<(TargetProperty, AnimatedValue)>);

    impl AnimationTarget for Values {
        fn notify_client_float_animated(
            &mut self,
            value: f32,
            property: TargetProperty,
            _animation: Option<&Animation>,
        ) {
            self.0.push((property, AnimatedValue::Float(value)));
        }

        fn notify_client_transform_animated(
            &mut self,
            value: &TransformOperations,
            property: TargetProperty,
            _animation: Option<&Animation>,
        ) {
            self.0.push((property, AnimatedValue::Transform(value.clone())));
        }
    }

    fn opacity(id: u64, group: u64, duration: f64) -> Animation {
        Animation::new(
            KeyframedCurve::tween(0.0_f32, 1.0, duration, Easing::Linear),
            AnimationId(id),
            GroupId(group),
            TargetProperty::Opacity,
        )
    }

    fn transform(id: u64, group: u64) -> Animation {
        Animation::new(
            KeyframedCurve::tween(
                TransformOperations::new(),
                TransformOperations::new().translate(10.0, 0.0, 0.0),
                1.0,
                Easing::Linear,
            ),
            AnimationId(id),
            GroupId(group),
            TargetProperty::Transform,
        )
    }

    fn controlling(mut animation: Animation) -> Animation {
        animation.set_is_controlling_instance(true);
        animation
    }

    fn state_of(ticker: &AnimationTicker, id: u64) -> RunState {
        ticker.animation_by_id(AnimationId(id)).unwrap().run_state()
    }

    #[test]
    fn test_one_animation_per_property_starts() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(opacity(1, 1, 1.0));
        ticker.add_animation(opacity(2, 2, 1.0));
        ticker.add_animation(transform(3, 3));

        ticker.start_animations(0.0, &BlockedProperties::default());
        assert_eq!(state_of(&ticker, 1), RunState::Starting);
        assert_eq!(state_of(&ticker, 2), RunState::WaitingForTargetAvailability);
        assert_eq!(state_of(&ticker, 3), RunState::Starting);
        assert_eq!(ticker.animation_by_id(AnimationId(1)).unwrap().start_time(), Some(0.0));

        // Still blocked while the first one runs
        ticker.start_animations(0.5, &BlockedProperties::default());
        assert_eq!(state_of(&ticker, 2), RunState::WaitingForTargetAvailability);
    }

    #[test]
    fn test_group_starts_together_or_not_at_all() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(opacity(1, 7, 1.0));
        ticker.add_animation(transform(2, 7));

        let mut external = BlockedProperties::default();
        external.insert(TargetProperty::Transform, ElementReach::Both);
        ticker.start_animations(0.0, &external);
        assert_eq!(state_of(&ticker, 1), RunState::WaitingForTargetAvailability);
        assert_eq!(state_of(&ticker, 2), RunState::WaitingForTargetAvailability);

        ticker.start_animations(0.0, &BlockedProperties::default());
        assert_eq!(state_of(&ticker, 1), RunState::Starting);
        assert_eq!(state_of(&ticker, 2), RunState::Starting);
    }

    #[test]
    fn test_pending_only_animation_ignores_active_blocks() {
        let mut ticker = AnimationTicker::new();
        let mut pending = opacity(1, 1, 1.0);
        pending.set_reach(ElementReach::PendingOnly);
        ticker.add_animation(pending);

        let mut external = BlockedProperties::default();
        external.insert(TargetProperty::Opacity, ElementReach::ActiveOnly);
        ticker.start_animations(0.0, &external);
        assert_eq!(state_of(&ticker, 1), RunState::Starting);

        // Not promoted until it reaches the active list
        let mut events = AnimationEvents::new();
        ticker.promote_started_animations(ELEMENT, 0.0, &mut events);
        assert_eq!(state_of(&ticker, 1), RunState::Starting);
        assert!(events.is_empty());

        assert!(ticker.activate_animations());
        ticker.promote_started_animations(ELEMENT, 0.1, &mut events);
        assert_eq!(state_of(&ticker, 1), RunState::Running);
        assert_eq!(events.len(), 1);
        assert_eq!(events.iter().next().unwrap().monotonic_time, 0.0);
    }

    #[test]
    fn test_tick_delivers_values() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(opacity(1, 1, 1.0));
        ticker.add_animation(opacity(2, 2, 1.0));

        let mut values = Values::default();
        ticker.tick_animations(0.0, &mut values);
        assert!(values.0.is_empty());

        ticker.start_animations(0.0, &BlockedProperties::default());
        ticker.tick_animations(0.25, &mut values);
        assert_eq!(
            values.0,
            vec![(TargetProperty::Opacity, AnimatedValue::Float(0.25))]
        );
    }

    #[test]
    fn test_finish_emits_group_events() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(controlling(opacity(1, 5, 1.0)));
        ticker.add_animation(controlling(transform(2, 5)));
        ticker.start_animations(0.0, &BlockedProperties::default());

        let mut events = AnimationEvents::new();
        ticker.promote_started_animations(ELEMENT, 0.0, &mut events);
        assert_eq!(events.of_kind(AnimationEventType::Started).count(), 2);

        assert!(ticker.mark_finished_animations(1.0));
        let mut events = AnimationEvents::new();
        assert!(ticker.mark_animations_for_deletion(ELEMENT, 1.0, Some(&mut events)));
        assert_eq!(events.of_kind(AnimationEventType::Finished).count(), 2);
        assert_eq!(state_of(&ticker, 1), RunState::WaitingForDeletion);
        assert_eq!(state_of(&ticker, 2), RunState::WaitingForDeletion);

        assert!(!ticker.has_non_deleted_animation());
        ticker.purge_animations_marked_for_deletion(false);
        assert!(ticker.is_empty());
    }

    #[test]
    fn test_group_waits_for_unfinished_member() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(controlling(opacity(1, 5, 1.0)));
        ticker.add_animation(controlling(opacity(2, 6, 1.0)));
        ticker.add_animation(controlling(transform(3, 5)).with_iterations(3.0));
        ticker.start_animations(0.0, &BlockedProperties::default());
        let mut events = AnimationEvents::new();
        ticker.promote_started_animations(ELEMENT, 0.0, &mut events);

        ticker.mark_finished_animations(1.5);
        let mut events = AnimationEvents::new();
        ticker.mark_animations_for_deletion(ELEMENT, 1.5, Some(&mut events));
        assert_eq!(state_of(&ticker, 1), RunState::Finished);
        assert_eq!(state_of(&ticker, 3), RunState::Running);
        assert!(events.is_empty());
    }

    #[test]
    fn test_non_controlling_finish_waits_for_event() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(opacity(1, 1, 1.0));
        ticker.start_animations(0.0, &BlockedProperties::default());
        ticker.promote_started_animations(ELEMENT, 0.0, &mut AnimationEvents::new());
        ticker.mark_finished_animations(2.0);

        ticker.mark_animations_for_deletion(ELEMENT, 2.0, None);
        assert_eq!(state_of(&ticker, 1), RunState::Finished);

        let event = AnimationEvent::new(
            AnimationEventType::Finished,
            ELEMENT,
            ticker.animation_by_id(AnimationId(1)).unwrap(),
            2.0,
        );
        assert!(ticker.notify_animation_finished(&event));
        ticker.mark_animations_for_deletion(ELEMENT, 2.0, None);
        assert_eq!(state_of(&ticker, 1), RunState::WaitingForDeletion);
    }

    #[test]
    fn test_abort_and_takeover_events() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(controlling(opacity(1, 1, 1.0)));
        ticker.add_animation(controlling(transform(2, 2)).with_start_time(0.5));
        ticker.start_animations(0.5, &BlockedProperties::default());

        assert!(ticker.abort_animations(TargetProperty::Opacity, false, 0.6));
        assert!(ticker.abort_animations(TargetProperty::Transform, true, 0.6));
        assert_eq!(state_of(&ticker, 2), RunState::AbortedButNeedsCompletion);

        let mut events = AnimationEvents::new();
        ticker.mark_animations_for_deletion(ELEMENT, 0.6, Some(&mut events));
        assert_eq!(events.of_kind(AnimationEventType::Aborted).count(), 1);
        let takeover = events.of_kind(AnimationEventType::Takeover).next().unwrap();
        assert_eq!(takeover.animation_start_time, Some(0.5));
        assert!(takeover.curve.is_some());
        assert!(!ticker.has_non_deleted_animation());
    }

    #[test]
    fn test_remove_reports_any_removal() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(opacity(1, 1, 1.0));
        let mut finished = opacity(2, 2, 1.0);
        finished.set_run_state(RunState::Running, 0.0);
        finished.set_run_state(RunState::Finished, 1.0);
        ticker.add_animation(finished);

        assert!(ticker.remove_animation(AnimationId(1)));
        assert!(!ticker.remove_animation(AnimationId(1)));
        assert!(ticker.remove_animation(AnimationId(2)));
        assert!(ticker.is_empty());
    }

    #[test]
    fn test_pause_only_affects_started_animations() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(opacity(1, 1, 2.0));
        assert!(!ticker.pause_animation(AnimationId(1), 0.5));

        ticker.start_animations(1.0, &BlockedProperties::default());
        assert!(ticker.pause_animation(AnimationId(1), 0.5));
        let animation = ticker.animation_by_id(AnimationId(1)).unwrap();
        assert_eq!(animation.run_state(), RunState::Paused);
        assert_eq!(animation.trim_time_to_current_iteration(100.0), 0.5);
    }

    #[test]
    fn test_property_state_and_queries() {
        let mut ticker = AnimationTicker::new();
        ticker.add_animation(opacity(1, 1, 1.0));
        let mut pending = transform(2, 2);
        pending.set_reach(ElementReach::PendingOnly);
        ticker.add_animation(pending);

        let (pending_state, active_state) = ticker.property_animation_state(0.0);
        assert!(pending_state.potentially_animating.contains(TargetProperty::Transform));
        assert!(!active_state.potentially_animating.contains(TargetProperty::Transform));
        assert!(active_state.currently_running.contains(TargetProperty::Opacity));

        assert!(ticker.is_potentially_animating_property(
            TargetProperty::Transform,
            ElementListType::Pending
        ));
        assert!(!ticker.is_potentially_animating_property(
            TargetProperty::Transform,
            ElementListType::Active
        ));
        assert!(ticker.has_only_translation_transforms(ElementListType::Pending));
        assert_eq!(ticker.maximum_target_scale(ElementListType::Pending), 1.0);
        assert_eq!(ticker.maximum_target_scale(ElementListType::Active), 0.0);
        assert_eq!(
            ticker.animation_for_property(TargetProperty::Opacity).unwrap().id(),
            AnimationId(1)
        );
        assert!(ticker.to_string().contains("property=opacity"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sync
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_push_new_animations_clones_once() {
        let mut main = AnimationTicker::new();
        let mut other = AnimationTicker::new();
        main.add_animation(opacity(1, 1, 1.0));

        main.push_new_animations_to_impl_thread(&mut other, ScrollOffset::ZERO);
        main.push_new_animations_to_impl_thread(&mut other, ScrollOffset::ZERO);
        assert_eq!(other.len(), 1);

        let clone = &other.animations()[0];
        assert_eq!(clone.id(), AnimationId(1));
        assert_eq!(clone.run_state(), RunState::WaitingForTargetAvailability);
        assert_eq!(clone.reach(), ElementReach::PendingOnly);
        assert!(clone.is_controlling_instance());
        assert!(main.animations()[0].needs_synchronized_start_time());
    }

    #[test]
    fn test_removed_on_main_leaves_pending_then_active() {
        let mut main = AnimationTicker::new();
        let mut other = AnimationTicker::new();
        main.add_animation(opacity(1, 1, 1.0));
        main.push_new_animations_to_impl_thread(&mut other, ScrollOffset::ZERO);
        other.activate_animations();

        main.remove_animation(AnimationId(1));
        assert!(main.remove_animations_completed_on_main_thread(&mut other));
        assert_eq!(other.animations()[0].reach(), ElementReach::ActiveOnly);

        assert!(other.activate_animations());
        assert!(other.is_empty());
    }

    #[test]
    fn test_aborted_on_main_retires_counterpart() {
        let mut main = AnimationTicker::new();
        let mut other = AnimationTicker::new();
        main.add_animation(opacity(1, 1, 1.0));
        main.push_new_animations_to_impl_thread(&mut other, ScrollOffset::ZERO);
        other.activate_animations();
        other.start_animations(0.0, &BlockedProperties::default());

        main.abort_animations(TargetProperty::Opacity, true, 0.3);
        let mut values = Values::default();
        assert!(main.mark_aborted_animations_for_deletion(&mut other, 0.3, 0.3, &mut values));

        assert_eq!(values.0, vec![(TargetProperty::Opacity, AnimatedValue::Float(1.0))]);
        assert_eq!(state_of(&other, 1), RunState::WaitingForDeletion);
        assert_eq!(state_of(&main, 1), RunState::WaitingForDeletion);
    }

    #[test]
    fn test_push_properties_mirrors_pause() {
        let mut main = AnimationTicker::new();
        let mut other = AnimationTicker::new();
        main.add_animation(opacity(1, 1, 1.0));
        main.start_animations(0.0, &BlockedProperties::default());
        main.push_new_animations_to_impl_thread(&mut other, ScrollOffset::ZERO);

        main.pause_animation(AnimationId(1), 0.25);
        main.push_properties_to_impl_thread(&mut other);
        let counterpart = other.animation_by_id(AnimationId(1)).unwrap();
        assert_eq!(counterpart.run_state(), RunState::Paused);
        assert_eq!(counterpart.trim_time_to_current_iteration(9.0), 0.25);
    }
}
