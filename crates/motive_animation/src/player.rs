//! Animation players
//!
//! An [`AnimationPlayer`] is the addressable controller of a set of
//! animations. It owns one [`AnimationTicker`], can be bound to one element
//! and one timeline, and carries the per-frame drivers (`tick`,
//! `update_state`) and its half of the main -> impl push.
//!
//! Element binding, ticking-set membership and event routing are managed by
//! the owning [`crate::AnimationHost`]; players are addressed through it by
//! [`PlayerId`].

use std::fmt;

use motive_core::{AnimationId, ElementId, PlayerId, ScrollOffset, TargetProperty, TimelineId};

use crate::animation::Animation;
use crate::delegate::AnimationDelegate;
use crate::element::ElementLists;
use crate::events::{AnimationEvent, AnimationEventType, AnimationEvents};
use crate::target::AnimationTarget;
use crate::ticker::{AnimationTicker, BlockedProperties};
use crate::transition::Transition;

/// Worklet binding of a player driven by a [`crate::LayerTreeMutator`]
#[derive(Clone, Debug, PartialEq)]
pub struct Worklet {
    pub name: String,
    /// Local time last produced by the mutator
    pub local_time: Option<f64>,
    /// Monotonic time of the first frame handed to the mutator
    pub start_time: Option<f64>,
}

pub struct AnimationPlayer {
    id: PlayerId,
    element: Option<ElementId>,
    timeline: Option<TimelineId>,
    ticker: AnimationTicker,
    delegate: Option<Box<dyn AnimationDelegate>>,
    needs_push_properties: bool,
    last_tick_time: Option<f64>,
    worklet: Option<Worklet>,
    transition: Transition,
}

impl AnimationPlayer {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            element: None,
            timeline: None,
            ticker: AnimationTicker::new(),
            delegate: None,
            needs_push_properties: false,
            last_tick_time: None,
            worklet: None,
            transition: Transition::default(),
        }
    }

    /// Player whose timing is driven by the mutator worklet `name`
    pub fn new_worklet(id: PlayerId, name: impl Into<String>) -> Self {
        let mut player = Self::new(id);
        player.worklet = Some(Worklet {
            name: name.into(),
            local_time: None,
            start_time: None,
        });
        player
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    pub fn ticker(&self) -> &AnimationTicker {
        &self.ticker
    }

    pub fn last_tick_time(&self) -> Option<f64> {
        self.last_tick_time
    }

    pub fn needs_push_properties(&self) -> bool {
        self.needs_push_properties
    }

    pub fn worklet(&self) -> Option<&Worklet> {
        self.worklet.as_ref()
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// Time used for state changes requested between ticks
    fn now(&self) -> f64 {
        self.last_tick_time.unwrap_or(0.0)
    }

    pub(crate) fn set_element(&mut self, element: Option<ElementId>) {
        self.element = element;
        self.needs_push_properties = true;
    }

    pub(crate) fn set_timeline(&mut self, timeline: Option<TimelineId>) {
        self.timeline = timeline;
    }

    pub(crate) fn set_needs_push_properties(&mut self) {
        self.needs_push_properties = true;
    }

    pub(crate) fn set_delegate(&mut self, delegate: Option<Box<dyn AnimationDelegate>>) {
        self.delegate = delegate;
    }

    pub(crate) fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
        self.needs_push_properties = true;
    }

    pub(crate) fn set_worklet_local_time(&mut self, local_time: f64) {
        if let Some(worklet) = self.worklet.as_mut() {
            worklet.local_time = Some(local_time);
        }
    }

    /// Time since the worklet was first handed to the mutator at `now`
    pub(crate) fn worklet_current_time(&mut self, now: f64) -> Option<f64> {
        let worklet = self.worklet.as_mut()?;
        let start = *worklet.start_time.get_or_insert(now);
        Some(now - start)
    }

    pub(crate) fn ticker_mut(&mut self) -> &mut AnimationTicker {
        &mut self.ticker
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Animation Management
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn add_animation(&mut self, animation: Animation) {
        self.ticker.add_animation(animation);
        self.needs_push_properties = true;
    }

    pub(crate) fn remove_animation(&mut self, id: AnimationId) -> bool {
        let removed = self.ticker.remove_animation(id);
        self.needs_push_properties = true;
        removed
    }

    pub(crate) fn pause_animation(&mut self, id: AnimationId, offset: f64) -> bool {
        let paused = self.ticker.pause_animation(id, offset);
        self.needs_push_properties |= paused;
        paused
    }

    pub(crate) fn abort_animation(&mut self, id: AnimationId) -> bool {
        let now = self.now();
        let aborted = self.ticker.abort_animation(id, now);
        self.needs_push_properties |= aborted;
        aborted
    }

    pub(crate) fn abort_animations(&mut self, property: TargetProperty, needs_completion: bool) -> bool {
        let now = self.now();
        let aborted = self.ticker.abort_animations(property, needs_completion, now);
        self.needs_push_properties |= aborted;
        aborted
    }

    pub(crate) fn reverse_animation(&mut self, id: AnimationId) -> bool {
        let now = self.now();
        self.reverse_animation_at(id, now)
    }

    pub(crate) fn reverse_animation_at(&mut self, id: AnimationId, now: f64) -> bool {
        let reversed = self.ticker.reverse_animation(id, now);
        self.needs_push_properties |= reversed;
        reversed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Per-Frame Drivers
    // ─────────────────────────────────────────────────────────────────────────

    /// Start free animations and write current values to `target`.
    ///
    /// Does nothing unless the element is in at least one list.
    pub(crate) fn tick(
        &mut self,
        now: f64,
        lists: ElementLists,
        externally_blocked: &BlockedProperties,
        target: &mut dyn AnimationTarget,
    ) {
        if self.element.is_none() || !lists.any() {
            return;
        }
        self.ticker.start_animations(now, externally_blocked);
        if let Some(local_time) = self.worklet.as_ref().and_then(|w| w.local_time) {
            self.ticker.pause_animations_at(local_time);
        }
        self.ticker.tick_animations(now, target);
        self.last_tick_time = Some(now);
    }

    /// Advance the lifecycle at the last tick time.
    ///
    /// Events for the main instance are appended to `events`; events of
    /// impl-only animations stay on this instance and are returned.
    pub(crate) fn update_state(
        &mut self,
        lists: ElementLists,
        start_ready: bool,
        externally_blocked: &BlockedProperties,
        events: &mut AnimationEvents,
    ) -> AnimationEvents {
        let mut local = AnimationEvents::new();
        let (Some(element), Some(now)) = (self.element, self.last_tick_time) else {
            return local;
        };
        if !lists.active {
            return local;
        }

        let mut produced = AnimationEvents::new();
        if start_ready {
            self.ticker
                .promote_started_animations(element, now, &mut produced);
        }
        let finished = self.ticker.mark_finished_animations(now);
        let marked = self
            .ticker
            .mark_animations_for_deletion(element, now, Some(&mut produced));
        self.ticker.purge_animations_marked_for_deletion(true);
        if start_ready {
            self.ticker.start_animations(now, externally_blocked);
            self.ticker
                .promote_started_animations(element, now, &mut produced);
        }
        if finished || marked {
            self.needs_push_properties = true;
        }

        for event in produced {
            if event.is_impl_only && event.kind != AnimationEventType::Takeover {
                local.push(event);
            } else {
                events.push(event);
            }
        }
        local
    }

    /// The pending list became active
    pub(crate) fn activate_animations(&mut self) -> bool {
        self.ticker.activate_animations()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a lifecycle event from the other instance to the ticker and
    /// tell the delegate.
    ///
    /// Returns whether the event changed one of this player's animations.
    pub(crate) fn dispatch_event(&mut self, event: &AnimationEvent) -> bool {
        let matched = match event.kind {
            AnimationEventType::Started => self.ticker.notify_animation_started(event),
            AnimationEventType::Finished => self.ticker.notify_animation_finished(event),
            AnimationEventType::Aborted => self.ticker.notify_animation_aborted(event),
            AnimationEventType::Takeover => {
                self.notify_takeover(event);
                return true;
            }
        };
        if matched {
            self.needs_push_properties = true;
            self.notify_delegate(event);
        }
        matched
    }

    /// Tell the delegate about an event produced by this instance
    pub(crate) fn notify_delegate(&mut self, event: &AnimationEvent) {
        if event.kind == AnimationEventType::Takeover {
            self.notify_takeover(event);
            return;
        }
        let Some(delegate) = self.delegate.as_deref_mut() else {
            return;
        };
        let (time, property, group) = (event.monotonic_time, event.property, event.group);
        match event.kind {
            AnimationEventType::Started => delegate.notify_animation_started(time, property, group),
            AnimationEventType::Finished => delegate.notify_animation_finished(time, property, group),
            AnimationEventType::Aborted => delegate.notify_animation_aborted(time, property, group),
            AnimationEventType::Takeover => {}
        }
    }

    pub(crate) fn notify_takeover(&mut self, event: &AnimationEvent) {
        let (Some(delegate), Some(curve)) = (self.delegate.as_deref_mut(), event.curve.as_ref()) else {
            return;
        };
        delegate.notify_animation_takeover(
            event.monotonic_time,
            event.property,
            event.animation_start_time.unwrap_or(event.monotonic_time),
            curve.clone(),
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Push
    // ─────────────────────────────────────────────────────────────────────────

    /// Bring the impl counterpart up to date.
    ///
    /// Element attachment is reconciled by the host before this runs.
    /// `initial_scroll_offset` seeds scroll offset curves without a start
    /// value; `impl_target` receives the end values of animations aborted
    /// with `needs_completion`.
    pub(crate) fn push_properties_to(
        &mut self,
        other: &mut AnimationPlayer,
        initial_scroll_offset: ScrollOffset,
        impl_target: &mut dyn AnimationTarget,
    ) {
        if !self.needs_push_properties {
            return;
        }
        self.needs_push_properties = false;

        let main_now = self.now();
        let impl_now = other.now();
        self.ticker.mark_aborted_animations_for_deletion(
            &mut other.ticker,
            main_now,
            impl_now,
            impl_target,
        );
        self.ticker.purge_animations_marked_for_deletion(false);
        self.ticker
            .push_new_animations_to_impl_thread(&mut other.ticker, initial_scroll_offset);
        self.ticker
            .remove_animations_completed_on_main_thread(&mut other.ticker);
        self.ticker.push_properties_to_impl_thread(&mut other.ticker);

        other.transition = self.transition.clone();
        tracing::trace!(player = %self.id, animations = other.ticker.len(), "player pushed");
    }
}

impl fmt::Debug for AnimationPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationPlayer")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("timeline", &self.timeline)
            .field("ticker", &self.ticker)
            .field("needs_push_properties", &self.needs_push_properties)
            .field("last_tick_time", &self.last_tick_time)
            .field("worklet", &self.worklet)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::RunState;
    use crate::easing::Easing;
    use crate::keyframe::KeyframedCurve;
    use motive_core::GroupId;
    use std::sync::{Arc, Mutex};

    struct Silent;
    impl AnimationTarget for Silent {}

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl AnimationDelegate for Log {
        fn notify_animation_started(&mut self, _time: f64, property: TargetProperty, _group: GroupId) {
            self.0.lock().unwrap().push(format!("started {property}"));
        }

        fn notify_animation_finished(&mut self, _time: f64, property: TargetProperty, _group: GroupId) {
            self.0.lock().unwrap().push(format!("finished {property}"));
        }
    }

    fn fade(id: u64) -> Animation {
        Animation::new(
            KeyframedCurve::tween(0.0_f32, 1.0, 1.0, Easing::Linear),
            AnimationId(id),
            GroupId(id),
            TargetProperty::Opacity,
        )
    }

    fn attached() -> AnimationPlayer {
        let mut player = AnimationPlayer::new(PlayerId(1));
        player.set_element(Some(ElementId(1)));
        player
    }

    #[test]
    fn test_tick_requires_element_in_a_list() {
        let mut player = attached();
        player.add_animation(fade(1));

        player.tick(0.0, ElementLists::NONE, &BlockedProperties::default(), &mut Silent);
        assert_eq!(player.last_tick_time(), None);
        assert_eq!(
            player.ticker().animations()[0].run_state(),
            RunState::WaitingForTargetAvailability
        );

        player.tick(0.0, ElementLists::BOTH, &BlockedProperties::default(), &mut Silent);
        assert_eq!(player.last_tick_time(), Some(0.0));
        assert_eq!(player.ticker().animations()[0].run_state(), RunState::Starting);
    }

    #[test]
    fn test_update_state_waits_for_first_tick() {
        let mut player = attached();
        player.add_animation(fade(1));
        let mut events = AnimationEvents::new();
        player.update_state(ElementLists::BOTH, true, &BlockedProperties::default(), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_impl_only_events_stay_local() {
        let mut player = attached();
        let mut animation = fade(1).with_impl_only(true);
        animation.set_is_controlling_instance(true);
        player.add_animation(animation);
        let mut visibility = Animation::new(
            KeyframedCurve::tween(false, true, 1.0, Easing::Linear),
            AnimationId(2),
            GroupId(2),
            TargetProperty::Visibility,
        );
        visibility.set_is_controlling_instance(true);
        player.add_animation(visibility);

        player.tick(0.0, ElementLists::BOTH, &BlockedProperties::default(), &mut Silent);
        let mut events = AnimationEvents::new();
        let local = player.update_state(ElementLists::BOTH, true, &BlockedProperties::default(), &mut events);
        assert_eq!(local.len(), 1);
        assert!(local.iter().all(|e| e.is_impl_only));
        assert_eq!(events.len(), 1);
        assert_eq!(events.iter().next().unwrap().property, TargetProperty::Visibility);
    }

    #[test]
    fn test_dispatch_notifies_delegate() {
        let log = Log::default();
        let mut player = attached();
        player.set_delegate(Some(Box::new(log.clone())));
        player.add_animation(fade(1));

        let event = AnimationEvent::new(
            AnimationEventType::Started,
            ElementId(1),
            &player.ticker().animations()[0].clone(),
            0.5,
        );

        // Only an animation waiting for its start time takes the event
        assert!(!player.dispatch_event(&event));
        player
            .ticker_mut()
            .animation_by_id_mut(AnimationId(1))
            .unwrap()
            .set_needs_synchronized_start_time(true);
        assert!(player.dispatch_event(&event));
        assert_eq!(player.ticker().animations()[0].start_time(), Some(0.5));

        let mut unknown = event.clone();
        unknown.animation = AnimationId(99);
        assert!(!player.dispatch_event(&unknown));

        assert_eq!(*log.0.lock().unwrap(), vec!["started opacity".to_string()]);
    }

    #[test]
    fn test_push_is_skipped_when_clean() {
        let mut main = attached();
        let mut other = AnimationPlayer::new(PlayerId(1));
        main.add_animation(fade(1));

        main.push_properties_to(&mut other, ScrollOffset::ZERO, &mut Silent);
        assert_eq!(other.ticker().len(), 1);
        assert!(!main.needs_push_properties());

        main.ticker_mut().add_animation(fade(2));
        main.push_properties_to(&mut other, ScrollOffset::ZERO, &mut Silent);
        assert_eq!(other.ticker().len(), 1);
    }

    #[test]
    fn test_worklet_local_time_seeks_animations() {
        let mut player = AnimationPlayer::new_worklet(PlayerId(3), "parallax");
        player.set_element(Some(ElementId(1)));
        player.add_animation(fade(1));
        player.set_worklet_local_time(0.4);

        player.tick(10.0, ElementLists::BOTH, &BlockedProperties::default(), &mut Silent);
        let animation = &player.ticker().animations()[0];
        assert_eq!(animation.run_state(), RunState::Paused);
        assert!((animation.trim_time_to_current_iteration(20.0) - 0.4).abs() < 1e-9);
        assert_eq!(player.worklet().unwrap().name, "parallax");
    }
}
