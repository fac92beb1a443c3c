//! Impl-only scroll offset animations
//!
//! Smooth scrolls started by the impl instance (a wheel tick, a keyboard
//! page-down) have no main counterpart. The impl host keeps one impl-only
//! timeline with one player for them; the player follows whichever
//! scroller is animating.
//!
//! The main instance can take such a scroll over. It records the element
//! with [`AnimationHost::add_scroll_takeover`]; the next push aborts the
//! impl animation with completion, which makes the impl instance send a
//! takeover event carrying the curve back to the main instance.

use motive_core::{ElementId, PlayerId, ScrollOffset, TargetProperty, TimelineId};
use tracing::debug;

use crate::animation::{Animation, RunState};
use crate::easing::Easing;
use crate::host::{AnimationHost, PlayerKey, ThreadInstance};
use crate::scroll_offset::{DurationBehavior, ScrollOffsetAnimationCurve};
use crate::timeline::AnimationTimeline;

/// The impl-only timeline and player running impl scroll animations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollOffsetAnimations {
    pub timeline: TimelineId,
    pub player: PlayerId,
}

impl AnimationHost {
    pub(crate) fn init_scroll_offset_animations(&mut self) {
        let timeline = self.ids.next_timeline_id();
        self.add_timeline(AnimationTimeline::new(timeline).with_impl_only(true));
        let player = self.create_player(timeline);
        self.scroll_offset_animations = Some(ScrollOffsetAnimations { timeline, player });
    }

    /// The impl-only scroll timeline and player, if this host has them
    pub fn scroll_offset_animations(&self) -> Option<ScrollOffsetAnimations> {
        self.scroll_offset_animations
    }

    pub(crate) fn is_scroll_offset_player(&self, key: PlayerKey) -> bool {
        self.scroll_offset_animations
            .and_then(|scroll| self.player_key(scroll.player))
            == Some(key)
    }

    fn scroll_player_key(&self) -> Option<PlayerKey> {
        self.scroll_offset_animations
            .and_then(|scroll| self.player_key(scroll.player))
    }

    /// Start an impl-only scroll of `element` from `current` to `target`.
    ///
    /// Returns `false` on hosts without scroll animation support.
    pub fn impl_only_scroll_animation_create(
        &mut self,
        element: ElementId,
        target: ScrollOffset,
        current: ScrollOffset,
    ) -> bool {
        let Some(key) = self.scroll_player_key() else {
            return false;
        };

        let mut curve = ScrollOffsetAnimationCurve::new(
            target,
            Easing::EaseInOut,
            DurationBehavior::InverseDelta,
            self.settings().scroll,
        );
        curve.set_initial_value(current);
        let animation = Animation::new(
            curve,
            self.ids.next_animation_id(),
            self.ids.next_group_id(),
            TargetProperty::ScrollOffset,
        )
        .with_impl_only(true);

        self.rebind_element(key, element);
        debug!(%element, ?target, ?current, "impl-only scroll animation created");
        let player = self.player_by_key(key).id();
        self.add_animation(player, animation);
        true
    }

    /// Move the target of the running impl-only scroll by `delta`, clamped
    /// to `[0, max_scroll_offset]`.
    ///
    /// Returns `false` when no scroll animation runs.
    ///
    /// # Panics
    ///
    /// Panics if the scroll animation runs on a different element.
    pub fn impl_only_scroll_animation_update_target(
        &mut self,
        element: ElementId,
        (dx, dy): (f32, f32),
        max_scroll_offset: ScrollOffset,
        now: f64,
    ) -> bool {
        let Some(key) = self.scroll_player_key() else {
            return false;
        };
        let Some(current) = self.player_by_key(key).element() else {
            return false;
        };
        assert_eq!(current, element, "the scroll animation runs on {current}");

        let player = self.player_by_key_mut(key);
        let Some(id) = player
            .ticker()
            .animations()
            .iter()
            .find(|a| a.property() == TargetProperty::ScrollOffset && !a.is_finished())
            .map(|a| a.id())
        else {
            return false;
        };
        if dx == 0.0 && dy == 0.0 {
            return true;
        }

        let Some(animation) = player.ticker_mut().animation_by_id_mut(id) else {
            return false;
        };
        let t = if animation.run_state() == RunState::WaitingForTargetAvailability {
            0.0
        } else {
            animation.trim_time_to_current_iteration(now)
        };
        let Some(curve) = animation.curve_mut().as_scroll_offset_mut() else {
            return false;
        };
        let target = curve.target_value();
        let new_target = ScrollOffset::new(target.x + dx, target.y + dy)
            .clamp(ScrollOffset::ZERO, max_scroll_offset);
        curve.update_target(t, new_target);
        debug!(%element, ?new_target, "impl-only scroll retargeted");
        true
    }

    /// Abort the impl-only scroll animation.
    ///
    /// With `needs_completion` the animation is handed back to the main
    /// instance through a takeover event.
    pub fn scroll_animation_abort(&mut self, needs_completion: bool) -> bool {
        let Some(scroll) = self.scroll_offset_animations else {
            return false;
        };
        self.abort_animations(scroll.player, TargetProperty::ScrollOffset, needs_completion)
    }

    /// Take the impl-only scroll of `element` over at the next push
    pub fn add_scroll_takeover(&mut self, element: ElementId) {
        assert_eq!(
            self.thread_instance(),
            ThreadInstance::Main,
            "scroll takeovers are requested by the main instance"
        );
        if !self.scroll_takeovers.contains(&element) {
            self.scroll_takeovers.push(element);
        }
        self.set_needs_push_properties();
    }

    pub(crate) fn push_scroll_takeovers_to(&mut self, other: &mut AnimationHost) {
        for element in std::mem::take(&mut self.scroll_takeovers) {
            let Some(key) = other.scroll_player_key() else {
                continue;
            };
            if other.player_by_key(key).element() == Some(element) {
                debug!(%element, "scroll taken over by the main instance");
                other.scroll_animation_abort(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementLists;
    use crate::events::{AnimationEventType, AnimationEvents};
    use crate::settings::AnimationSettings;
    use crate::target::ElementListType;

    const SCROLLER: ElementId = ElementId(5);

    fn impl_host() -> AnimationHost {
        let mut host = AnimationHost::new(ThreadInstance::Impl, AnimationSettings::default());
        host.register_element(SCROLLER, ElementListType::Active);
        host.register_element(SCROLLER, ElementListType::Pending);
        host
    }

    fn scroll_animation(host: &AnimationHost) -> &Animation {
        let scroll = host.scroll_offset_animations().unwrap();
        &host.player(scroll.player).unwrap().ticker().animations()[0]
    }

    #[test]
    fn test_only_impl_hosts_with_support_scroll() {
        let main = AnimationHost::new(ThreadInstance::Main, AnimationSettings::default());
        assert!(main.scroll_offset_animations().is_none());

        let settings = AnimationSettings {
            supports_scroll_animations: false,
            ..AnimationSettings::default()
        };
        let mut host = AnimationHost::new(ThreadInstance::Impl, settings);
        assert!(!host.impl_only_scroll_animation_create(
            SCROLLER,
            ScrollOffset::new(0.0, 100.0),
            ScrollOffset::ZERO
        ));
    }

    #[test]
    fn test_create_attaches_scroll_player() {
        let mut host = impl_host();
        assert!(host.impl_only_scroll_animation_create(
            SCROLLER,
            ScrollOffset::new(0.0, 300.0),
            ScrollOffset::ZERO
        ));

        let scroll = host.scroll_offset_animations().unwrap();
        assert_eq!(host.player(scroll.player).unwrap().element(), Some(SCROLLER));
        let animation = scroll_animation(&host);
        assert!(animation.is_impl_only());
        assert!(animation.is_controlling_instance());
        assert!(host.is_animating_on_impl_only(SCROLLER, TargetProperty::ScrollOffset));
        assert_eq!(host.element_lists(SCROLLER), ElementLists::BOTH);
    }

    #[test]
    fn test_update_target_clamps() {
        let mut host = impl_host();
        assert!(!host.impl_only_scroll_animation_update_target(
            SCROLLER,
            (0.0, 10.0),
            ScrollOffset::new(0.0, 500.0),
            0.0
        ));

        host.impl_only_scroll_animation_create(
            SCROLLER,
            ScrollOffset::new(0.0, 300.0),
            ScrollOffset::ZERO,
        );
        host.tick_animations(0.0);
        assert!(host.impl_only_scroll_animation_update_target(
            SCROLLER,
            (-50.0, 400.0),
            ScrollOffset::new(200.0, 500.0),
            0.05
        ));

        let curve = scroll_animation(&host).curve().as_scroll_offset().unwrap();
        assert_eq!(curve.target_value(), ScrollOffset::new(0.0, 500.0));
    }

    #[test]
    fn test_abort_with_completion_sends_takeover() {
        let mut host = impl_host();
        host.impl_only_scroll_animation_create(
            SCROLLER,
            ScrollOffset::new(0.0, 300.0),
            ScrollOffset::ZERO,
        );
        host.tick_animations(0.0);
        let mut events = AnimationEvents::new();
        host.update_animation_state(true, &mut events);
        assert!(events.is_empty());

        assert!(host.scroll_animation_abort(true));
        host.update_animation_state(true, &mut events);
        let takeover: Vec<_> = events.of_kind(AnimationEventType::Takeover).collect();
        assert_eq!(takeover.len(), 1);
        assert!(takeover[0].curve.is_some());
        assert_eq!(takeover[0].animation_start_time, Some(0.0));
    }

    #[test]
    fn test_takeover_is_pushed_for_matching_element() {
        let mut main = AnimationHost::new(ThreadInstance::Main, AnimationSettings::default());
        let mut other = main.create_impl_instance();
        other.impl_only_scroll_animation_create(
            SCROLLER,
            ScrollOffset::new(0.0, 300.0),
            ScrollOffset::ZERO,
        );

        main.add_scroll_takeover(ElementId(99));
        main.push_properties_to(&mut other);
        assert_eq!(scroll_animation(&other).run_state(), RunState::WaitingForTargetAvailability);

        main.add_scroll_takeover(SCROLLER);
        main.push_properties_to(&mut other);
        assert_eq!(
            scroll_animation(&other).run_state(),
            RunState::AbortedButNeedsCompletion
        );
    }
}
