//! Animation host
//!
//! The per-thread-instance registry. A host owns the timelines, the player
//! arena, the shared per-element records and the ticking set, and exposes
//! the four per-frame drivers:
//!
//! - [`AnimationHost::tick_animations`] samples ticking players
//! - [`AnimationHost::update_animation_state`] advances their lifecycles
//! - [`AnimationHost::activate_animations`] follows pending -> active
//! - [`AnimationHost::push_properties_to`] mirrors main onto impl
//!
//! Lifecycle events produced by the impl host travel back to the main host
//! through [`AnimationHost::set_animation_events`].
//!
//! # Example
//!
//! ```rust
//! use motive_animation::{
//!     Animation, AnimationHost, AnimationSettings, Easing, ElementListType,
//!     KeyframedCurve, ThreadInstance,
//! };
//! use motive_core::{ElementId, TargetProperty};
//!
//! let mut main = AnimationHost::new(ThreadInstance::Main, AnimationSettings::default());
//! let mut imp = main.create_impl_instance();
//!
//! let timeline = main.create_timeline();
//! let player = main.create_player(timeline);
//! main.attach_element(player, ElementId(7));
//!
//! let fade = Animation::new(
//!     KeyframedCurve::tween(1.0_f32, 0.0, 0.5, Easing::EaseOut),
//!     main.next_animation_id(),
//!     main.next_group_id(),
//!     TargetProperty::Opacity,
//! );
//! main.add_animation(player, fade);
//!
//! main.push_properties_to(&mut imp);
//! imp.register_element(ElementId(7), ElementListType::Active);
//! imp.register_element(ElementId(7), ElementListType::Pending);
//!
//! // Pushed animations reach the pending list until it is activated
//! imp.activate_animations();
//! imp.tick_animations(0.0);
//! assert!(imp.is_animating_property(ElementId(7), TargetProperty::Opacity, ElementListType::Active));
//! ```

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use motive_core::{
    AnimationId, ElementId, GroupId, IdProvider, PlayerId, ScrollOffset, TargetProperty,
    TimelineId,
};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::{debug, trace, trace_span};

use crate::animation::Animation;
use crate::client::MutatorHostClient;
use crate::curve::AnimatedValue;
use crate::delegate::AnimationDelegate;
use crate::element::{ElementAnimations, ElementLists, PropertyAnimationState};
use crate::events::{AnimationEvent, AnimationEventType, AnimationEvents};
use crate::mutator::{AnimatorState, LayerTreeMutator, MutatorInputState};
use crate::player::AnimationPlayer;
use crate::scroll::ScrollOffsetAnimations;
use crate::settings::AnimationSettings;
use crate::target::{AnimationTarget, ElementListType, ElementTarget};
use crate::ticker::BlockedProperties;
use crate::timeline::AnimationTimeline;
use crate::transition::{Transition, TransitionOutcome};

new_key_type! {
    /// Arena handle of a player within one host
    pub struct PlayerKey;
}

/// Which side of the main/impl pair a host is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThreadInstance {
    Main,
    Impl,
}

/// Target for players without an element
struct Unattached;

impl AnimationTarget for Unattached {}

type PlayerKeys = SmallVec<[PlayerKey; 8]>;

pub struct AnimationHost {
    thread_instance: ThreadInstance,
    settings: AnimationSettings,
    pub(crate) ids: IdProvider,
    timelines: IndexMap<TimelineId, AnimationTimeline>,
    players: SlotMap<PlayerKey, AnimationPlayer>,
    player_keys: FxHashMap<PlayerId, PlayerKey>,
    elements: IndexMap<ElementId, ElementAnimations>,
    element_lists: FxHashMap<ElementId, ElementLists>,
    ticking: IndexSet<PlayerKey>,
    pub(crate) client: Option<Box<dyn MutatorHostClient>>,
    mutator: Option<Box<dyn LayerTreeMutator>>,
    /// Impl-only scroll offset animations (impl instance)
    pub(crate) scroll_offset_animations: Option<ScrollOffsetAnimations>,
    /// Elements whose impl-only scroll animation the main instance takes over
    pub(crate) scroll_takeovers: SmallVec<[ElementId; 2]>,
    main_thread_animations_count: usize,
    needs_push_properties: bool,
}

impl AnimationHost {
    pub fn new(thread_instance: ThreadInstance, settings: AnimationSettings) -> Self {
        let ids = match thread_instance {
            ThreadInstance::Main => IdProvider::new(),
            ThreadInstance::Impl => IdProvider::for_impl_instance(),
        };
        let mut host = Self {
            thread_instance,
            settings,
            ids,
            timelines: IndexMap::new(),
            players: SlotMap::with_key(),
            player_keys: FxHashMap::default(),
            elements: IndexMap::new(),
            element_lists: FxHashMap::default(),
            ticking: IndexSet::new(),
            client: None,
            mutator: None,
            scroll_offset_animations: None,
            scroll_takeovers: SmallVec::new(),
            main_thread_animations_count: 0,
            needs_push_properties: false,
        };
        if thread_instance == ThreadInstance::Impl && host.settings.supports_scroll_animations {
            host.init_scroll_offset_animations();
        }
        debug!(instance = ?thread_instance, "animation host created");
        host
    }

    /// Empty impl counterpart sharing this host's settings
    pub fn create_impl_instance(&self) -> AnimationHost {
        assert_eq!(
            self.thread_instance,
            ThreadInstance::Main,
            "impl instances are created from the main instance"
        );
        AnimationHost::new(ThreadInstance::Impl, self.settings.clone())
    }

    pub fn thread_instance(&self) -> ThreadInstance {
        self.thread_instance
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn set_client(&mut self, client: Option<Box<dyn MutatorHostClient>>) {
        self.client = client;
    }

    pub fn set_mutator(&mut self, mutator: Option<Box<dyn LayerTreeMutator>>) {
        self.mutator = mutator;
    }

    pub fn next_animation_id(&mut self) -> AnimationId {
        self.ids.next_animation_id()
    }

    pub fn next_group_id(&mut self) -> GroupId {
        self.ids.next_group_id()
    }

    pub fn needs_push_properties(&self) -> bool {
        self.needs_push_properties
    }

    pub(crate) fn set_needs_push_properties(&mut self) {
        self.needs_push_properties = true;
    }

    fn key(&self, player: PlayerId) -> PlayerKey {
        match self.player_keys.get(&player) {
            Some(key) => *key,
            None => panic!("{player} is not registered with this host"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timelines & Players
    // ─────────────────────────────────────────────────────────────────────────

    pub fn create_timeline(&mut self) -> TimelineId {
        let id = self.ids.next_timeline_id();
        self.add_timeline(AnimationTimeline::new(id));
        id
    }

    /// Register an empty timeline
    pub fn add_timeline(&mut self, timeline: AnimationTimeline) {
        let id = timeline.id();
        assert!(
            !self.timelines.contains_key(&id),
            "{id} is already registered with this host"
        );
        assert!(timeline.players().is_empty(), "{id} must be added without players");
        debug!(timeline = %id, impl_only = timeline.is_impl_only(), "timeline added");
        self.timelines.insert(id, timeline);
        self.set_needs_push_properties();
    }

    /// Remove a timeline together with its players
    pub fn remove_timeline(&mut self, id: TimelineId) -> bool {
        let Some(timeline) = self.timelines.shift_remove(&id) else {
            return false;
        };
        for player in timeline.players() {
            self.remove_player(*player);
        }
        debug!(timeline = %id, "timeline removed");
        self.set_needs_push_properties();
        true
    }

    pub fn timeline(&self, id: TimelineId) -> Option<&AnimationTimeline> {
        self.timelines.get(&id)
    }

    pub fn timelines(&self) -> impl Iterator<Item = &AnimationTimeline> {
        self.timelines.values()
    }

    pub fn create_player(&mut self, timeline: TimelineId) -> PlayerId {
        let id = self.ids.next_player_id();
        self.add_player(timeline, AnimationPlayer::new(id));
        id
    }

    /// Create a player whose timing comes from the mutator worklet `name`
    pub fn create_worklet_player(&mut self, timeline: TimelineId, name: impl Into<String>) -> PlayerId {
        let id = self.ids.next_player_id();
        self.add_player(timeline, AnimationPlayer::new_worklet(id, name));
        id
    }

    fn add_player(&mut self, timeline: TimelineId, mut player: AnimationPlayer) -> PlayerKey {
        let id = player.id();
        assert!(
            !self.player_keys.contains_key(&id),
            "{id} is already registered with this host"
        );
        let Some(record) = self.timelines.get_mut(&timeline) else {
            panic!("{timeline} is not registered with this host");
        };
        record.attach_player(id);
        player.set_timeline(Some(timeline));
        if self.thread_instance == ThreadInstance::Main {
            let transition = self
                .settings
                .transition_properties
                .iter()
                .fold(Transition::new(self.settings.transition_duration), |t, p| {
                    t.with_property(*p)
                });
            player.set_transition(transition);
        }

        let key = self.players.insert(player);
        self.player_keys.insert(id, key);
        debug!(player = %id, %timeline, "player created");
        self.set_needs_push_properties();
        key
    }

    /// Detach a player from its timeline and element and drop it
    pub fn detach_player(&mut self, id: PlayerId) -> bool {
        let Some(&key) = self.player_keys.get(&id) else {
            return false;
        };
        if let Some(timeline) = self.players[key].timeline() {
            if let Some(record) = self.timelines.get_mut(&timeline) {
                record.detach_player(id);
            }
        }
        self.remove_player(id);
        true
    }

    fn remove_player(&mut self, id: PlayerId) {
        let Some(key) = self.player_keys.remove(&id) else {
            return;
        };
        self.unbind_element(key);
        self.ticking.shift_remove(&key);
        self.players.remove(key);
        debug!(player = %id, "player removed");
        self.set_needs_push_properties();
    }

    pub fn player(&self, id: PlayerId) -> Option<&AnimationPlayer> {
        self.player_keys.get(&id).and_then(|key| self.players.get(*key))
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Elements
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind a player to an element.
    ///
    /// # Panics
    ///
    /// Panics if the player is already attached to an element.
    pub fn attach_element(&mut self, player: PlayerId, element: ElementId) {
        let key = self.key(player);
        if let Some(current) = self.players[key].element() {
            panic!("{player} is already attached to {current}");
        }
        self.bind_element(key, element);
        debug!(%player, %element, "element attached");
        if let Some(client) = self.client.as_deref_mut() {
            client.set_mutators_need_rebuild_property_trees();
        }
        self.set_needs_push_properties();
    }

    /// Unbind a player from its element.
    ///
    /// # Panics
    ///
    /// Panics if the player is not attached to an element.
    pub fn detach_element(&mut self, player: PlayerId) {
        let key = self.key(player);
        let Some(element) = self.players[key].element() else {
            panic!("{player} is not attached to an element");
        };
        self.unbind_element(key);
        debug!(%player, %element, "element detached");
        if let Some(client) = self.client.as_deref_mut() {
            client.set_mutators_need_rebuild_property_trees();
        }
        self.set_needs_push_properties();
    }

    fn bind_element(&mut self, key: PlayerKey, element: ElementId) {
        self.players[key].set_element(Some(element));
        self.elements
            .entry(element)
            .or_insert_with(|| ElementAnimations::new(element))
            .add_player(key);
        self.update_ticking(key);
        self.update_client_animation_state(element);
    }

    fn unbind_element(&mut self, key: PlayerKey) {
        let Some(element) = self.players[key].element() else {
            return;
        };
        self.players[key].set_element(None);
        self.ticking.shift_remove(&key);

        let Some(record) = self.elements.get_mut(&element) else {
            return;
        };
        record.remove_player(key);
        if record.is_empty() {
            record.update_client_animation_state(
                ElementLists::NONE,
                PropertyAnimationState::default(),
                PropertyAnimationState::default(),
                self.client.as_deref_mut(),
            );
            self.elements.shift_remove(&element);
        } else {
            self.update_client_animation_state(element);
        }
    }

    /// The element appeared in `list`
    pub fn register_element(&mut self, element: ElementId, list: ElementListType) {
        self.element_lists.entry(element).or_default().set(list, true);
        trace!(%element, ?list, "element registered");
        self.update_element_ticking(element);
        self.update_client_animation_state(element);
    }

    /// The element left `list`
    pub fn unregister_element(&mut self, element: ElementId, list: ElementListType) {
        if let Some(lists) = self.element_lists.get_mut(&element) {
            lists.set(list, false);
            if !lists.any() {
                self.element_lists.remove(&element);
            }
        }
        trace!(%element, ?list, "element unregistered");
        self.update_element_ticking(element);
        self.update_client_animation_state(element);
    }

    fn update_element_ticking(&mut self, element: ElementId) {
        let Some(record) = self.elements.get(&element) else {
            return;
        };
        let keys: PlayerKeys = record.players().iter().copied().collect();
        for key in keys {
            self.update_ticking(key);
        }
    }

    /// Lists the element is registered in
    pub fn element_lists(&self, element: ElementId) -> ElementLists {
        self.element_lists.get(&element).copied().unwrap_or_default()
    }

    pub fn element_animations(&self, element: ElementId) -> Option<&ElementAnimations> {
        self.elements.get(&element)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn players_on(&self, element: ElementId) -> impl Iterator<Item = &AnimationPlayer> + '_ {
        self.elements
            .get(&element)
            .into_iter()
            .flat_map(|record| record.players().iter())
            .filter_map(|key| self.players.get(*key))
    }

    /// Properties held by the other players on the player's element
    fn externally_blocked(&self, key: PlayerKey, element: ElementId) -> BlockedProperties {
        let Some(record) = self.elements.get(&element) else {
            return BlockedProperties::default();
        };
        record
            .players()
            .iter()
            .filter(|other| **other != key)
            .filter_map(|other| self.players.get(*other))
            .fold(BlockedProperties::default(), |blocked, player| {
                blocked.union(player.ticker().blocked_properties())
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bookkeeping
    // ─────────────────────────────────────────────────────────────────────────

    /// A player ticks while its element is in some list and it has
    /// animations left
    pub(crate) fn update_ticking(&mut self, key: PlayerKey) {
        let Some(player) = self.players.get(key) else {
            return;
        };
        let listed = player
            .element()
            .is_some_and(|element| self.element_lists(element).any());
        let ticking = listed && player.ticker().has_non_deleted_animation();
        if ticking {
            if self.ticking.insert(key) {
                trace!(player = %player.id(), "player ticking");
            }
        } else if self.ticking.shift_remove(&key) {
            trace!(player = %player.id(), "player idle");
        }
    }

    /// Recompute the element's animating properties and report changes
    pub(crate) fn update_client_animation_state(&mut self, element: ElementId) {
        let Some(record) = self.elements.get_mut(&element) else {
            return;
        };
        let lists = self.element_lists.get(&element).copied().unwrap_or_default();
        let mut pending = PropertyAnimationState::default();
        let mut active = PropertyAnimationState::default();
        for key in record.players() {
            let Some(player) = self.players.get(*key) else {
                continue;
            };
            let now = player.last_tick_time().unwrap_or(0.0);
            let (p, a) = player.ticker().property_animation_state(now);
            pending = pending.union(p);
            active = active.union(a);
        }
        record.update_client_animation_state(lists, pending, active, self.client.as_deref_mut());
    }

    /// Refresh derived state after the animations of a player changed
    fn animations_changed(&mut self, key: PlayerKey, needs_rebuild: bool) {
        self.update_ticking(key);
        if let Some(element) = self.players[key].element() {
            self.update_client_animation_state(element);
        }
        if let Some(client) = self.client.as_deref_mut() {
            client.set_mutators_need_commit();
            if needs_rebuild {
                client.set_mutators_need_rebuild_property_trees();
            }
        }
        self.set_needs_push_properties();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Animation Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an animation to a player; the impl instance controls the
    /// animations added to it directly
    pub fn add_animation(&mut self, player: PlayerId, mut animation: Animation) {
        let key = self.key(player);
        if self.thread_instance == ThreadInstance::Impl {
            animation.set_is_controlling_instance(true);
        }
        debug!(%player, %animation, "animation added");
        self.players[key].add_animation(animation);
        self.animations_changed(key, true);
    }

    /// Remove an animation outright; returns whether it existed
    pub fn remove_animation(&mut self, player: PlayerId, id: AnimationId) -> bool {
        let key = self.key(player);
        let Some(property) = self.players[key].ticker().animation_by_id(id).map(|a| a.property())
        else {
            return false;
        };
        self.players[key].remove_animation(id);
        if property == TargetProperty::ScrollOffset {
            if let Some(record) = self.players[key]
                .element()
                .and_then(|element| self.elements.get_mut(&element))
            {
                record.set_scroll_offset_animation_was_interrupted(true);
            }
        }
        debug!(%player, animation = %id, "animation removed");
        self.animations_changed(key, false);
        true
    }

    /// Pause a started animation at active time `offset`
    pub fn pause_animation(&mut self, player: PlayerId, id: AnimationId, offset: f64) -> bool {
        let key = self.key(player);
        let paused = self.players[key].pause_animation(id, offset);
        if paused {
            self.animations_changed(key, false);
        }
        paused
    }

    pub fn abort_animation(&mut self, player: PlayerId, id: AnimationId) -> bool {
        let key = self.key(player);
        let aborted = self.players[key].abort_animation(id);
        if aborted {
            self.animations_changed(key, false);
        }
        aborted
    }

    /// Abort every unfinished animation of `property` on the player.
    ///
    /// With `needs_completion` the instance running the animations jumps
    /// them to their end value instead of dropping them.
    pub fn abort_animations(
        &mut self,
        player: PlayerId,
        property: TargetProperty,
        needs_completion: bool,
    ) -> bool {
        let key = self.key(player);
        let aborted = self.players[key].abort_animations(property, needs_completion);
        if aborted {
            self.animations_changed(key, false);
        }
        aborted
    }

    pub fn reverse_animation(&mut self, player: PlayerId, id: AnimationId) -> bool {
        let key = self.key(player);
        let reversed = self.players[key].reverse_animation(id);
        if reversed {
            self.animations_changed(key, false);
        }
        reversed
    }

    pub fn set_transition(&mut self, player: PlayerId, transition: Transition) {
        let key = self.key(player);
        self.players[key].set_transition(transition);
        self.set_needs_push_properties();
    }

    /// Move `property` of the player's element from `from` to `to`, through
    /// the player's transition when it covers the property
    pub fn transition_to(
        &mut self,
        player: PlayerId,
        now: f64,
        property: TargetProperty,
        from: AnimatedValue,
        to: AnimatedValue,
    ) -> TransitionOutcome {
        let key = self.key(player);
        let element = self.players[key].element();
        let lists = element.map_or(ElementLists::NONE, |element| self.element_lists(element));
        let before = self.players[key].ticker().len();

        let Self {
            players,
            ids,
            client,
            ..
        } = self;
        let outcome = match element {
            Some(element) => {
                let mut target = ElementTarget::new(element, lists, client.as_deref_mut());
                players[key].transition_to(now, property, from, to, ids, &mut target)
            }
            None => players[key].transition_to(now, property, from, to, ids, &mut Unattached),
        };
        let removed = self.players[key].ticker().len() != before;
        if removed || matches!(outcome, TransitionOutcome::Started | TransitionOutcome::Reversed) {
            self.animations_changed(key, outcome == TransitionOutcome::Started);
        }
        outcome
    }

    pub fn set_animation_delegate(
        &mut self,
        player: PlayerId,
        delegate: Option<Box<dyn AnimationDelegate>>,
    ) {
        let key = self.key(player);
        self.players[key].set_delegate(delegate);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Per-Frame Drivers
    // ─────────────────────────────────────────────────────────────────────────

    fn ticking_snapshot(&self) -> PlayerKeys {
        self.ticking.iter().copied().collect()
    }

    /// Hand worklet players to the mutator and apply the local times it
    /// returns
    fn run_mutator(&mut self, now: f64) {
        let Some(mutator) = self.mutator.as_deref_mut() else {
            return;
        };
        let input = MutatorInputState {
            animators: self
                .players
                .values_mut()
                .filter_map(|player| {
                    let current_time = player.worklet_current_time(now)?;
                    player.worklet().map(|worklet| AnimatorState {
                        id: player.id(),
                        name: worklet.name.clone(),
                        current_time,
                    })
                })
                .collect(),
        };
        if input.is_empty() {
            return;
        }

        let output = mutator.mutate(&input);
        trace!(animators = output.animators.len(), "mutator ran");
        for animator in output.animators {
            if let Some(key) = self.player_keys.get(&animator.id) {
                self.players[*key].set_worklet_local_time(animator.local_time);
            }
        }
    }

    /// Start free animations and deliver values of every ticking player.
    ///
    /// Returns whether any player ticked.
    pub fn tick_animations(&mut self, now: f64) -> bool {
        let _span = trace_span!("tick_animations", now, instance = ?self.thread_instance).entered();
        self.run_mutator(now);

        let ticking = self.ticking_snapshot();
        let mut touched: SmallVec<[ElementId; 8]> = SmallVec::new();
        for &key in &ticking {
            let Some(element) = self.players.get(key).and_then(|p| p.element()) else {
                continue;
            };
            let lists = self.element_lists(element);
            let blocked = self.externally_blocked(key, element);

            let Self {
                players, client, ..
            } = self;
            let mut target = ElementTarget::new(element, lists, client.as_deref_mut());
            players[key].tick(now, lists, &blocked, &mut target);
            if !touched.contains(&element) {
                touched.push(element);
            }
        }
        for element in touched {
            self.update_client_animation_state(element);
        }
        !ticking.is_empty()
    }

    /// Advance the lifecycle of every ticking player.
    ///
    /// Events for the other instance are appended to `events`; events of
    /// impl-only animations are delivered here. Returns whether any player
    /// was updated.
    pub fn update_animation_state(&mut self, start_ready: bool, events: &mut AnimationEvents) -> bool {
        let _span =
            trace_span!("update_animation_state", start_ready, instance = ?self.thread_instance)
                .entered();

        let ticking = self.ticking_snapshot();
        for &key in &ticking {
            let Some(element) = self.players.get(key).and_then(|p| p.element()) else {
                continue;
            };
            let lists = self.element_lists(element);
            let blocked = self.externally_blocked(key, element);
            let local = self.players[key].update_state(lists, start_ready, &blocked, events);
            for event in local.iter() {
                self.dispatch_local_event(key, event);
            }
            self.update_ticking(key);
            self.update_client_animation_state(element);
        }
        !ticking.is_empty()
    }

    fn dispatch_local_event(&mut self, key: PlayerKey, event: &AnimationEvent) {
        trace!(%event, "local event");
        self.players[key].notify_delegate(event);
        if event.kind == AnimationEventType::Finished && self.is_scroll_offset_player(key) {
            if let Some(client) = self.client.as_deref_mut() {
                client.scroll_offset_animation_finished();
            }
        }
    }

    /// The pending element list became active
    pub fn activate_animations(&mut self) -> bool {
        let _span = trace_span!("activate_animations", instance = ?self.thread_instance).entered();

        let ticking = self.ticking_snapshot();
        for &key in &ticking {
            self.players[key].activate_animations();
            self.update_ticking(key);
            if let Some(element) = self.players[key].element() {
                self.update_client_animation_state(element);
            }
        }
        for record in self.elements.values_mut() {
            if record.scroll_offset_animation_was_interrupted() {
                record.set_scroll_offset_animation_was_interrupted(false);
            }
        }
        !ticking.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Main -> Impl Push
    // ─────────────────────────────────────────────────────────────────────────

    /// Mirror this main host onto its impl instance.
    ///
    /// Does nothing unless something changed since the last push.
    pub fn push_properties_to(&mut self, other: &mut AnimationHost) {
        assert_eq!(self.thread_instance, ThreadInstance::Main, "only the main instance pushes");
        assert_eq!(other.thread_instance, ThreadInstance::Impl, "pushes go to an impl instance");
        if !self.needs_push_properties {
            return;
        }
        let _span = trace_span!("push_properties_to").entered();

        self.push_timelines_to(other);
        self.remove_timelines_from(other);
        self.push_players_to(other);
        self.push_elements_to(other);
        self.push_scroll_takeovers_to(other);
        other.main_thread_animations_count = self.main_thread_animations_count;

        self.needs_push_properties = false;
        debug!(
            timelines = other.timelines.len(),
            players = other.players.len(),
            "properties pushed"
        );
    }

    fn push_timelines_to(&mut self, other: &mut AnimationHost) {
        for timeline in self.timelines.values_mut() {
            if !other.timelines.contains_key(&timeline.id()) {
                other.add_timeline(timeline.create_impl_instance());
            }
            timeline.clear_needs_push_properties();
        }
    }

    fn remove_timelines_from(&self, other: &mut AnimationHost) {
        let stale: SmallVec<[TimelineId; 4]> = other
            .timelines
            .values()
            .filter(|t| !t.is_impl_only() && !self.timelines.contains_key(&t.id()))
            .map(|t| t.id())
            .collect();
        for id in stale {
            other.remove_timeline(id);
        }
    }

    fn push_players_to(&mut self, other: &mut AnimationHost) {
        // Players detached on main
        let stale: SmallVec<[PlayerId; 4]> = other
            .timelines
            .values()
            .filter(|t| !t.is_impl_only())
            .flat_map(|t| t.players().iter().copied())
            .filter(|id| !self.player_keys.contains_key(id))
            .collect();
        for id in stale {
            other.detach_player(id);
        }

        for timeline in self.timelines.values() {
            for &id in timeline.players() {
                let Some(&key) = self.player_keys.get(&id) else {
                    continue;
                };
                let main = &mut self.players[key];
                let impl_key = match other.player_keys.get(&id) {
                    Some(&impl_key) => impl_key,
                    None => {
                        let copy = match main.worklet() {
                            Some(worklet) => AnimationPlayer::new_worklet(id, worklet.name.clone()),
                            None => AnimationPlayer::new(id),
                        };
                        other.add_player(timeline.id(), copy)
                    }
                };
                if !main.needs_push_properties() {
                    continue;
                }

                // Reconcile the element binding first
                let element = main.element();
                if other.players[impl_key].element() != element {
                    other.unbind_element(impl_key);
                    if let Some(element) = element {
                        other.bind_element(impl_key, element);
                    }
                }

                let initial_scroll_offset = match element {
                    Some(element) if main.ticker().needs_scroll_initial_value() => {
                        let client = if other.element_lists(element).active {
                            other.client.as_deref()
                        } else {
                            self.client.as_deref()
                        };
                        client.map_or(ScrollOffset::ZERO, |c| c.scroll_offset_for_animation(element))
                    }
                    _ => ScrollOffset::ZERO,
                };

                let lists = element.map_or(ElementLists::NONE, |element| other.element_lists(element));
                let AnimationHost {
                    players: impl_players,
                    client: impl_client,
                    ..
                } = &mut *other;
                let counterpart = &mut impl_players[impl_key];
                match element {
                    Some(element) => {
                        let mut target =
                            ElementTarget::new(element, lists, impl_client.as_deref_mut());
                        main.push_properties_to(counterpart, initial_scroll_offset, &mut target);
                    }
                    None => main.push_properties_to(counterpart, initial_scroll_offset, &mut Unattached),
                }

                other.update_ticking(impl_key);
                if let Some(element) = element {
                    other.update_client_animation_state(element);
                }
            }
        }

        // Main-side deletions may stop main players from ticking
        let keys: PlayerKeys = self.players.keys().collect();
        for key in keys {
            self.update_ticking(key);
        }
    }

    fn push_elements_to(&mut self, other: &mut AnimationHost) {
        for (element, record) in self.elements.iter_mut() {
            if let Some(counterpart) = other.elements.get_mut(element) {
                record.push_properties_to(counterpart);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Routing
    // ─────────────────────────────────────────────────────────────────────────

    /// Route events produced by the other instance to the players owning
    /// their animations.
    ///
    /// Takeover events go to every player on the element; the others stop
    /// at the player that owns the animation.
    pub fn set_animation_events(&mut self, events: AnimationEvents) {
        for event in events {
            let Some(record) = self.elements.get(&event.element) else {
                trace!(%event, "event for unknown element dropped");
                continue;
            };
            let keys: PlayerKeys = record.players().iter().copied().collect();
            for key in keys {
                let matched = self.players[key].dispatch_event(&event);
                if matched {
                    self.update_ticking(key);
                    if event.kind != AnimationEventType::Takeover {
                        break;
                    }
                }
            }
            self.update_client_animation_state(event.element);
            self.set_needs_push_properties();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// An unfinished animation of `property` is in effect on the element
    pub fn is_animating_property(
        &self,
        element: ElementId,
        property: TargetProperty,
        list: ElementListType,
    ) -> bool {
        self.players_on(element).any(|player| {
            let now = player.last_tick_time().unwrap_or(0.0);
            player
                .ticker()
                .is_currently_animating_property(property, list, now)
        })
    }

    /// An unfinished animation of `property` exists on the element
    pub fn has_potentially_running_animation(
        &self,
        element: ElementId,
        property: TargetProperty,
        list: ElementListType,
    ) -> bool {
        self.players_on(element).any(|player| {
            player
                .ticker()
                .is_potentially_animating_property(property, list)
        })
    }

    pub fn has_any_animation_targeting(&self, element: ElementId, property: TargetProperty) -> bool {
        self.players_on(element).any(|player| {
            player
                .ticker()
                .animations()
                .iter()
                .any(|a| a.property() == property)
        })
    }

    /// An impl-only animation of `property` runs on the active element
    pub fn is_animating_on_impl_only(&self, element: ElementId, property: TargetProperty) -> bool {
        self.players_on(element).any(|player| {
            player.ticker().animations().iter().any(|a| {
                a.is_impl_only()
                    && !a.is_finished()
                    && a.property() == property
                    && a.reach().affects_active()
            })
        })
    }

    pub fn has_only_translation_transforms(&self, element: ElementId, list: ElementListType) -> bool {
        self.players_on(element)
            .all(|player| player.ticker().has_only_translation_transforms(list))
    }

    pub fn animations_preserve_axis_alignment(&self, element: ElementId) -> bool {
        self.players_on(element)
            .all(|player| player.ticker().animations_preserve_axis_alignment())
    }

    /// Largest scale the element's transform animations reach, 0 without any
    pub fn maximum_target_scale(&self, element: ElementId, list: ElementListType) -> f32 {
        self.players_on(element)
            .map(|player| player.ticker().maximum_target_scale(list))
            .fold(0.0, f32::max)
    }

    /// Largest starting scale of the element's transform animations, 0
    /// without any
    pub fn animation_start_scale(&self, element: ElementId, list: ElementListType) -> f32 {
        self.players_on(element)
            .map(|player| player.ticker().animation_start_scale(list))
            .fold(0.0, f32::max)
    }

    pub fn scroll_offset_animation_was_interrupted(&self, element: ElementId) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|record| record.scroll_offset_animation_was_interrupted())
    }

    pub fn has_any_animation(&self, element: ElementId) -> bool {
        self.players_on(element)
            .any(|player| !player.ticker().is_empty())
    }

    pub fn needs_tick_animations(&self) -> bool {
        !self.ticking.is_empty()
    }

    pub fn ticking_player_count(&self) -> usize {
        self.ticking.len()
    }

    pub fn is_ticking(&self, player: PlayerId) -> bool {
        self.player_keys
            .get(&player)
            .is_some_and(|key| self.ticking.contains(key))
    }

    /// Number of animations the main instance runs, as reported by the
    /// embedder; pushed to the impl instance
    pub fn main_thread_animations_count(&self) -> usize {
        self.main_thread_animations_count
    }

    pub fn set_main_thread_animations_count(&mut self, count: usize) {
        if self.main_thread_animations_count != count {
            self.main_thread_animations_count = count;
            self.set_needs_push_properties();
        }
    }

    pub(crate) fn player_key(&self, player: PlayerId) -> Option<PlayerKey> {
        self.player_keys.get(&player).copied()
    }

    pub(crate) fn player_by_key(&self, key: PlayerKey) -> &AnimationPlayer {
        &self.players[key]
    }

    pub(crate) fn player_by_key_mut(&mut self, key: PlayerKey) -> &mut AnimationPlayer {
        &mut self.players[key]
    }

    pub(crate) fn rebind_element(&mut self, key: PlayerKey, element: ElementId) {
        if self.players[key].element() == Some(element) {
            return;
        }
        self.unbind_element(key);
        self.bind_element(key, element);
    }
}

impl fmt::Debug for AnimationHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHost")
            .field("thread_instance", &self.thread_instance)
            .field("timelines", &self.timelines.len())
            .field("players", &self.players.len())
            .field("elements", &self.elements.len())
            .field("ticking", &self.ticking.len())
            .field("needs_push_properties", &self.needs_push_properties)
            .finish_non_exhaustive()
    }
}
