//! Per-element animation state
//!
//! Several players can animate the same element. [`ElementAnimations`] is
//! the record they share: which players are attached, the animating
//! properties last reported to the client, and the scroll interruption flag
//! that is pushed to the impl instance.

use motive_core::{ElementId, TargetProperties, TargetProperty};
use smallvec::SmallVec;

use crate::client::MutatorHostClient;
use crate::host::PlayerKey;
use crate::target::ElementListType;

// ─────────────────────────────────────────────────────────────────────────────
// Element Lists
// ─────────────────────────────────────────────────────────────────────────────

/// Presence of an element in the active and pending element lists
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ElementLists {
    pub active: bool,
    pub pending: bool,
}

impl ElementLists {
    pub const NONE: ElementLists = ElementLists {
        active: false,
        pending: false,
    };

    pub const BOTH: ElementLists = ElementLists {
        active: true,
        pending: true,
    };

    /// Registered in at least one list
    pub fn any(self) -> bool {
        self.active || self.pending
    }

    pub fn contains(self, list: ElementListType) -> bool {
        match list {
            ElementListType::Active => self.active,
            ElementListType::Pending => self.pending,
        }
    }

    pub fn set(&mut self, list: ElementListType, present: bool) {
        match list {
            ElementListType::Active => self.active = present,
            ElementListType::Pending => self.pending = present,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Animation State
// ─────────────────────────────────────────────────────────────────────────────

/// Animating properties of an element in one list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyAnimationState {
    /// Properties with an unfinished animation
    pub potentially_animating: TargetProperties,
    /// Properties with an unfinished animation that is in effect
    pub currently_running: TargetProperties,
}

impl PropertyAnimationState {
    pub fn is_empty(&self) -> bool {
        self.potentially_animating.is_empty() && self.currently_running.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Record an unfinished animation of `property`
    pub fn insert(&mut self, property: TargetProperty, in_effect: bool) {
        self.potentially_animating.insert(property);
        if in_effect {
            self.currently_running.insert(property);
        }
    }

    pub fn union(self, other: PropertyAnimationState) -> PropertyAnimationState {
        PropertyAnimationState {
            potentially_animating: self.potentially_animating.union(other.potentially_animating),
            currently_running: self.currently_running.union(other.currently_running),
        }
    }

    /// Bits that differ between the two states
    pub fn symmetric_difference(self, other: PropertyAnimationState) -> PropertyAnimationState {
        PropertyAnimationState {
            potentially_animating: self
                .potentially_animating
                .symmetric_difference(other.potentially_animating),
            currently_running: self
                .currently_running
                .symmetric_difference(other.currently_running),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Element Animations
// ─────────────────────────────────────────────────────────────────────────────

/// State shared by all players attached to one element
#[derive(Debug)]
pub struct ElementAnimations {
    element: ElementId,
    players: SmallVec<[PlayerKey; 2]>,
    pending_state: PropertyAnimationState,
    active_state: PropertyAnimationState,
    scroll_offset_animation_was_interrupted: bool,
    needs_push_properties: bool,
}

impl ElementAnimations {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            players: SmallVec::new(),
            pending_state: PropertyAnimationState::default(),
            active_state: PropertyAnimationState::default(),
            scroll_offset_animation_was_interrupted: false,
            needs_push_properties: false,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub(crate) fn players(&self) -> &[PlayerKey] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub(crate) fn add_player(&mut self, player: PlayerKey) {
        debug_assert!(!self.players.contains(&player));
        self.players.push(player);
    }

    pub(crate) fn remove_player(&mut self, player: PlayerKey) {
        self.players.retain(|p| *p != player);
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Animating properties last reported for the pending list
    pub fn pending_state(&self) -> PropertyAnimationState {
        self.pending_state
    }

    /// Animating properties last reported for the active list
    pub fn active_state(&self) -> PropertyAnimationState {
        self.active_state
    }

    pub fn scroll_offset_animation_was_interrupted(&self) -> bool {
        self.scroll_offset_animation_was_interrupted
    }

    pub(crate) fn set_scroll_offset_animation_was_interrupted(&mut self, interrupted: bool) {
        self.scroll_offset_animation_was_interrupted = interrupted;
        self.needs_push_properties = true;
    }

    pub fn needs_push_properties(&self) -> bool {
        self.needs_push_properties
    }

    pub(crate) fn set_needs_push_properties(&mut self) {
        self.needs_push_properties = true;
    }

    /// Report animating-property changes to the client.
    ///
    /// Lists the element is not registered in are reported as not animating.
    pub(crate) fn update_client_animation_state(
        &mut self,
        lists: ElementLists,
        pending: PropertyAnimationState,
        active: PropertyAnimationState,
        mut client: Option<&mut (dyn MutatorHostClient + 'static)>,
    ) {
        let pending = if lists.pending { pending } else { Default::default() };
        let active = if lists.active { active } else { Default::default() };

        let pending_mask = self.pending_state.symmetric_difference(pending);
        let active_mask = self.active_state.symmetric_difference(active);
        self.pending_state = pending;
        self.active_state = active;

        let Some(client) = client.as_deref_mut() else {
            return;
        };
        if !pending_mask.is_empty() {
            client.element_is_animating_changed(
                self.element,
                ElementListType::Pending,
                &pending_mask,
                &pending,
            );
        }
        if !active_mask.is_empty() {
            client.element_is_animating_changed(
                self.element,
                ElementListType::Active,
                &active_mask,
                &active,
            );
        }
    }

    /// Copy the shared flags onto the impl record; `false` when clean
    pub(crate) fn push_properties_to(&mut self, other: &mut ElementAnimations) -> bool {
        if !self.needs_push_properties {
            return false;
        }
        self.needs_push_properties = false;
        other.scroll_offset_animation_was_interrupted = self.scroll_offset_animation_was_interrupted;
        self.scroll_offset_animation_was_interrupted = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        changes: Arc<Mutex<Vec<(ElementListType, PropertyAnimationState, PropertyAnimationState)>>>,
    }

    impl MutatorHostClient for Recorder {
        fn element_is_animating_changed(
            &mut self,
            _element: ElementId,
            list: ElementListType,
            mask: &PropertyAnimationState,
            state: &PropertyAnimationState,
        ) {
            self.changes.lock().unwrap().push((list, *mask, *state));
        }
    }

    fn opacity_running() -> PropertyAnimationState {
        let mut state = PropertyAnimationState::default();
        state.insert(TargetProperty::Opacity, true);
        state
    }

    #[test]
    fn test_element_lists() {
        let mut lists = ElementLists::NONE;
        assert!(!lists.any());
        lists.set(ElementListType::Pending, true);
        assert!(lists.any());
        assert!(lists.contains(ElementListType::Pending));
        assert!(!lists.contains(ElementListType::Active));
    }

    #[test]
    fn test_state_set_operations() {
        let mut a = PropertyAnimationState::default();
        a.insert(TargetProperty::Transform, false);
        let b = opacity_running();

        let both = a.union(b);
        assert!(both.potentially_animating.contains(TargetProperty::Transform));
        assert!(both.currently_running.contains(TargetProperty::Opacity));
        assert!(!both.currently_running.contains(TargetProperty::Transform));

        assert!(both.symmetric_difference(both).is_empty());
        let diff = both.symmetric_difference(a);
        assert!(diff.potentially_animating.contains(TargetProperty::Opacity));
        assert!(!diff.potentially_animating.contains(TargetProperty::Transform));
    }

    #[test]
    fn test_client_sees_only_changes() {
        let recorder = Recorder::default();
        let changes = recorder.changes.clone();
        let mut client: Box<dyn MutatorHostClient> = Box::new(recorder);
        let mut element = ElementAnimations::new(ElementId(3));

        element.update_client_animation_state(
            ElementLists::BOTH,
            opacity_running(),
            opacity_running(),
            Some(client.as_mut()),
        );
        assert_eq!(changes.lock().unwrap().len(), 2);

        // Same state again: nothing to report
        element.update_client_animation_state(
            ElementLists::BOTH,
            opacity_running(),
            opacity_running(),
            Some(client.as_mut()),
        );
        assert_eq!(changes.lock().unwrap().len(), 2);

        // Leaving the pending list clears the pending state
        element.update_client_animation_state(
            ElementLists {
                active: true,
                pending: false,
            },
            opacity_running(),
            opacity_running(),
            Some(client.as_mut()),
        );
        let changes = changes.lock().unwrap();
        assert_eq!(changes.len(), 3);
        let (list, mask, state) = changes[2];
        assert_eq!(list, ElementListType::Pending);
        assert!(mask.currently_running.contains(TargetProperty::Opacity));
        assert!(state.is_empty());
        assert!(element.pending_state().is_empty());
    }

    #[test]
    fn test_push_copies_interruption_once() {
        let mut main = ElementAnimations::new(ElementId(1));
        let mut other = ElementAnimations::new(ElementId(1));
        assert!(!main.push_properties_to(&mut other));

        main.set_scroll_offset_animation_was_interrupted(true);
        assert!(main.push_properties_to(&mut other));
        assert!(other.scroll_offset_animation_was_interrupted());
        assert!(!main.scroll_offset_animation_was_interrupted());
        assert!(!main.push_properties_to(&mut other));
    }
}
