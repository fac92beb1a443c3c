//! Lifecycle events
//!
//! Events are produced by the impl instance while it updates animation
//! state and are handed back to the main instance with
//! [`crate::AnimationHost::set_animation_events`].

use std::fmt;

use motive_core::{AnimationId, ElementId, GroupId, TargetProperty};
use smallvec::SmallVec;

use crate::animation::Animation;
use crate::curve::AnimationCurve;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationEventType {
    Started,
    Finished,
    Aborted,
    /// The impl instance hands a running animation back to the main instance
    Takeover,
}

/// A lifecycle event for one animation
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationEvent {
    pub kind: AnimationEventType,
    pub element: ElementId,
    pub animation: AnimationId,
    pub group: GroupId,
    pub property: TargetProperty,
    pub monotonic_time: f64,
    pub is_impl_only: bool,
    /// Start time of the animation (takeover events)
    pub animation_start_time: Option<f64>,
    /// Copy of the running curve (takeover events)
    pub curve: Option<AnimationCurve>,
}

impl AnimationEvent {
    pub fn new(
        kind: AnimationEventType,
        element: ElementId,
        animation: &Animation,
        monotonic_time: f64,
    ) -> Self {
        Self {
            kind,
            element,
            animation: animation.id(),
            group: animation.group(),
            property: animation.property(),
            monotonic_time,
            is_impl_only: animation.is_impl_only(),
            animation_start_time: None,
            curve: None,
        }
    }
}

impl fmt::Display for AnimationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} {} on {} at {:.3}s",
            self.kind, self.animation, self.property, self.element, self.monotonic_time
        )
    }
}

/// An ordered batch of events
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationEvents {
    events: SmallVec<[AnimationEvent; 4]>,
}

impl AnimationEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: AnimationEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationEvent> {
        self.events.iter()
    }

    /// Events of one kind, in order
    pub fn of_kind(&self, kind: AnimationEventType) -> impl Iterator<Item = &AnimationEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

impl IntoIterator for AnimationEvents {
    type Item = AnimationEvent;
    type IntoIter = smallvec::IntoIter<[AnimationEvent; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl Extend<AnimationEvent> for AnimationEvents {
    fn extend<I: IntoIterator<Item = AnimationEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}
