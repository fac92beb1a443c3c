//! Host client interface
//!
//! The embedder's side of the host: it is told when the animation set
//! changed in a way that needs a commit or a property tree rebuild, and it
//! receives every value an animation writes onto an element.

use motive_core::{ElementId, ScrollOffset, TargetProperty};

use crate::curve::AnimatedValue;
use crate::element::PropertyAnimationState;
use crate::target::ElementListType;

/// Callbacks from an [`crate::AnimationHost`] to its embedder
#[allow(unused_variables)]
pub trait MutatorHostClient: Send {
    /// The animation set changed; the main instance must push at the next commit
    fn set_mutators_need_commit(&mut self) {}

    /// Element bindings changed; derived property trees must be rebuilt
    fn set_mutators_need_rebuild_property_trees(&mut self) {}

    /// An animation wrote `value` onto `element` in `list`
    fn set_element_property_mutated(
        &mut self,
        element: ElementId,
        list: ElementListType,
        property: TargetProperty,
        value: &AnimatedValue,
    ) {
    }

    /// The animating properties of `element` in `list` changed; `mask`
    /// marks the bits that flipped and `state` holds the new values.
    fn element_is_animating_changed(
        &mut self,
        element: ElementId,
        list: ElementListType,
        mask: &PropertyAnimationState,
        state: &PropertyAnimationState,
    ) {
    }

    /// Current scroll position of `element`, used as the start of scroll
    /// offset animations that do not carry one
    fn scroll_offset_for_animation(&self, element: ElementId) -> ScrollOffset {
        ScrollOffset::ZERO
    }

    /// The impl-only scroll offset animation finished
    fn scroll_offset_animation_finished(&mut self) {}
}
