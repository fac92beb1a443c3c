//! Animation targets
//!
//! An [`AnimationTarget`] receives interpolated values. The host binds each
//! player to an [`ElementTarget`], which forwards values to the host client
//! for every element list the animation reaches.

use motive_core::{
    Color, ElementId, FilterOperations, ScrollOffset, Size, TargetProperty, TransformOperations,
};

use crate::animation::Animation;
use crate::client::MutatorHostClient;
use crate::curve::AnimatedValue;
use crate::element::ElementLists;

/// The two element lists an element can be registered in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementListType {
    /// Elements currently drawn
    Active,
    /// Elements of the next frame, not yet activated
    Pending,
}

/// Consumer of animated values.
///
/// `animation` is the animation that produced the value, or `None` when a
/// value is applied without an animation (a transition to an untransitioned
/// property).
#[allow(unused_variables)]
pub trait AnimationTarget {
    fn notify_client_float_animated(
        &mut self,
        value: f32,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
    }

    fn notify_client_color_animated(
        &mut self,
        value: Color,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
    }

    fn notify_client_transform_animated(
        &mut self,
        value: &TransformOperations,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
    }

    fn notify_client_filter_animated(
        &mut self,
        value: &FilterOperations,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
    }

    fn notify_client_scroll_offset_animated(
        &mut self,
        value: ScrollOffset,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
    }

    fn notify_client_size_animated(
        &mut self,
        value: Size,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
    }

    fn notify_client_boolean_animated(
        &mut self,
        value: bool,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
    }
}

/// Hand a value to the matching typed callback
pub fn deliver(
    target: &mut dyn AnimationTarget,
    value: &AnimatedValue,
    property: TargetProperty,
    animation: Option<&Animation>,
) {
    match value {
        AnimatedValue::Float(v) => target.notify_client_float_animated(*v, property, animation),
        AnimatedValue::Color(v) => target.notify_client_color_animated(*v, property, animation),
        AnimatedValue::Transform(v) => {
            target.notify_client_transform_animated(v, property, animation)
        }
        AnimatedValue::Filter(v) => target.notify_client_filter_animated(v, property, animation),
        AnimatedValue::ScrollOffset(v) => {
            target.notify_client_scroll_offset_animated(*v, property, animation)
        }
        AnimatedValue::Size(v) => target.notify_client_size_animated(*v, property, animation),
        AnimatedValue::Boolean(v) => {
            target.notify_client_boolean_animated(*v, property, animation)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Element Target
// ─────────────────────────────────────────────────────────────────────────────

/// Target that writes values onto an element through the host client
pub struct ElementTarget<'a> {
    element: ElementId,
    lists: ElementLists,
    client: Option<&'a mut (dyn MutatorHostClient + 'static)>,
}

impl<'a> ElementTarget<'a> {
    pub fn new(
        element: ElementId,
        lists: ElementLists,
        client: Option<&'a mut (dyn MutatorHostClient + 'static)>,
    ) -> Self {
        Self {
            element,
            lists,
            client,
        }
    }

    fn mutate(
        &mut self,
        property: TargetProperty,
        value: AnimatedValue,
        animation: Option<&Animation>,
    ) {
        let Some(client) = self.client.as_deref_mut() else {
            return;
        };
        for list in [ElementListType::Active, ElementListType::Pending] {
            let reached = animation.map_or(true, |a| a.reach().affects(list));
            if reached && self.lists.contains(list) {
                client.set_element_property_mutated(self.element, list, property, &value);
            }
        }
    }
}

impl AnimationTarget for ElementTarget<'_> {
    fn notify_client_float_animated(
        &mut self,
        value: f32,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
        self.mutate(property, AnimatedValue::Float(value), animation);
    }

    fn notify_client_color_animated(
        &mut self,
        value: Color,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
        self.mutate(property, AnimatedValue::Color(value), animation);
    }

    fn notify_client_transform_animated(
        &mut self,
        value: &TransformOperations,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
        self.mutate(property, AnimatedValue::Transform(value.clone()), animation);
    }

    fn notify_client_filter_animated(
        &mut self,
        value: &FilterOperations,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
        self.mutate(property, AnimatedValue::Filter(value.clone()), animation);
    }

    fn notify_client_scroll_offset_animated(
        &mut self,
        value: ScrollOffset,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
        self.mutate(property, AnimatedValue::ScrollOffset(value), animation);
    }

    fn notify_client_size_animated(
        &mut self,
        value: Size,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
        self.mutate(property, AnimatedValue::Size(value), animation);
    }

    fn notify_client_boolean_animated(
        &mut self,
        value: bool,
        property: TargetProperty,
        animation: Option<&Animation>,
    ) {
        self.mutate(property, AnimatedValue::Boolean(value), animation);
    }
}
