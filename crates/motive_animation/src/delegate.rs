//! Lifecycle delegate interface

use motive_core::{GroupId, TargetProperty};

use crate::curve::AnimationCurve;

/// Receives lifecycle notifications for the animations of one player
#[allow(unused_variables)]
pub trait AnimationDelegate: Send {
    fn notify_animation_started(&mut self, time: f64, property: TargetProperty, group: GroupId) {}

    fn notify_animation_finished(&mut self, time: f64, property: TargetProperty, group: GroupId) {}

    fn notify_animation_aborted(&mut self, time: f64, property: TargetProperty, group: GroupId) {}

    /// The impl instance gave up an animation the main instance must
    /// continue; `curve` is an independent copy of the running curve.
    fn notify_animation_takeover(
        &mut self,
        time: f64,
        property: TargetProperty,
        animation_start_time: f64,
        curve: AnimationCurve,
    ) {
    }
}
