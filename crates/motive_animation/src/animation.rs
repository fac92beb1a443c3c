//! Animations
//!
//! An [`Animation`] drives one target property with one curve. It owns the
//! timing model (start time, pauses, offset, iterations, direction, rate)
//! that maps monotonic time to curve time, and the run state that the ticker
//! moves through the lifecycle:
//!
//! ```text
//! WaitingForTargetAvailability -> Starting -> Running -> Finished
//!                               \-> Aborted / AbortedButNeedsCompletion
//! Running <-> Paused
//! Starting | Running | Paused | Finished | Aborted* -> WaitingForDeletion
//! ```

use std::fmt;

use motive_core::{AnimationId, GroupId, TargetProperty};
use tracing::trace;

use crate::curve::AnimationCurve;
use crate::target::ElementListType;

/// Iteration count of an animation that repeats forever
pub const INFINITE_ITERATIONS: f64 = -1.0;

// ─────────────────────────────────────────────────────────────────────────────
// Run State
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle stage of an animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Queued behind another animation of the same property
    WaitingForTargetAvailability,
    /// Started this frame, not yet promoted
    Starting,
    Running,
    Paused,
    Finished,
    Aborted,
    /// Aborted, but the instance running it must complete it (deliver the
    /// end value or hand the curve over) rather than drop it
    AbortedButNeedsCompletion,
    /// Done on this instance; purged once the other instance has seen it
    WaitingForDeletion,
}

impl RunState {
    /// Whether `next` is a legal successor (self transitions are no-ops)
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        if self == next {
            return true;
        }
        match self {
            WaitingForTargetAvailability => matches!(
                next,
                Starting | Running | Paused | Aborted | AbortedButNeedsCompletion
            ),
            Starting => matches!(
                next,
                Running | Paused | Aborted | AbortedButNeedsCompletion | WaitingForDeletion
            ),
            Running => matches!(
                next,
                Paused | Finished | Aborted | AbortedButNeedsCompletion | WaitingForDeletion
            ),
            Paused => matches!(
                next,
                Running | Aborted | AbortedButNeedsCompletion | WaitingForDeletion
            ),
            Finished | Aborted | AbortedButNeedsCompletion => next == WaitingForDeletion,
            WaitingForDeletion => false,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(
            self,
            RunState::Finished
                | RunState::Aborted
                | RunState::AbortedButNeedsCompletion
                | RunState::WaitingForDeletion
        )
    }

    /// States in which the animation produces values and occupies its property
    pub fn is_active(self) -> bool {
        matches!(
            self,
            RunState::Starting | RunState::Running | RunState::Paused
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            RunState::WaitingForTargetAvailability => "waiting_for_target_availability",
            RunState::Starting => "starting",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Finished => "finished",
            RunState::Aborted => "aborted",
            RunState::AbortedButNeedsCompletion => "aborted_but_needs_completion",
            RunState::WaitingForDeletion => "waiting_for_deletion",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timing Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Playback direction of successive iterations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    /// Even iterations forward, odd iterations backward
    AlternateNormal,
    /// Even iterations backward, odd iterations forward
    AlternateReverse,
}

impl Direction {
    /// The direction that plays the same iterations backwards
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Normal => Direction::Reverse,
            Direction::Reverse => Direction::Normal,
            Direction::AlternateNormal => Direction::AlternateReverse,
            Direction::AlternateReverse => Direction::AlternateNormal,
        }
    }
}

/// Whether the animation applies outside its active interval
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    None,
    Forwards,
    Backwards,
    #[default]
    Both,
}

/// Which element lists an animation writes to.
///
/// The impl instance receives new animations for the pending list only;
/// activation extends them to the active list. An animation removed on the
/// main instance first stops reaching the pending list, then (after the next
/// activation) the active list, and is then finished off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementReach {
    #[default]
    Both,
    PendingOnly,
    ActiveOnly,
    Detached,
}

impl ElementReach {
    pub fn affects_active(self) -> bool {
        matches!(self, ElementReach::Both | ElementReach::ActiveOnly)
    }

    pub fn affects_pending(self) -> bool {
        matches!(self, ElementReach::Both | ElementReach::PendingOnly)
    }

    pub fn affects(self, list: ElementListType) -> bool {
        match list {
            ElementListType::Active => self.affects_active(),
            ElementListType::Pending => self.affects_pending(),
        }
    }

    /// The pending list became active: active reach follows pending reach
    pub fn activate(self) -> ElementReach {
        if self.affects_pending() {
            ElementReach::Both
        } else {
            ElementReach::Detached
        }
    }

    pub fn remove_from_pending(self) -> ElementReach {
        if self.affects_active() {
            ElementReach::ActiveOnly
        } else {
            ElementReach::Detached
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animation
// ─────────────────────────────────────────────────────────────────────────────

/// One animation of one property
#[derive(Clone, Debug)]
pub struct Animation {
    id: AnimationId,
    group: GroupId,
    property: TargetProperty,
    curve: AnimationCurve,
    run_state: RunState,
    iterations: f64,
    iteration_start: f64,
    direction: Direction,
    playback_rate: f64,
    fill_mode: FillMode,
    start_time: Option<f64>,
    time_offset: f64,
    pause_time: f64,
    total_paused_duration: f64,
    needs_synchronized_start_time: bool,
    received_finished_event: bool,
    is_controlling_instance: bool,
    is_impl_only: bool,
    reach: ElementReach,
}

impl Animation {
    /// # Panics
    ///
    /// Panics if the curve does not produce the property's value kind.
    pub fn new(
        curve: impl Into<AnimationCurve>,
        id: AnimationId,
        group: GroupId,
        property: TargetProperty,
    ) -> Self {
        let curve = curve.into();
        assert_eq!(
            curve.value_kind(),
            property.value_kind(),
            "curve cannot animate {property}"
        );
        Self {
            id,
            group,
            property,
            curve,
            run_state: RunState::WaitingForTargetAvailability,
            iterations: 1.0,
            iteration_start: 0.0,
            direction: Direction::Normal,
            playback_rate: 1.0,
            fill_mode: FillMode::Both,
            start_time: None,
            time_offset: 0.0,
            pause_time: 0.0,
            total_paused_duration: 0.0,
            needs_synchronized_start_time: false,
            received_finished_event: false,
            is_controlling_instance: false,
            is_impl_only: false,
            reach: ElementReach::Both,
        }
    }

    /// Builder: iteration count, negative or infinite for endless
    pub fn with_iterations(mut self, iterations: f64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder: start partway into the iterations (fraction of one iteration)
    pub fn with_iteration_start(mut self, iteration_start: f64) -> Self {
        self.iteration_start = iteration_start;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_playback_rate(mut self, playback_rate: f64) -> Self {
        self.playback_rate = playback_rate;
        self
    }

    pub fn with_fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// Builder: shift curve time by `time_offset` seconds
    pub fn with_time_offset(mut self, time_offset: f64) -> Self {
        self.time_offset = time_offset;
        self
    }

    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Builder: mark as created on the impl instance with no main counterpart
    pub fn with_impl_only(mut self, is_impl_only: bool) -> Self {
        self.is_impl_only = is_impl_only;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn property(&self) -> TargetProperty {
        self.property
    }

    pub fn curve(&self) -> &AnimationCurve {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut AnimationCurve {
        &mut self.curve
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn iterations(&self) -> f64 {
        self.iterations
    }

    pub fn has_infinite_iterations(&self) -> bool {
        self.iterations < 0.0 || self.iterations.is_infinite()
    }

    pub fn iteration_start(&self) -> f64 {
        self.iteration_start
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: f64) {
        self.start_time = Some(start_time);
    }

    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    pub fn pause_time(&self) -> f64 {
        self.pause_time
    }

    pub fn total_paused_duration(&self) -> f64 {
        self.total_paused_duration
    }

    pub fn needs_synchronized_start_time(&self) -> bool {
        self.needs_synchronized_start_time
    }

    pub fn set_needs_synchronized_start_time(&mut self, needs: bool) {
        self.needs_synchronized_start_time = needs;
    }

    pub fn received_finished_event(&self) -> bool {
        self.received_finished_event
    }

    pub fn set_received_finished_event(&mut self, received: bool) {
        self.received_finished_event = received;
    }

    /// Whether this instance decides when the animation starts and finishes
    pub fn is_controlling_instance(&self) -> bool {
        self.is_controlling_instance
    }

    pub(crate) fn set_is_controlling_instance(&mut self, controlling: bool) {
        self.is_controlling_instance = controlling;
    }

    pub fn is_impl_only(&self) -> bool {
        self.is_impl_only
    }

    pub fn reach(&self) -> ElementReach {
        self.reach
    }

    pub(crate) fn set_reach(&mut self, reach: ElementReach) {
        self.reach = reach;
    }

    pub fn is_finished(&self) -> bool {
        self.run_state.is_finished()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State Machine
    // ─────────────────────────────────────────────────────────────────────────

    /// Move to `state` at monotonic time `now`.
    ///
    /// Entering `Paused` records `now` as the pause time; leaving it for
    /// `Running` adds the pause to the total paused duration.
    pub fn set_run_state(&mut self, state: RunState, now: f64) {
        if state == self.run_state {
            return;
        }
        debug_assert!(
            self.run_state.can_transition_to(state),
            "illegal transition {} -> {} for {}",
            self.run_state,
            state,
            self.id
        );
        trace!(
            animation = %self.id,
            property = %self.property,
            from = self.run_state.name(),
            to = state.name(),
            "run state changed"
        );

        if self.run_state == RunState::Paused && state == RunState::Running {
            self.total_paused_duration += now - self.pause_time;
        } else if state == RunState::Paused {
            self.pause_time = now;
        }
        self.run_state = state;
    }

    /// Pause so that the active time reads `offset` seconds
    pub fn pause_at(&mut self, offset: f64) {
        let pause_time =
            self.start_time.unwrap_or(0.0) + self.total_paused_duration + offset - self.time_offset;
        if self.run_state == RunState::Paused {
            self.pause_time = pause_time;
        } else {
            self.set_run_state(RunState::Paused, pause_time);
        }
    }

    /// Retire a counterpart whose main instance is gone: straight to
    /// `WaitingForDeletion` when legal, through `Aborted` otherwise.
    pub(crate) fn retire(&mut self, now: f64) {
        if !self.run_state.can_transition_to(RunState::WaitingForDeletion) {
            self.set_run_state(RunState::Aborted, now);
        }
        self.set_run_state(RunState::WaitingForDeletion, now);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timing
    // ─────────────────────────────────────────────────────────────────────────

    /// Time since start, excluding pauses
    pub fn local_time(&self, now: f64) -> f64 {
        // The clock is stuck at zero until a start time is known
        if (self.run_state == RunState::Starting && self.start_time.is_none())
            || self.needs_synchronized_start_time
        {
            return 0.0;
        }
        let time = if self.run_state == RunState::Paused {
            self.pause_time
        } else {
            now
        };
        time - self.start_time.unwrap_or(time) - self.total_paused_duration
    }

    pub fn active_time(&self, now: f64) -> f64 {
        self.local_time(now) + self.time_offset
    }

    /// Whether the animation applies at `now`
    pub fn in_effect(&self, now: f64) -> bool {
        self.active_time(now) >= 0.0
            || matches!(self.fill_mode, FillMode::Backwards | FillMode::Both)
    }

    /// Curve time at `now`, after iterations, direction and rate are applied
    pub fn trim_time_to_current_iteration(&self, now: f64) -> f64 {
        let duration = self.curve.duration();
        let mut active_time = self.active_time(now);
        let start_offset = duration * self.iteration_start;

        if active_time < 0.0 {
            return start_offset;
        }
        if self.iterations == 0.0 || duration <= 0.0 {
            return 0.0;
        }

        let infinite = self.has_infinite_iterations();
        let repeated_duration = if infinite {
            f64::INFINITY
        } else {
            duration * self.iterations
        };
        let active_duration = repeated_duration / self.playback_rate.abs();

        if !infinite && active_time >= active_duration {
            active_time = active_duration;
        }

        let scaled_active_time = if self.playback_rate < 0.0 && !infinite {
            (active_time - active_duration) * self.playback_rate + start_offset
        } else {
            active_time * self.playback_rate + start_offset
        };

        // The very end of the last iteration maps to the curve end, not its start
        let at_end = !infinite
            && scaled_active_time - start_offset == repeated_duration
            && (self.iterations + self.iteration_start) % 1.0 == 0.0;
        let iteration_time = if at_end {
            duration
        } else {
            scaled_active_time.rem_euclid(duration)
        };

        let iteration = if scaled_active_time <= 0.0 {
            0
        } else if at_end {
            (self.iteration_start + self.iterations - 1.0).ceil() as i64
        } else {
            (scaled_active_time / duration) as i64
        };

        let reverse = match self.direction {
            Direction::Normal => false,
            Direction::Reverse => true,
            Direction::AlternateNormal => iteration.rem_euclid(2) == 1,
            Direction::AlternateReverse => iteration.rem_euclid(2) == 0,
        };
        if reverse {
            duration - iteration_time
        } else {
            iteration_time
        }
    }

    /// Whether a running animation has played all of its iterations by `now`
    pub fn is_finished_at(&self, now: f64) -> bool {
        if self.is_finished() {
            return true;
        }
        if self.needs_synchronized_start_time || self.playback_rate == 0.0 {
            return false;
        }
        if self.run_state != RunState::Running || self.has_infinite_iterations() {
            return false;
        }
        let elapsed = now + self.time_offset
            - self.start_time.unwrap_or(now)
            - self.total_paused_duration;
        self.curve.duration() * self.iterations / self.playback_rate.abs() <= elapsed
    }

    /// Flip the direction in place, keeping the current value continuous
    pub fn reverse(&mut self, now: f64) {
        let local = self.local_time(now);
        self.direction = self.direction.reversed();
        self.time_offset = self.curve.duration() - self.time_offset - 2.0 * local;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cross-Instance Sync
    // ─────────────────────────────────────────────────────────────────────────

    /// Independent copy for the instance that will run it
    pub fn clone_and_initialize(&self, run_state: RunState) -> Animation {
        let mut clone = Animation::new(self.curve.clone(), self.id, self.group, self.property);
        clone.run_state = run_state;
        clone.iterations = self.iterations;
        clone.iteration_start = self.iteration_start;
        clone.direction = self.direction;
        clone.playback_rate = self.playback_rate;
        clone.fill_mode = self.fill_mode;
        clone.start_time = self.start_time;
        clone.time_offset = self.time_offset;
        clone.pause_time = self.pause_time;
        clone.total_paused_duration = self.total_paused_duration;
        clone.is_controlling_instance = true;
        clone
    }

    /// Copy pause state onto the counterpart when either side is paused
    pub fn push_properties_to(&self, other: &mut Animation) {
        if self.run_state == RunState::Paused || other.run_state == RunState::Paused {
            other.run_state = self.run_state;
            other.pause_time = self.pause_time;
            other.total_paused_duration = self.total_paused_duration;
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Animation{{id={}, group={}, property={}, run_state={}}}",
            self.id.get(),
            self.group.get(),
            self.property,
            self.run_state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::AnimatedValue;
    use crate::easing::Easing;
    use crate::keyframe::{Keyframe, KeyframedCurve};

    fn fade(duration: f64) -> Animation {
        let curve = KeyframedCurve::new(Keyframe::new(0.0, 0.0_f32))
            .keyframe(Keyframe::new(duration, 1.0));
        Animation::new(curve, AnimationId(1), GroupId(1), TargetProperty::Opacity)
    }

    fn running(mut animation: Animation, start: f64) -> Animation {
        animation.set_run_state(RunState::Starting, start);
        animation.set_start_time(start);
        animation.set_run_state(RunState::Running, start);
        animation
    }

    #[test]
    fn test_transition_table() {
        use RunState::*;
        assert!(WaitingForTargetAvailability.can_transition_to(Starting));
        assert!(!WaitingForTargetAvailability.can_transition_to(Finished));
        assert!(!WaitingForTargetAvailability.can_transition_to(WaitingForDeletion));
        assert!(Running.can_transition_to(Paused));
        assert!(Paused.can_transition_to(Running));
        assert!(!Paused.can_transition_to(Finished));
        assert!(Aborted.can_transition_to(WaitingForDeletion));
        assert!(!Finished.can_transition_to(Running));
        assert!(!WaitingForDeletion.can_transition_to(Running));
        assert!(Running.can_transition_to(Running));
    }

    #[test]
    fn test_reach_transitions() {
        assert_eq!(ElementReach::PendingOnly.activate(), ElementReach::Both);
        assert_eq!(
            ElementReach::Both.remove_from_pending(),
            ElementReach::ActiveOnly
        );
        assert_eq!(ElementReach::ActiveOnly.activate(), ElementReach::Detached);
        assert!(!ElementReach::Detached.affects(ElementListType::Active));
        assert!(ElementReach::PendingOnly.affects(ElementListType::Pending));
    }

    #[test]
    #[should_panic(expected = "cannot animate")]
    fn test_curve_kind_must_match_property() {
        let curve = KeyframedCurve::tween(false, true, 1.0, Easing::Linear);
        let _ = Animation::new(curve, AnimationId(1), GroupId(1), TargetProperty::Opacity);
    }

    #[test]
    fn test_trim_time_basic() {
        let animation = running(fade(1.0), 0.0);
        assert_eq!(animation.trim_time_to_current_iteration(0.25), 0.25);
        // Clamped at the end of the only iteration
        assert_eq!(animation.trim_time_to_current_iteration(1.0), 1.0);
        assert_eq!(animation.trim_time_to_current_iteration(5.0), 1.0);
    }

    #[test]
    fn test_trim_time_iterations_and_direction() {
        let repeat = running(fade(1.0).with_iterations(3.0), 0.0);
        assert!((repeat.trim_time_to_current_iteration(1.5) - 0.5).abs() < 1e-9);
        assert_eq!(repeat.trim_time_to_current_iteration(3.5), 1.0);

        let alternate = running(
            fade(1.0)
                .with_iterations(2.0)
                .with_direction(Direction::AlternateNormal),
            0.0,
        );
        assert!((alternate.trim_time_to_current_iteration(0.25) - 0.25).abs() < 1e-9);
        assert!((alternate.trim_time_to_current_iteration(1.25) - 0.75).abs() < 1e-9);
        // Ends where the backward iteration ends
        assert_eq!(alternate.trim_time_to_current_iteration(2.0), 0.0);

        let endless = running(fade(1.0).with_iterations(INFINITE_ITERATIONS), 0.0);
        assert!((endless.trim_time_to_current_iteration(10.25) - 0.25).abs() < 1e-9);
        assert!(!endless.is_finished_at(1000.0));
    }

    #[test]
    fn test_trim_time_degenerate_cases() {
        let zero = running(fade(1.0).with_iterations(0.0), 0.0);
        assert_eq!(zero.trim_time_to_current_iteration(0.5), 0.0);

        let instant = running(
            Animation::new(
                KeyframedCurve::new(Keyframe::new(0.0, 0.5_f32)),
                AnimationId(2),
                GroupId(2),
                TargetProperty::Opacity,
            ),
            0.0,
        );
        assert_eq!(instant.trim_time_to_current_iteration(0.5), 0.0);
        assert_eq!(
            instant.curve().value_at(0.0),
            AnimatedValue::Float(0.5)
        );
        assert!(instant.is_finished_at(0.0));

        let backwards = running(fade(1.0).with_playback_rate(-1.0), 0.0);
        assert_eq!(backwards.trim_time_to_current_iteration(0.0), 1.0);
        assert!((backwards.trim_time_to_current_iteration(0.25) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_local_time_waits_for_start() {
        let mut animation = fade(1.0);
        animation.set_run_state(RunState::Starting, 5.0);
        assert_eq!(animation.local_time(7.0), 0.0);

        animation.set_start_time(5.0);
        assert_eq!(animation.local_time(7.0), 2.0);

        animation.set_needs_synchronized_start_time(true);
        assert_eq!(animation.local_time(7.0), 0.0);
    }

    #[test]
    fn test_pause_excludes_paused_time() {
        let mut animation = running(fade(2.0), 0.0);
        animation.set_run_state(RunState::Paused, 0.5);
        assert_eq!(animation.local_time(3.0), 0.5);

        animation.set_run_state(RunState::Running, 1.5);
        assert_eq!(animation.total_paused_duration(), 1.0);
        assert_eq!(animation.local_time(2.0), 1.0);
        assert!(!animation.is_finished_at(2.5));
        assert!(animation.is_finished_at(3.0));
    }

    #[test]
    fn test_pause_at_seeks_active_time() {
        let mut animation = running(fade(2.0).with_time_offset(0.25), 10.0);
        animation.pause_at(1.5);
        assert_eq!(animation.run_state(), RunState::Paused);
        assert_eq!(animation.active_time(99.0), 1.5);

        animation.pause_at(0.5);
        assert_eq!(animation.active_time(99.0), 0.5);
    }

    #[test]
    fn test_in_effect_respects_fill_mode() {
        let early = running(fade(1.0).with_time_offset(-1.0), 0.0);
        assert!(early.in_effect(0.5));
        let strict = running(
            fade(1.0)
                .with_time_offset(-1.0)
                .with_fill_mode(FillMode::Forwards),
            0.0,
        );
        assert!(!strict.in_effect(0.5));
        assert!(strict.in_effect(1.5));
    }

    #[test]
    fn test_reverse_keeps_value_continuous() {
        let mut animation = running(fade(1.0), 0.0);
        let now = 0.3;
        let before = animation
            .curve()
            .value_at(animation.trim_time_to_current_iteration(now));

        animation.reverse(now);
        assert_eq!(animation.direction(), Direction::Reverse);
        let after = animation
            .curve()
            .value_at(animation.trim_time_to_current_iteration(now));

        match (before, after) {
            (AnimatedValue::Float(a), AnimatedValue::Float(b)) => assert!((a - b).abs() < 1e-6),
            other => panic!("unexpected values {other:?}"),
        }
        // Heading back: the value decreases from here on
        let later = animation
            .curve()
            .value_at(animation.trim_time_to_current_iteration(now + 0.1));
        match later {
            AnimatedValue::Float(v) => assert!((v - 0.2).abs() < 1e-6),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_clone_and_initialize() {
        let original = fade(1.0).with_iterations(2.0).with_time_offset(0.5);
        let clone = original.clone_and_initialize(RunState::WaitingForTargetAvailability);
        assert_eq!(clone.id(), original.id());
        assert_eq!(clone.curve(), original.curve());
        assert_eq!(clone.iterations(), 2.0);
        assert_eq!(clone.time_offset(), 0.5);
        assert!(clone.is_controlling_instance());
        assert!(!original.is_controlling_instance());
    }

    #[test]
    fn test_push_properties_copies_pause_state() {
        let mut main = running(fade(1.0), 0.0);
        let mut other = main.clone_and_initialize(RunState::Running);

        main.push_properties_to(&mut other);
        assert_eq!(other.run_state(), RunState::Running);

        main.set_run_state(RunState::Paused, 0.4);
        main.push_properties_to(&mut other);
        assert_eq!(other.run_state(), RunState::Paused);
        assert_eq!(other.pause_time(), 0.4);
    }

    #[test]
    fn test_retire_goes_through_aborted_when_needed() {
        let mut waiting = fade(1.0);
        waiting.retire(1.0);
        assert_eq!(waiting.run_state(), RunState::WaitingForDeletion);

        let mut active = running(fade(1.0), 0.0);
        active.retire(1.0);
        assert_eq!(active.run_state(), RunState::WaitingForDeletion);
    }
}
