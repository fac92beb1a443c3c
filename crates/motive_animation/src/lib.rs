//! Motive Animation Engine
//!
//! Keyframe animations scheduled on two mirrored host instances.
//!
//! # Features
//!
//! - **Curves**: keyframed curves over every animatable value kind, plus
//!   retargetable scroll offset curves
//! - **Run States**: a checked lifecycle from waiting to deletion, with
//!   grouped starts, pausing, reversal and iteration control
//! - **Players & Timelines**: addressable controllers bound to elements,
//!   with implicit transitions and worklet-driven timing
//! - **Main/Impl Sync**: the main host owns the animation definitions, the
//!   impl host ticks them; a one-way push keeps the impl host in step and
//!   lifecycle events flow back
//!
//! All objects live in per-host arenas and are addressed by id.

pub mod animation;
pub mod client;
pub mod curve;
pub mod delegate;
pub mod easing;
pub mod element;
pub mod error;
pub mod events;
pub mod host;
pub mod keyframe;
pub mod mutator;
pub mod player;
pub mod scroll;
pub mod scroll_offset;
pub mod settings;
pub mod target;
pub mod ticker;
pub mod timeline;
pub mod transition;

pub use animation::{Animation, Direction, ElementReach, FillMode, RunState, INFINITE_ITERATIONS};
pub use client::MutatorHostClient;
pub use curve::{AnimatedValue, AnimationCurve};
pub use delegate::AnimationDelegate;
pub use easing::{Easing, StepPosition};
pub use element::{ElementAnimations, ElementLists, PropertyAnimationState};
pub use error::{CurveError, MotiveError, Result, SettingsError};
pub use events::{AnimationEvent, AnimationEventType, AnimationEvents};
pub use host::{AnimationHost, PlayerKey, ThreadInstance};
pub use keyframe::{Interpolate, Keyframe, KeyframedCurve};
pub use mutator::{
    AnimatorOutputState, AnimatorState, LayerTreeMutator, MutatorInputState, MutatorOutputState,
};
pub use player::{AnimationPlayer, Worklet};
pub use scroll::ScrollOffsetAnimations;
pub use scroll_offset::{DurationBehavior, ScrollOffsetAnimationCurve};
pub use settings::{AnimationSettings, ScrollCurveSettings};
pub use target::{AnimationTarget, ElementListType, ElementTarget};
pub use ticker::{AnimationTicker, BlockedProperties};
pub use timeline::AnimationTimeline;
pub use transition::{Transition, TransitionOutcome};
