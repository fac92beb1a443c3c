//! Identifiers and the id allocator
//!
//! Ids are plain integers wrapped in newtypes. They stay stable across the
//! main/impl boundary: an animation cloned to the impl instance keeps the id
//! it was given on the main instance.

use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Identifier Newtypes
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// An animated element, assigned by the embedder
    ElementId,
    "element"
);
define_id!(
    /// Unique identifier for an animation
    AnimationId,
    "animation"
);
define_id!(
    /// Animations sharing a group start together
    GroupId,
    "group"
);
define_id!(
    /// Unique identifier for an animation player
    PlayerId,
    "player"
);
define_id!(
    /// Unique identifier for an animation timeline
    TimelineId,
    "timeline"
);

// ─────────────────────────────────────────────────────────────────────────────
// Id Provider
// ─────────────────────────────────────────────────────────────────────────────

/// First id of the namespace used by impl instances
const IMPL_NAMESPACE_START: u64 = (1 << 32) + 1;

/// Allocator for animation, group, player and timeline ids.
///
/// Each kind of id has its own counter. A host owns one provider; the impl
/// instance draws from a separate namespace so that impl-only objects never
/// collide with ids pushed from the main instance.
#[derive(Clone, Debug)]
pub struct IdProvider {
    next_animation: u64,
    next_group: u64,
    next_player: u64,
    next_timeline: u64,
}

impl IdProvider {
    pub fn new() -> Self {
        Self::with_namespace(1)
    }

    /// Provider for an impl instance
    pub fn for_impl_instance() -> Self {
        Self::with_namespace(IMPL_NAMESPACE_START)
    }

    /// Provider whose counters all start at `first`
    pub fn with_namespace(first: u64) -> Self {
        assert!(first > 0, "id 0 is reserved");
        Self {
            next_animation: first,
            next_group: first,
            next_player: first,
            next_timeline: first,
        }
    }

    pub fn next_animation_id(&mut self) -> AnimationId {
        AnimationId(Self::bump(&mut self.next_animation))
    }

    pub fn next_group_id(&mut self) -> GroupId {
        GroupId(Self::bump(&mut self.next_group))
    }

    pub fn next_player_id(&mut self) -> PlayerId {
        PlayerId(Self::bump(&mut self.next_player))
    }

    pub fn next_timeline_id(&mut self) -> TimelineId {
        TimelineId(Self::bump(&mut self.next_timeline))
    }

    fn bump(counter: &mut u64) -> u64 {
        let id = *counter;
        *counter += 1;
        id
    }
}

impl Default for IdProvider {
    fn default() -> Self {
        Self::new()
    }
}
