//! Animation timelines
//!
//! A timeline groups players. The main host's timelines are mirrored on the
//! impl host at every push; impl-only timelines exist on the impl host alone
//! and are never removed by a push.

use motive_core::{PlayerId, TimelineId};

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationTimeline {
    id: TimelineId,
    is_impl_only: bool,
    players: Vec<PlayerId>,
    needs_push_properties: bool,
}

impl AnimationTimeline {
    pub fn new(id: TimelineId) -> Self {
        Self {
            id,
            is_impl_only: false,
            players: Vec::new(),
            needs_push_properties: false,
        }
    }

    /// Builder: exists on the impl instance only
    pub fn with_impl_only(mut self, is_impl_only: bool) -> Self {
        self.is_impl_only = is_impl_only;
        self
    }

    pub fn id(&self) -> TimelineId {
        self.id
    }

    pub fn is_impl_only(&self) -> bool {
        self.is_impl_only
    }

    /// Attached players in attach order
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn contains_player(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    pub fn needs_push_properties(&self) -> bool {
        self.needs_push_properties
    }

    pub(crate) fn set_needs_push_properties(&mut self) {
        self.needs_push_properties = true;
    }

    pub(crate) fn clear_needs_push_properties(&mut self) {
        self.needs_push_properties = false;
    }

    pub(crate) fn attach_player(&mut self, player: PlayerId) {
        assert!(
            !self.contains_player(player),
            "{player} is already attached to {}",
            self.id
        );
        self.players.push(player);
        self.needs_push_properties = true;
    }

    pub(crate) fn detach_player(&mut self, player: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| *p != player);
        let detached = before != self.players.len();
        if detached {
            self.needs_push_properties = true;
        }
        detached
    }

    /// Empty counterpart for the impl instance
    pub fn create_impl_instance(&self) -> AnimationTimeline {
        AnimationTimeline::new(self.id).with_impl_only(self.is_impl_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_detach_players() {
        let mut timeline = AnimationTimeline::new(TimelineId(4));
        assert!(!timeline.needs_push_properties());

        timeline.attach_player(PlayerId(1));
        timeline.attach_player(PlayerId(2));
        assert_eq!(timeline.players(), &[PlayerId(1), PlayerId(2)]);
        assert!(timeline.needs_push_properties());

        timeline.clear_needs_push_properties();
        assert!(timeline.detach_player(PlayerId(1)));
        assert!(!timeline.detach_player(PlayerId(1)));
        assert!(timeline.needs_push_properties());
        assert_eq!(timeline.players(), &[PlayerId(2)]);
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn test_double_attach_panics() {
        let mut timeline = AnimationTimeline::new(TimelineId(4));
        timeline.attach_player(PlayerId(1));
        timeline.attach_player(PlayerId(1));
    }

    #[test]
    fn test_impl_instance_is_empty() {
        let mut timeline = AnimationTimeline::new(TimelineId(9));
        timeline.attach_player(PlayerId(1));
        let other = timeline.create_impl_instance();
        assert_eq!(other.id(), TimelineId(9));
        assert!(other.players().is_empty());
        assert!(!other.is_impl_only());
    }
}
