//! Worklet mutator hand-off
//!
//! A mutator drives the local time of worklet players. Before each tick the
//! host collects the state of its worklet players, hands it to the mutator
//! and applies the local times it returns.

use motive_core::PlayerId;

/// Input to the mutator for one worklet player
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatorState {
    pub id: PlayerId,
    pub name: String,
    /// Seconds since the player was first handed to the mutator
    pub current_time: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutatorInputState {
    pub animators: Vec<AnimatorState>,
}

impl MutatorInputState {
    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }
}

/// Output of the mutator for one worklet player
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorOutputState {
    pub id: PlayerId,
    /// Time the player's animations are sampled at
    pub local_time: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutatorOutputState {
    pub animators: Vec<AnimatorOutputState>,
}

/// Pluggable component computing local times for worklet players
pub trait LayerTreeMutator: Send {
    fn mutate(&mut self, input: &MutatorInputState) -> MutatorOutputState;
}
