//! Agent.
use super::Obs;
use crate::{record::Recorder, ReplayBuffer};
use anyhow::Result;
use std::{
    ops::{Deref, DerefMut},
    path::Path,
};

/// A trainable policy on the environment.
///
/// The actor/critic/encoder/decoder networks and their optimization live
/// behind this trait; the training loop only needs action selection, one
/// gradient step at a time, and checkpointing.
pub trait Agent {
    /// Switches between training and evaluation mode.
    ///
    /// Evaluation mode must be free of training-time side effects such as
    /// batch-norm statistic updates.
    fn set_train(&mut self, train: bool);

    /// Returns if the agent is in training mode.
    fn is_train(&self) -> bool;

    /// Greedy action for the given observation, normalized to `[-1, 1]^d`.
    fn select_action(&mut self, obs: &Obs) -> Vec<f32>;

    /// Stochastic action for the given observation, normalized to
    /// `[-1, 1]^d`. Used during data collection.
    fn sample_action(&mut self, obs: &Obs) -> Vec<f32>;

    /// Performs one gradient step. The agent draws its own batch from
    /// `buffer` and may log metrics through `recorder`.
    fn update(
        &mut self,
        buffer: &mut ReplayBuffer,
        recorder: &mut dyn Recorder,
        step: usize,
    ) -> Result<()>;

    /// Saves the model parameters under `dir`, tagged with the given step.
    fn save(&self, dir: &Path, step: usize) -> Result<()>;

    /// Loads model parameters saved with [`Agent::save`].
    fn load(&mut self, dir: &Path, step: usize) -> Result<()>;
}

/// Scoped evaluation-mode toggle.
///
/// Captures the agent's current mode flag, forces evaluation mode, and
/// restores the captured flag when dropped, on any exit path. Action
/// selection during data collection and evaluation episodes happens inside
/// this guard so that it never mutates training-time statistics.
///
/// ```ignore
/// let action = {
///     let mut agent = EvalMode::new(&mut agent);
///     agent.sample_action(&obs)
/// };
/// ```
pub struct EvalMode<'a, A: Agent + ?Sized> {
    agent: &'a mut A,
    was_train: bool,
}

impl<'a, A: Agent + ?Sized> EvalMode<'a, A> {
    /// Puts `agent` into evaluation mode until the guard is dropped.
    pub fn new(agent: &'a mut A) -> Self {
        let was_train = agent.is_train();
        agent.set_train(false);
        Self { agent, was_train }
    }
}

impl<'a, A: Agent + ?Sized> Deref for EvalMode<'a, A> {
    type Target = A;

    fn deref(&self) -> &Self::Target {
        self.agent
    }
}

impl<'a, A: Agent + ?Sized> DerefMut for EvalMode<'a, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.agent
    }
}

impl<'a, A: Agent + ?Sized> Drop for EvalMode<'a, A> {
    fn drop(&mut self) {
        self.agent.set_train(self.was_train);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::RandomAgent;

    #[test]
    fn eval_mode_restores_training_flag() {
        let mut agent = RandomAgent::new(2, 0);
        agent.set_train(true);
        {
            let guard = EvalMode::new(&mut agent);
            assert!(!guard.is_train());
        }
        assert!(agent.is_train());
    }

    #[test]
    fn eval_mode_keeps_eval_flag() {
        let mut agent = RandomAgent::new(2, 0);
        agent.set_train(false);
        {
            let _guard = EvalMode::new(&mut agent);
        }
        assert!(!agent.is_train());
    }
}
