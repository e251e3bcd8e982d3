//! Evaluate an [`Agent`].
use crate::{
    record::{Record, Recorder},
    Agent, Env, EvalMode,
};
use anyhow::Result;
use log::info;

/// Runs full episodes under the current policy without exploration or
/// learning and records the rewards.
pub struct Evaluator {
    n_episodes: usize,
    recovery_action: Vec<f32>,
}

impl Evaluator {
    /// Constructs an evaluator running `n_episodes` per invocation.
    ///
    /// `recovery_action` is applied before each reset, the same anti-stall
    /// nudge the trainer uses.
    pub fn new(n_episodes: usize, recovery_action: Vec<f32>) -> Self {
        Self {
            n_episodes,
            recovery_action,
        }
    }

    /// Runs the evaluation episodes and returns the mean episode reward.
    ///
    /// Each episode: nudge, reset, then act greedily to completion with
    /// the policy in evaluation mode, rescaling actions by the
    /// action-space upper bound. Per-episode rewards are stored as
    /// `eval/episode_reward` and the aggregate is flushed at `step`.
    pub fn evaluate<E, A>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut dyn Recorder,
        step: usize,
    ) -> Result<f32>
    where
        E: Env,
        A: Agent,
    {
        let mut total = 0f32;

        for i in 0..self.n_episodes {
            env.step(&self.recovery_action)?;
            let mut obs = env.reset()?;
            let mut episode_reward = 0f32;
            let mut episode_step = 0usize;

            loop {
                let action = {
                    let mut agent = EvalMode::new(agent);
                    let normalized = agent.select_action(&obs);
                    normalized
                        .iter()
                        .zip(env.action_space().high.iter())
                        .map(|(a, h)| a * h)
                        .collect::<Vec<f32>>()
                };
                let result = env.step(&action)?;
                episode_reward += result.reward;
                episode_step += 1;
                if result.done {
                    break;
                }
                obs = result.obs;
            }

            info!(
                "Evaluation episode {}: reward {:.4} over {} steps",
                i, episode_reward, episode_step
            );
            recorder.store(Record::from_scalar("eval/episode_reward", episode_reward));
            total += episode_reward;
        }

        recorder.flush(step as i64);
        Ok(total / self.n_episodes as f32)
    }
}
