//! Functional stand-ins for the external collaborators.
//!
//! The real robot simulation and the SAC-AE network agent live outside
//! this crate. The doubles here implement the same traits with scripted,
//! fully deterministic behavior so the training loop, the buffer and the
//! evaluator can be exercised end to end in tests and smoke runs.
use crate::{
    record::Recorder, ActionSpace, Agent, Env, EnvStep, Obs, ObservationSpace, ObservationType,
    ReplayBuffer,
};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::Path;

/// Configuration of [`ScriptedEnv`].
#[derive(Clone, Debug)]
pub struct ScriptedEnvConfig {
    /// Shape of one camera frame `(channels, height, width)`.
    pub camera: [usize; 3],

    /// Length of the proprioceptive state, if any.
    pub proprioception: Option<usize>,

    /// Number of action elements.
    pub action_dim: usize,

    /// Step horizon after which an episode reports `done`.
    pub episode_len: usize,

    /// Episode step at which the episode terminates early (before the
    /// horizon), if any.
    pub terminate_at: Option<usize>,

    /// Upper action bounds; unit bounds when `None`.
    pub action_high: Option<Vec<f32>>,

    /// Reward sequence, cycled per step. Empty means all rewards are 0.
    pub rewards: Vec<f32>,

    /// Seed (kept for interface parity; the environment is deterministic).
    pub seed: u64,
}

impl Default for ScriptedEnvConfig {
    fn default() -> Self {
        Self {
            camera: [3, 8, 8],
            proprioception: None,
            action_dim: 6,
            episode_len: 20,
            terminate_at: None,
            action_high: None,
            rewards: vec![],
            seed: 0,
        }
    }
}

/// A deterministic scripted environment.
///
/// Camera frames are filled with a value derived from a global step
/// counter, so consecutive frames are distinguishable and byte-exact
/// assertions are possible. The environment records every applied action
/// and counts resets, which lets tests verify recovery-nudge behavior
/// from the outside.
pub struct ScriptedEnv {
    config: ScriptedEnvConfig,
    obs_space: ObservationSpace,
    act_space: ActionSpace,
    /// Global counter, advanced by every reset and step.
    t: usize,
    episode_step: usize,
    /// Number of `reset` calls so far.
    pub resets: usize,
    /// Every action passed to `step`, in order.
    pub actions: Vec<Vec<f32>>,
}

impl ScriptedEnv {
    /// Creates the environment.
    pub fn new(config: ScriptedEnvConfig) -> Self {
        let obs_space = ObservationSpace {
            camera: config.camera,
            proprioception: config.proprioception,
        };
        let high = config
            .action_high
            .clone()
            .unwrap_or_else(|| vec![1.0; config.action_dim]);
        let act_space = ActionSpace::symmetric(high);

        Self {
            config,
            obs_space,
            act_space,
            t: 0,
            episode_step: 0,
            resets: 0,
            actions: Vec::new(),
        }
    }

    fn observe(&self) -> Obs {
        let fill = (self.t % 251) as u8;
        Obs {
            camera: vec![fill; self.obs_space.camera_len()],
            proprio: self
                .config
                .proprioception
                .map(|d| (0..d).map(|i| (self.t + i) as f32).collect()),
        }
    }

    fn reward(&self) -> f32 {
        if self.config.rewards.is_empty() {
            0.0
        } else {
            self.config.rewards[self.t % self.config.rewards.len()]
        }
    }
}

impl Env for ScriptedEnv {
    fn reset(&mut self) -> Result<Obs> {
        self.t += 1;
        self.episode_step = 0;
        self.resets += 1;
        Ok(self.observe())
    }

    fn step(&mut self, action: &[f32]) -> Result<EnvStep> {
        self.t += 1;
        self.episode_step += 1;
        self.actions.push(action.to_vec());
        Ok(EnvStep {
            obs: self.observe(),
            reward: self.reward(),
            done: self.episode_step
                >= self
                    .config
                    .terminate_at
                    .unwrap_or(self.config.episode_len),
        })
    }

    fn observation_space(&self) -> &ObservationSpace {
        &self.obs_space
    }

    fn action_space(&self) -> &ActionSpace {
        &self.act_space
    }

    fn observation_type(&self) -> ObservationType {
        ObservationType {
            camera: true,
            q: self.config.proprioception.is_some(),
            ..Default::default()
        }
    }

    fn max_episode_steps(&self) -> usize {
        self.config.episode_len
    }
}

/// A uniform-random policy with a no-op update.
///
/// Stands in for the neural SAC-AE agent in smoke runs of the pipeline.
pub struct RandomAgent {
    action_dim: usize,
    train: bool,
    rng: StdRng,
}

impl RandomAgent {
    /// Creates an agent emitting `action_dim`-element actions.
    pub fn new(action_dim: usize, seed: u64) -> Self {
        Self {
            action_dim,
            train: true,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn set_train(&mut self, train: bool) {
        self.train = train;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn select_action(&mut self, _obs: &Obs) -> Vec<f32> {
        vec![0.0; self.action_dim]
    }

    fn sample_action(&mut self, _obs: &Obs) -> Vec<f32> {
        (0..self.action_dim)
            .map(|_| self.rng.gen_range(-1.0..=1.0))
            .collect()
    }

    fn update(
        &mut self,
        _buffer: &mut ReplayBuffer,
        _recorder: &mut dyn Recorder,
        _step: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn save(&self, _dir: &Path, _step: usize) -> Result<()> {
        Ok(())
    }

    fn load(&mut self, _dir: &Path, _step: usize) -> Result<()> {
        Ok(())
    }
}

/// An agent that counts every call it receives.
///
/// Used to assert the trainer's update cadence and mode handling.
pub struct CountingAgent {
    action_dim: usize,
    train: bool,
    /// Number of `select_action` calls.
    pub selects: usize,
    /// Number of `sample_action` calls.
    pub samples: usize,
    /// The global step passed to each `update` call, in order.
    pub updates: Vec<usize>,
    /// Whether the agent was in training mode during each `update`.
    pub update_modes: Vec<bool>,
    /// Batch drawn from the buffer per update, if requested.
    pub batch_size: Option<usize>,
}

impl CountingAgent {
    /// Creates the agent.
    pub fn new(action_dim: usize) -> Self {
        Self {
            action_dim,
            train: true,
            selects: 0,
            samples: 0,
            updates: Vec::new(),
            update_modes: Vec::new(),
            batch_size: None,
        }
    }
}

impl Agent for CountingAgent {
    fn set_train(&mut self, train: bool) {
        self.train = train;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn select_action(&mut self, _obs: &Obs) -> Vec<f32> {
        self.selects += 1;
        vec![0.5; self.action_dim]
    }

    fn sample_action(&mut self, _obs: &Obs) -> Vec<f32> {
        self.samples += 1;
        vec![0.5; self.action_dim]
    }

    fn update(
        &mut self,
        buffer: &mut ReplayBuffer,
        _recorder: &mut dyn Recorder,
        step: usize,
    ) -> Result<()> {
        self.updates.push(step);
        self.update_modes.push(self.train);
        if let Some(batch_size) = self.batch_size {
            let _ = buffer.sample(batch_size);
        }
        Ok(())
    }

    fn save(&self, dir: &Path, step: usize) -> Result<()> {
        // Leaves a marker per checkpoint so tests can observe save calls.
        std::fs::write(dir.join(format!("model_{}.marker", step)), step.to_string())?;
        Ok(())
    }

    fn load(&mut self, _dir: &Path, _step: usize) -> Result<()> {
        Ok(())
    }
}
