//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// Total number of environment steps to train for.
    pub num_train_steps: usize,

    /// Warm-up steps with uniform random actions before any agent update.
    pub init_steps: usize,

    /// Interval of evaluation and checkpointing in environment steps,
    /// applied at episode boundaries. 0 disables periodic evaluation.
    pub eval_freq: usize,

    /// Window, in steps, over which a flatlined episode reward counts as
    /// a stall. 0 disables stall detection.
    pub stall_window: usize,

    /// Absolute episode-reward change below which the agent is considered
    /// stuck.
    pub stall_epsilon: f32,

    /// Action applied to the environment before every reset to free a
    /// physically stuck arm (a small upward end-effector displacement).
    pub recovery_action: Vec<f32>,

    /// Where to save model checkpoints.
    pub model_dir: Option<PathBuf>,

    /// Where to save replay-buffer chunks.
    pub buffer_dir: Option<PathBuf>,

    /// Whether to checkpoint the model at evaluation boundaries.
    pub save_model: bool,

    /// Whether to persist the replay buffer at evaluation boundaries.
    pub save_buffer: bool,

    /// Seed for warm-up action sampling.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            num_train_steps: 100_000,
            init_steps: 1000,
            eval_freq: 10_000,
            stall_window: 100,
            stall_epsilon: 1e-5,
            recovery_action: vec![0.0, 0.0, 0.1, 0.0, 0.0, 0.0],
            model_dir: None,
            buffer_dir: None,
            save_model: false,
            save_buffer: false,
            seed: 42,
        }
    }
}

impl TrainerConfig {
    /// Sets the total number of training steps.
    pub fn num_train_steps(mut self, v: usize) -> Self {
        self.num_train_steps = v;
        self
    }

    /// Sets the number of warm-up exploration steps.
    pub fn init_steps(mut self, v: usize) -> Self {
        self.init_steps = v;
        self
    }

    /// Sets the evaluation interval in environment steps.
    pub fn eval_freq(mut self, v: usize) -> Self {
        self.eval_freq = v;
        self
    }

    /// Sets the stall-detection window in environment steps.
    pub fn stall_window(mut self, v: usize) -> Self {
        self.stall_window = v;
        self
    }

    /// Sets the stall-detection reward epsilon.
    pub fn stall_epsilon(mut self, v: f32) -> Self {
        self.stall_epsilon = v;
        self
    }

    /// Sets the recovery nudge action.
    pub fn recovery_action(mut self, v: Vec<f32>) -> Self {
        self.recovery_action = v;
        self
    }

    /// Sets the model checkpoint directory and enables model saving.
    pub fn model_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(v.into());
        self.save_model = true;
        self
    }

    /// Sets the buffer persistence directory and enables buffer saving.
    pub fn buffer_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.buffer_dir = Some(v.into());
        self.save_buffer = true;
        self
    }

    /// Sets the warm-up sampling seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`TrainerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`] as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn yaml_round_trip() -> Result<()> {
        let config = TrainerConfig::default()
            .num_train_steps(500)
            .init_steps(50)
            .eval_freq(100)
            .model_dir("work/model")
            .seed(7);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer.yaml");
        config.save(&path)?;
        assert_eq!(TrainerConfig::load(&path)?, config);
        Ok(())
    }
}
