//! Configuration of [`ReplayBuffer`](super::ReplayBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayBuffer`](super::ReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct ReplayBufferConfig {
    /// Maximum number of transitions that can be stored. Fixed at
    /// construction; the buffer is never resized.
    pub capacity: usize,

    /// Seed for the index sampler.
    pub seed: u64,
}

impl Default for ReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            seed: 42,
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the sampler seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs [`ReplayBufferConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration as YAML.
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
        let config = ReplayBufferConfig::default().capacity(1234).seed(7);
        let dir = TempDir::new("replay_buffer_config")?;
        let path = dir.path().join("replay_buffer.yaml");
        config.save(&path)?;
        assert_eq!(ReplayBufferConfig::load(&path)?, config);
        Ok(())
    }
}
