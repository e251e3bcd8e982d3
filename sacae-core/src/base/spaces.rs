//! Observation and action spaces.
use rand::{distributions::Uniform, prelude::Distribution, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Shapes of the observation components an environment emits.
///
/// The presence or absence of the proprioception component is decided once,
/// when the environment is constructed. Consumers (notably the replay
/// buffer) allocate storage for proprioception only if it is declared here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSpace {
    /// Shape of a camera observation as `(channels, height, width)`.
    pub camera: [usize; 3],

    /// Length of the proprioceptive state vector, if the environment
    /// provides one.
    pub proprioception: Option<usize>,
}

impl ObservationSpace {
    /// Number of elements in one camera observation.
    pub fn camera_len(&self) -> usize {
        self.camera[0] * self.camera[1] * self.camera[2]
    }

    /// Returns if the space declares a proprioception component.
    pub fn has_proprio(&self) -> bool {
        self.proprioception.is_some()
    }
}

/// A box-shaped continuous action space with per-element bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    /// Lower bound of each action element.
    pub low: Vec<f32>,

    /// Upper bound of each action element.
    pub high: Vec<f32>,
}

impl ActionSpace {
    /// Creates an action space with symmetric bounds `[-high, high]`.
    pub fn symmetric(high: Vec<f32>) -> Self {
        let low = high.iter().map(|h| -h).collect();
        Self { low, high }
    }

    /// Number of action elements.
    pub fn dim(&self) -> usize {
        self.high.len()
    }

    /// Draws an action uniformly at random within the bounds.
    pub fn sample(&self, rng: &mut StdRng) -> Vec<f32> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&lo, &hi)| Uniform::new_inclusive(lo, hi).sample(rng))
            .collect()
    }
}

/// Flags declaring which observation channels an environment emits.
///
/// Mirrors the robot environment's observation configuration: camera image,
/// joint positions (`q`), joint velocities (`dq`), joint torques (`tau`),
/// end-effector pose (`x`) and end-effector velocity (`dx`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationType {
    /// Camera image active.
    pub camera: bool,
    /// Joint positions active.
    pub q: bool,
    /// Joint velocities active.
    pub dq: bool,
    /// Joint torques active.
    pub tau: bool,
    /// End-effector pose active.
    pub x: bool,
    /// End-effector velocity active.
    pub dx: bool,
}

impl ObservationType {
    /// A camera-only configuration.
    pub fn camera_only() -> Self {
        Self {
            camera: true,
            ..Default::default()
        }
    }

    /// Returns if a proprioceptive robot-state reading is part of the
    /// observation. Only joint positions and the end-effector pose count.
    pub fn has_robot_state(&self) -> bool {
        self.q || self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn action_space_sample_within_bounds() {
        let space = ActionSpace::symmetric(vec![0.05, 0.05, 0.1, 1.0, 1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let a = space.sample(&mut rng);
            assert_eq!(a.len(), 6);
            for (i, v) in a.iter().enumerate() {
                assert!(space.low[i] <= *v && *v <= space.high[i]);
            }
        }
    }

    #[test]
    fn robot_state_requires_q_or_x() {
        let mut ot = ObservationType::camera_only();
        assert!(!ot.has_robot_state());
        ot.dq = true;
        ot.tau = true;
        assert!(!ot.has_robot_state());
        ot.x = true;
        assert!(ot.has_robot_state());
    }
}
