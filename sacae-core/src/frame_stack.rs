//! Frame-stacking environment wrapper.
use crate::{ActionSpace, Env, EnvStep, Obs, ObservationSpace, ObservationType};
use anyhow::Result;
use std::collections::VecDeque;

/// Fixed episode step horizon exposed by the wrapper.
///
/// Episodes that happen to terminate exactly at this step are treated as
/// truncated by the trainer's bootstrap rule.
const MAX_EPISODE_STEPS: usize = 300;

/// Wraps an environment, exposing the last K camera frames as a single
/// channel-stacked observation.
///
/// On `reset` the fresh frame is replicated K times to fill the window; on
/// `step` the new frame is appended and the oldest evicted. The most recent
/// proprioceptive reading is kept alongside when the inner environment
/// provides one (joint positions or end-effector pose), but it is never
/// stacked, simply overwritten each step.
///
/// Frames are contiguous CHW byte arrays, so concatenation along the
/// channel axis is a plain byte append and the composite camera shape is
/// `(K * base_channels, H, W)`.
pub struct FrameStack<E: Env> {
    env: E,
    k: usize,
    frames: VecDeque<Vec<u8>>,
    robot_state: Option<Vec<f32>>,
    obs_space: ObservationSpace,
}

impl<E: Env> FrameStack<E> {
    /// Wraps `env`, stacking the last `k` camera frames.
    pub fn new(env: E, k: usize) -> Self {
        assert!(k > 0, "frame stack depth must be positive");
        let inner = env.observation_space();
        let obs_space = ObservationSpace {
            camera: [k * inner.camera[0], inner.camera[1], inner.camera[2]],
            proprioception: inner.proprioception,
        };

        Self {
            env,
            k,
            frames: VecDeque::with_capacity(k),
            robot_state: None,
            obs_space,
        }
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    fn record_frame(&mut self, obs: Obs) {
        if self.env.observation_type().has_robot_state() {
            self.robot_state = obs.proprio;
        }
        if self.frames.len() == self.k {
            self.frames.pop_front();
        }
        self.frames.push_back(obs.camera);
    }

    /// Builds the composite observation from the current window.
    ///
    /// Calling this with a partially filled window is a programming error.
    fn compose(&self) -> Obs {
        assert_eq!(
            self.frames.len(),
            self.k,
            "frame window not fully populated"
        );
        let mut camera = Vec::with_capacity(self.obs_space.camera_len());
        for frame in self.frames.iter() {
            camera.extend_from_slice(frame);
        }
        Obs {
            camera,
            proprio: self.robot_state.clone(),
        }
    }
}

impl<E: Env> Env for FrameStack<E> {
    fn reset(&mut self) -> Result<Obs> {
        let obs = self.env.reset()?;
        self.frames.clear();
        for _ in 0..self.k - 1 {
            self.frames.push_back(obs.camera.clone());
        }
        self.record_frame(obs);
        Ok(self.compose())
    }

    fn step(&mut self, action: &[f32]) -> Result<EnvStep> {
        let step = self.env.step(action)?;
        self.record_frame(step.obs);
        Ok(EnvStep {
            obs: self.compose(),
            reward: step.reward,
            done: step.done,
        })
    }

    fn observation_space(&self) -> &ObservationSpace {
        &self.obs_space
    }

    fn action_space(&self) -> &ActionSpace {
        self.env.action_space()
    }

    fn observation_type(&self) -> ObservationType {
        self.env.observation_type()
    }

    fn max_episode_steps(&self) -> usize {
        MAX_EPISODE_STEPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{ScriptedEnv, ScriptedEnvConfig};

    fn scripted(proprio: bool) -> ScriptedEnv {
        ScriptedEnv::new(ScriptedEnvConfig {
            camera: [1, 2, 2],
            proprioception: if proprio { Some(3) } else { None },
            action_dim: 2,
            episode_len: 10,
            ..Default::default()
        })
    }

    #[test]
    fn reset_fills_window_with_identical_frames() -> Result<()> {
        let mut env = FrameStack::new(scripted(false), 3);
        let obs = env.reset()?;
        assert_eq!(obs.camera.len(), 3 * 4);
        let (a, rest) = obs.camera.split_at(4);
        let (b, c) = rest.split_at(4);
        assert_eq!(a, b);
        assert_eq!(b, c);
        Ok(())
    }

    #[test]
    fn step_appends_and_evicts_oldest() -> Result<()> {
        let mut env = FrameStack::new(scripted(false), 3);
        let reset_obs = env.reset()?;
        let reset_frame = reset_obs.camera[0..4].to_vec();

        let step = env.step(&[0.0, 0.0])?;
        // Window is now [reset, reset, new]; the oldest copy dropped out.
        assert_eq!(&step.obs.camera[0..4], &reset_frame[..]);
        assert_eq!(&step.obs.camera[4..8], &reset_frame[..]);
        assert_ne!(&step.obs.camera[8..12], &reset_frame[..]);

        let newest = step.obs.camera[8..12].to_vec();
        let step2 = env.step(&[0.0, 0.0])?;
        assert_eq!(&step2.obs.camera[0..4], &reset_frame[..]);
        assert_eq!(&step2.obs.camera[4..8], &newest[..]);
        Ok(())
    }

    #[test]
    fn observation_space_is_channel_stacked() {
        let env = FrameStack::new(scripted(true), 3);
        assert_eq!(env.observation_space().camera, [3, 2, 2]);
        assert_eq!(env.observation_space().proprioception, Some(3));
        assert_eq!(env.max_episode_steps(), 300);
    }

    #[test]
    fn robot_state_is_overwritten_not_stacked() -> Result<()> {
        let mut env = FrameStack::new(scripted(true), 2);
        let obs = env.reset()?;
        let initial = obs.proprio.clone().unwrap();
        assert_eq!(initial.len(), 3);

        let step = env.step(&[0.0, 0.0])?;
        let latest = step.obs.proprio.unwrap();
        assert_eq!(latest.len(), 3);
        assert_ne!(latest, initial);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "not fully populated")]
    fn composing_before_reset_panics() {
        let env = FrameStack::new(scripted(false), 3);
        let _ = env.compose();
    }
}
