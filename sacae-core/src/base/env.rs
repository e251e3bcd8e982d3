//! Environment.
use super::{ActionSpace, ObservationSpace, ObservationType};
use anyhow::Result;

/// A composite observation as emitted by an environment.
///
/// The camera image is stored contiguously in channels-height-width order,
/// which makes channel-axis concatenation of frames a plain byte append.
#[derive(Clone, Debug, PartialEq)]
pub struct Obs {
    /// Camera image (or frame stack), `u8` pixels, CHW layout.
    pub camera: Vec<u8>,

    /// Proprioceptive robot state, present only if the environment's
    /// observation configuration includes it.
    pub proprio: Option<Vec<f32>>,
}

/// The result of one environment step.
#[derive(Clone, Debug)]
pub struct EnvStep {
    /// Observation after the step.
    pub obs: Obs,

    /// Reward for the step.
    pub reward: f32,

    /// Whether the episode terminated at this step.
    pub done: bool,
}

/// Represents an environment, typically the simulated robot arm.
///
/// The implementation of the physics is an external collaborator; this
/// trait is the seam the trainer, the evaluator and the [`FrameStack`]
/// wrapper operate through.
///
/// [`FrameStack`]: crate::FrameStack
pub trait Env {
    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Obs>;

    /// Applies an action and returns the resulting transition.
    fn step(&mut self, action: &[f32]) -> Result<EnvStep>;

    /// Shapes of the observation components.
    fn observation_space(&self) -> &ObservationSpace;

    /// Bounds of the action space.
    fn action_space(&self) -> &ActionSpace;

    /// Which observation channels are active.
    fn observation_type(&self) -> ObservationType;

    /// Fixed episode step horizon. Episodes ending exactly at this step are
    /// treated as truncated rather than terminal for bootstrapping.
    fn max_episode_steps(&self) -> usize;
}
