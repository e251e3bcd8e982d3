//! Sampled transition batches.

/// A batch of transitions sampled from the [`ReplayBuffer`].
///
/// All fields are contiguous row-major arrays of `batch_size` rows. Camera
/// pixels are converted to `f32` at sampling time (network input);
/// actions, rewards and not-done flags keep their stored type. The
/// proprioception fields are `None` exactly when the buffer was built
/// without a proprioception component.
///
/// [`ReplayBuffer`]: super::ReplayBuffer
#[derive(Clone, Debug)]
pub struct Batch {
    /// Camera observations, `batch_size * camera_len` elements.
    pub obs_camera: Vec<f32>,

    /// Proprioceptive observations, `batch_size * proprio_len` elements.
    pub obs_proprio: Option<Vec<f32>>,

    /// Actions, `batch_size * action_dim` elements.
    pub actions: Vec<f32>,

    /// Rewards, one per row.
    pub rewards: Vec<f32>,

    /// Next camera observations.
    pub next_camera: Vec<f32>,

    /// Next proprioceptive observations.
    pub next_proprio: Option<Vec<f32>>,

    /// Not-done flags in `{0.0, 1.0}`, one per row. `1.0` unless the
    /// episode terminated naturally before the step-limit horizon.
    pub not_dones: Vec<f32>,
}

impl Batch {
    /// Number of rows in the batch.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Returns if the batch holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}
