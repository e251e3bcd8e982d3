#![warn(missing_docs)]
//! Core components of a training harness for pixel-based robot manipulation.
//!
//! This crate provides the pieces of a Soft Actor-Critic with autoencoder
//! (SAC-AE) training pipeline that are systems code rather than model code:
//!
//! * [`ReplayBuffer`] — a fixed-capacity circular store of transitions with
//!   heterogeneous observation storage (camera frame stacks plus optional
//!   proprioception) and chunked persistence.
//! * [`FrameStack`] — an environment wrapper maintaining a rolling window of
//!   the last K camera frames.
//! * [`Trainer`] — the step-synchronous train loop: warm-up exploration,
//!   periodic updates, episode bookkeeping, stall recovery, checkpointing.
//! * [`Evaluator`] — greedy evaluation episodes under the current policy.
//!
//! The neural networks themselves (actor/critic/encoder/decoder) and the
//! robot simulation are external collaborators behind the [`Agent`] and
//! [`Env`] traits.
pub mod dummy;
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{
    ActionSpace, Agent, Env, EnvStep, EvalMode, Obs, ObservationSpace, ObservationType,
};

mod frame_stack;
pub use frame_stack::FrameStack;

mod replay_buffer;
pub use replay_buffer::{Batch, ReplayBuffer, ReplayBufferConfig};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};

mod evaluator;
pub use evaluator::Evaluator;
