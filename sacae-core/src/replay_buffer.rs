//! Experience replay buffer with heterogeneous observation storage.
//!
//! Transitions are kept in fixed-capacity, preallocated arenas, one per
//! field, addressed by a write cursor that wraps modulo the capacity
//! (oldest-first eviction). Camera observations are stored as raw `u8`
//! pixels and converted to `f32` only when sampled; the proprioception
//! arenas exist only if the observation space declares that component.
mod base;
mod batch;
mod config;

pub use base::ReplayBuffer;
pub use batch::Batch;
pub use config::ReplayBufferConfig;
