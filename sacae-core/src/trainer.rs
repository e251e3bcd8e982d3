//! Train an [`Agent`] on an [`Env`].
mod config;

use crate::{
    record::{Record, Recorder},
    Agent, Env, EnvStep, EvalMode, Evaluator, Obs, ReplayBuffer,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::SystemTime,
};

/// Manages the training loop.
///
/// The loop is single-threaded and fully synchronous: environment
/// stepping, buffer writes, agent updates and evaluation all run from one
/// sequential control flow, so the replay buffer has exactly one writer
/// and no concurrent readers. Per training step `t`:
///
/// 1. On an episode boundary (`done`, including the synthetic initial
///    one): flush metrics, periodically evaluate and checkpoint, log the
///    episode reward, apply a recovery nudge, reset, and zero the episode
///    counters.
/// 2. Select an action: uniform random from the action space while
///    `t < init_steps`; afterwards the stochastic policy in evaluation
///    mode, rescaled element-wise by the action-space upper bound.
/// 3. Once `t >= init_steps`, run agent updates: `init_steps` consecutive
///    calls at exactly `t == init_steps` (catching up on the warm-up
///    phase), then one call per step.
/// 4. Every `stall_window` steps, compare the episode reward against its
///    value one window ago; if it flatlined, nudge and reset the
///    environment mid-episode.
/// 5. Step the environment, correct the terminal flag at the step horizon
///    (infinite bootstrap), and push the transition into the buffer.
///
/// The loop checks a cooperative stop flag at every step boundary; see
/// [`Trainer::stop_signal`].
pub struct Trainer {
    config: TrainerConfig,
    rng: StdRng,
    stop: Arc<AtomicBool>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle that stops the training loop at the next step
    /// boundary when set.
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    fn save_model<A: Agent>(config: &TrainerConfig, agent: &A, step: usize) {
        if let Some(dir) = config.model_dir.as_ref() {
            match agent.save(dir, step) {
                Ok(()) => info!("Saved the model in {:?}", dir),
                Err(e) => warn!("Failed to save the model in {:?}: {}", dir, e),
            }
        }
    }

    fn save_buffer(config: &TrainerConfig, buffer: &mut ReplayBuffer) {
        if let Some(dir) = config.buffer_dir.as_ref() {
            match buffer.save(dir) {
                Ok(()) => info!("Saved the replay buffer in {:?}", dir),
                Err(e) => warn!("Failed to save the replay buffer in {:?}: {}", dir, e),
            }
        }
    }

    /// Runs the training loop to completion.
    pub fn train<E, A>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut ReplayBuffer,
        evaluator: &mut Evaluator,
        recorder: &mut dyn Recorder,
    ) -> Result<()>
    where
        E: Env,
        A: Agent,
    {
        let horizon = env.max_episode_steps();
        let mut obs: Option<Obs> = None;
        let mut episode: usize = 0;
        let mut episode_reward = 0f32;
        let mut episode_step: usize = 0;
        let mut prev_episode_reward = 0f32;
        let mut done = true;
        let mut start_time = SystemTime::now();

        agent.set_train(true);

        for step in 0..self.config.num_train_steps {
            if self.stop.load(Ordering::Relaxed) {
                info!("Stop signal received at step {}", step);
                break;
            }

            if done {
                if step > 0 {
                    info!(
                        "Episode {} finished at step {}: reward {:.4} over {} steps",
                        episode, step, episode_reward, episode_step
                    );
                    recorder.store(Record::from_scalar(
                        "train/duration",
                        start_time.elapsed()?.as_secs_f32(),
                    ));
                    start_time = SystemTime::now();
                    recorder.flush(step as i64);
                }

                if self.config.eval_freq > 0 && step % self.config.eval_freq == 0 && step > 0 {
                    recorder.store(Record::from_scalar("eval/episode", episode as f32));
                    let eval_reward = evaluator.evaluate(env, agent, recorder, step)?;
                    info!(
                        "Evaluation at step {}: mean episode reward {:.4}",
                        step, eval_reward
                    );
                    if self.config.save_model {
                        Self::save_model(&self.config, agent, step);
                    }
                    if self.config.save_buffer {
                        Self::save_buffer(&self.config, buffer);
                    }
                }

                recorder.store(Record::from_scalar("train/episode_reward", episode_reward));

                // Nudge before resetting so the arm does not restart
                // wedged in the hole.
                env.step(&self.config.recovery_action)?;
                obs = Some(env.reset()?);
                done = false;
                episode_reward = 0.0;
                episode_step = 0;
                episode += 1;
                recorder.store(Record::from_scalar("train/episode", episode as f32));
            }

            let action = if step < self.config.init_steps {
                env.action_space().sample(&mut self.rng)
            } else {
                let normalized = {
                    let mut agent = EvalMode::new(agent);
                    agent.sample_action(obs.as_ref().expect("observation set at episode boundary"))
                };
                scale_action(&normalized, &env.action_space().high)
            };

            if step >= self.config.init_steps {
                // Catch up on the updates skipped during warm-up, then
                // one update per environment step.
                let num_updates = if step == self.config.init_steps {
                    self.config.init_steps
                } else {
                    1
                };
                for _ in 0..num_updates {
                    agent.update(buffer, recorder, step)?;
                }
            }

            if self.config.stall_window > 0 && step % self.config.stall_window == 0 && step > 0 {
                if (prev_episode_reward - episode_reward).abs() < self.config.stall_epsilon {
                    warn!(
                        "Episode reward flatlined over {} steps; forcing a reset",
                        self.config.stall_window
                    );
                    env.step(&self.config.recovery_action)?;
                    obs = Some(env.reset()?);
                }
                // Snapshot for the next window whether or not we reset.
                prev_episode_reward = episode_reward;
            }

            let EnvStep {
                obs: next_obs,
                reward,
                done: step_done,
            } = env.step(&action)?;
            done = step_done;

            // Infinite bootstrap: an episode ending exactly at the step
            // horizon is a timeout, not a terminal state, and must keep a
            // non-zero bootstrap target.
            let terminal = done && episode_step + 1 != horizon;

            episode_reward += reward;
            buffer.add(
                obs.as_ref().expect("observation set at episode boundary"),
                &action,
                reward,
                &next_obs,
                terminal,
            );
            obs = Some(next_obs);
            episode_step += 1;
        }

        Ok(())
    }
}

fn scale_action(normalized: &[f32], high: &[f32]) -> Vec<f32> {
    normalized
        .iter()
        .zip(high.iter())
        .map(|(a, h)| a * h)
        .collect()
}
