//! Training entry point.
//!
//! Wires the frame-stacked environment, the replay buffer, the recorder,
//! the evaluator and the trainer together and runs the training loop. The
//! neural SAC-AE agent and the robot simulator are external collaborators;
//! this binary plugs in the deterministic stand-ins so the full pipeline
//! can be exercised end to end.
use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use sacae_core::{
    dummy::{RandomAgent, ScriptedEnv, ScriptedEnvConfig},
    record::{NullRecorder, Recorder},
    util::{make_dir, RngSeeds},
    Env, Evaluator, FrameStack, ReplayBuffer, ReplayBufferConfig, Trainer, TrainerConfig,
};
use sacae_tensorboard::TensorboardRecorder;
use serde::Serialize;
use std::{fs::File, path::Path};

/// Delta end-effector pose with impedance gains.
const ACTION_DIM: usize = 6;
const EPISODE_HORIZON: usize = 300;

#[derive(Parser, Debug, Serialize)]
#[command(version, about)]
struct Args {
    // environment
    #[arg(long, default_value = "panda")]
    domain_name: String,
    #[arg(long, default_value = "peg_in_hole")]
    task_name: String,
    #[arg(long, default_value_t = 128)]
    image_size: usize,
    #[arg(long, default_value_t = 1)]
    action_repeat: usize,
    #[arg(long, default_value_t = 3)]
    frame_stack: usize,
    #[arg(long, default_value = "sac_ae")]
    agent: String,

    // critic
    #[arg(long, default_value_t = 1e-3)]
    critic_lr: f64,
    #[arg(long, default_value_t = 0.9)]
    critic_beta: f64,
    #[arg(long, default_value_t = 0.01)]
    critic_tau: f64,
    #[arg(long, default_value_t = 2)]
    critic_target_update_freq: usize,

    // actor
    #[arg(long, default_value_t = 1e-3)]
    actor_lr: f64,
    #[arg(long, default_value_t = 0.9)]
    actor_beta: f64,
    #[arg(long, default_value_t = -10.0)]
    actor_log_std_min: f64,
    #[arg(long, default_value_t = 2.0)]
    actor_log_std_max: f64,
    #[arg(long, default_value_t = 2)]
    actor_update_freq: usize,

    // encoder/decoder
    #[arg(long, default_value = "pixel")]
    encoder_type: String,
    #[arg(long, default_value_t = 122)]
    encoder_feature_dim: usize,
    #[arg(long, default_value_t = 1e-3)]
    encoder_lr: f64,
    #[arg(long, default_value_t = 0.05)]
    encoder_tau: f64,
    #[arg(long, default_value = "pixel")]
    decoder_type: String,
    #[arg(long, default_value_t = 1e-3)]
    decoder_lr: f64,
    #[arg(long, default_value_t = 1)]
    decoder_update_freq: usize,
    #[arg(long, default_value_t = 1e-6)]
    decoder_latent_lambda: f64,
    #[arg(long, default_value_t = 1e-7)]
    decoder_weight_lambda: f64,
    #[arg(long, default_value_t = 4)]
    num_layers: usize,
    #[arg(long, default_value_t = 32)]
    num_filters: usize,

    // sac
    #[arg(long, default_value_t = 0.99)]
    discount: f64,
    #[arg(long, default_value_t = 0.1)]
    init_temperature: f64,
    #[arg(long, default_value_t = 1e-4)]
    alpha_lr: f64,
    #[arg(long, default_value_t = 0.5)]
    alpha_beta: f64,

    // replay buffer
    #[arg(long, default_value_t = 100_000)]
    replay_buffer_capacity: usize,

    // train
    #[arg(long, default_value_t = 1000)]
    init_steps: usize,
    #[arg(long, default_value_t = 100_000)]
    num_train_steps: usize,
    #[arg(long, default_value_t = 128)]
    batch_size: usize,
    #[arg(long, default_value_t = 1024)]
    hidden_dim: usize,

    // eval
    #[arg(long, default_value_t = 10_000)]
    eval_freq: usize,
    #[arg(long, default_value_t = 10)]
    num_eval_episodes: usize,

    // save
    #[arg(long, default_value_t = false)]
    save_tb: bool,
    #[arg(long, default_value_t = false)]
    save_model: bool,
    #[arg(long, default_value_t = false)]
    save_buffer: bool,
    #[arg(long, default_value_t = false)]
    save_video: bool,

    // misc
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, default_value = ".")]
    work_dir: String,
}

fn create_env(args: &Args, seed: u64) -> ScriptedEnv {
    ScriptedEnv::new(ScriptedEnvConfig {
        camera: [3, args.image_size, args.image_size],
        proprioception: None,
        action_dim: ACTION_DIM,
        episode_len: EPISODE_HORIZON,
        seed,
        ..Default::default()
    })
}

fn run<E: Env>(env: &mut E, args: &Args, seeds: RngSeeds, work_dir: &Path) -> Result<()> {
    let model_dir = make_dir(work_dir.join("model"))?;
    let buffer_dir = make_dir(work_dir.join("buffer"))?;
    make_dir(work_dir.join("video"))?;

    let mut agent = match args.agent.as_str() {
        "sac_ae" => RandomAgent::new(ACTION_DIM, seeds.agent),
        _ => bail!("agent is not supported: {}", args.agent),
    };

    let buffer_config = ReplayBufferConfig::default()
        .capacity(args.replay_buffer_capacity)
        .seed(seeds.buffer);
    let mut buffer = ReplayBuffer::new(env.observation_space(), ACTION_DIM, &buffer_config);

    let mut trainer_config = TrainerConfig::default()
        .num_train_steps(args.num_train_steps)
        .init_steps(args.init_steps)
        .eval_freq(args.eval_freq)
        .seed(seeds.action);
    if args.save_model {
        trainer_config = trainer_config.model_dir(model_dir);
    }
    if args.save_buffer {
        trainer_config = trainer_config.buffer_dir(buffer_dir);
    }
    trainer_config.save(work_dir.join("trainer.yaml"))?;

    let recovery_action = trainer_config.recovery_action.clone();
    let mut evaluator = Evaluator::new(args.num_eval_episodes, recovery_action);
    let mut recorder: Box<dyn Recorder> = if args.save_tb {
        Box::new(TensorboardRecorder::new(work_dir.join("tb")))
    } else {
        Box::new(NullRecorder)
    };

    info!(
        "Training {} on {}/{} for {} steps",
        args.agent, args.domain_name, args.task_name, args.num_train_steps
    );

    let mut trainer = Trainer::build(trainer_config);
    trainer.train(
        env,
        &mut agent,
        &mut buffer,
        &mut evaluator,
        recorder.as_mut(),
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let seeds = RngSeeds::from_master(args.seed);

    let work_dir = make_dir(&args.work_dir)?;
    serde_json::to_writer_pretty(File::create(work_dir.join("args.json"))?, &args)?;

    if args.encoder_type == "pixel" {
        let mut env = FrameStack::new(create_env(&args, seeds.env), args.frame_stack);
        run(&mut env, &args, seeds, &work_dir)
    } else {
        let mut env = create_env(&args, seeds.env);
        run(&mut env, &args, seeds, &work_dir)
    }
}
