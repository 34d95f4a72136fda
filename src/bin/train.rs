use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sisyphus::agent::DqnAgent;
use sisyphus::config::DqnConfig;
use sisyphus::env::{Environment, MountainCar};
use sisyphus::trainer::{StopReason, Trainer};

#[derive(Parser, Debug)]
#[command(about = "Train a DQN agent on MountainCar", version)]
struct TrainArgs {
    /// JSON file overriding the default hyperparameters.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the agent and the environment.
    #[arg(long)]
    seed: Option<u64>,
    /// Wall-clock budget in minutes.
    #[arg(long)]
    time_budget_mins: Option<u64>,
    /// Stop after this many episodes.
    #[arg(long)]
    max_episodes: Option<usize>,
    /// Directory reserved for model checkpoints.
    #[arg(long)]
    model_dir: Option<PathBuf>,
    /// Directory reserved for plots.
    #[arg(long)]
    graph_dir: Option<PathBuf>,
    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

impl TrainArgs {
    fn into_config(self) -> Result<(DqnConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => DqnConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => DqnConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(minutes) = self.time_budget_mins {
            config.time_budget_secs = minutes * 60;
        }
        if self.max_episodes.is_some() {
            config.max_episodes = self.max_episodes;
        }
        if let Some(dir) = self.model_dir {
            config.model_dir = dir;
        }
        if let Some(dir) = self.graph_dir {
            config.graph_dir = dir;
        }
        config.validate()?;
        Ok((config, self.dump_config))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (config, dump_config) = TrainArgs::parse().into_config()?;
    if dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    config.prepare_output_dirs().context("failed to create output directories")?;

    let env = MountainCar::new(config.seed);
    let agent = DqnAgent::from_config(&config, env.state_size(), env.num_actions())?;
    tracing::info!(
        hidden = ?config.hidden_sizes,
        buffer = config.buffer_capacity,
        batch = config.batch_size,
        budget_secs = config.time_budget_secs,
        "starting training"
    );

    let mut trainer = Trainer::new(env, agent, &config);
    let summary = trainer.run()?;

    if let StopReason::LowAverage { episode, mean } = summary.stop_reason {
        tracing::warn!(episode, mean, threshold = config.stop_below_mean, "rolling mean below threshold, exiting");
        process::exit(1);
    }

    tracing::info!(
        episodes = summary.episodes,
        elapsed_secs = summary.elapsed.as_secs(),
        "training finished"
    );
    Ok(())
}
