//! Run configuration.
//!
//! Every hyperparameter of a training run lives in [`DqnConfig`]. The defaults
//! reproduce the classic MountainCar setup; a JSON file can override any subset
//! of fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SisyphusError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    /// Weight of the bootstrapped next-state value in the target
    pub discount_factor: f32,
    /// Adam step size
    pub learning_rate: f32,
    /// Widths of the hidden layers
    pub hidden_sizes: Vec<usize>,
    /// Replay capacity; learning starts once it is full
    pub buffer_capacity: usize,
    /// Experiences per learning step
    pub batch_size: usize,
    pub epsilon_max: f32,
    pub epsilon_min: f32,
    /// Multiplicative decay applied after every learning step
    pub epsilon_decay: f32,
    /// Hard cap on the steps of a single episode
    pub max_episode_steps: usize,
    /// Wall-clock budget for the whole run
    pub time_budget_secs: u64,
    /// Optional cap on the number of episodes
    pub max_episodes: Option<usize>,
    /// Number of recent episode scores averaged by the stopping rule
    pub score_window: usize,
    /// The run stops as soon as the window mean drops below this value
    pub stop_below_mean: f32,
    /// Score pushed into the window before the first episode
    pub window_sentinel: Option<f32>,
    /// Seed for the agent and the environment
    pub seed: u64,
    pub model_dir: PathBuf,
    pub graph_dir: PathBuf,
}

impl Default for DqnConfig {
    fn default() -> Self {
        DqnConfig {
            discount_factor: 0.95,
            learning_rate: 0.001,
            hidden_sizes: vec![30, 30],
            buffer_capacity: 50_000,
            batch_size: 32,
            epsilon_max: 1.0,
            epsilon_min: 0.001,
            epsilon_decay: 0.997,
            max_episode_steps: 10_000,
            time_budget_secs: 120 * 60,
            max_episodes: None,
            score_window: 30,
            stop_below_mean: 200.0,
            window_sentinel: Some(10_000.0),
            seed: 1,
            model_dir: PathBuf::from("save_model"),
            graph_dir: PathBuf::from("save_graph"),
        }
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> SisyphusError {
    SisyphusError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

impl DqnConfig {
    /// Reads a JSON config; missing fields fall back to the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: DqnConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_secs(self.time_budget_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(invalid("discount_factor", format!("{} is outside [0, 1]", self.discount_factor)));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(invalid("learning_rate", "must be a positive finite number"));
        }
        if self.hidden_sizes.is_empty() || self.hidden_sizes.contains(&0) {
            return Err(invalid("hidden_sizes", "needs at least one hidden layer and no zero widths"));
        }
        if self.buffer_capacity == 0 {
            return Err(invalid("buffer_capacity", "must be positive"));
        }
        if self.batch_size == 0 || self.batch_size > self.buffer_capacity {
            return Err(invalid(
                "batch_size",
                format!("{} must be in 1..={}", self.batch_size, self.buffer_capacity),
            ));
        }
        if !(0.0 <= self.epsilon_min && self.epsilon_min <= self.epsilon_max && self.epsilon_max <= 1.0) {
            return Err(invalid("epsilon", "bounds must satisfy 0 <= epsilon_min <= epsilon_max <= 1"));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(invalid("epsilon_decay", format!("{} is outside (0, 1]", self.epsilon_decay)));
        }
        if self.max_episode_steps == 0 {
            return Err(invalid("max_episode_steps", "must be positive"));
        }
        if self.score_window == 0 {
            return Err(invalid("score_window", "must be positive"));
        }
        Ok(())
    }

    /// Creates the model and graph directories if they are missing.
    pub fn prepare_output_dirs(&self) -> Result<()> {
        for dir in [&self.model_dir, &self.graph_dir] {
            if !dir.is_dir() {
                fs::create_dir_all(dir)?;
                tracing::debug!(path = %dir.display(), "created output directory");
            }
        }
        Ok(())
    }
}
