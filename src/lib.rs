//! # Sisyphus - Deep Q-learning for MountainCar
//!
//! Sisyphus trains a small feed-forward action-value network to drive the
//! MountainCar task with one-step Q-learning and uniform experience replay.
//!
//! ## Key Pieces
//!
//! - **Network**: dense layers with ReLU hidden activations, linear output,
//!   MSE loss and an Adam optimizer with per-layer state
//! - **Replay**: fixed-capacity FIFO buffer with uniform sampling
//! - **Agent**: epsilon-greedy action selection, multiplicative epsilon decay,
//!   learning gated on a full buffer
//! - **Trainer**: episode loop under a wall-clock budget with a rolling-mean
//!   stopping rule
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sisyphus::agent::DqnAgent;
//! use sisyphus::config::DqnConfig;
//! use sisyphus::env::{Environment, MountainCar};
//! use sisyphus::trainer::Trainer;
//!
//! let config = DqnConfig::default();
//! let env = MountainCar::new(config.seed);
//! let agent = DqnAgent::from_config(&config, env.state_size(), env.num_actions()).unwrap();
//! let mut trainer = Trainer::new(env, agent, &config);
//! let summary = trainer.run().unwrap();
//! println!("{:?}", summary.stop_reason);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - ReLU and linear activations
//! - [`agent`] - The DQN agent and the [`agent::traits::QFunction`] seam
//! - [`config`] - Run configuration
//! - [`env`] - Environment trait and the MountainCar simulator
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Mean squared error
//! - [`metrics`] - Rolling score window
//! - [`network`] - The feed-forward Q-network
//! - [`optimizer`] - SGD and Adam
//! - [`replay_buffer`] - Experience replay
//! - [`trainer`] - The training loop

pub mod activations;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod trainer;

pub use error::{Result, SisyphusError};

#[cfg(test)]
mod tests;
