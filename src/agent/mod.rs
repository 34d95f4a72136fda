//! # Agent
//!
//! The epsilon-greedy Q-learning agent. It owns its approximator and replay
//! buffer and exposes three operations to the training loop:
//!
//! - `act` picks an action for a state
//! - `observe` stores a transition
//! - `learn` runs one replay step once the buffer is full, then decays epsilon
//!
//! The approximator sits behind [`traits::QFunction`], implemented by
//! [`crate::network::NeuralNetwork`].

pub mod traits;

mod dqn;
pub use dqn::{DqnAgent, DqnAgentBuilder};
