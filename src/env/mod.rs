//! # Environments
//!
//! The agent never sees physics, only the [`Environment`] trait: reset to an
//! initial state, then step with a discrete action.

mod mountain_car;

pub use mountain_car::MountainCar;

use ndarray::Array1;
use crate::error::Result;

/// Outcome of a single environment step
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

/// A single-agent episodic environment with a discrete action space.
pub trait Environment {
    fn state_size(&self) -> usize;

    fn num_actions(&self) -> usize;

    /// Start a new episode and return its initial state
    fn reset(&mut self) -> Array1<f32>;

    /// Apply `action` in the current episode
    fn step(&mut self, action: usize) -> Result<Step>;
}
