use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Environment, Step};
use crate::error::{Result, SisyphusError};

const MIN_POSITION: f32 = -1.2;
const MAX_POSITION: f32 = 0.6;
const MAX_SPEED: f32 = 0.07;
const GOAL_POSITION: f32 = 0.5;
const GOAL_VELOCITY: f32 = 0.0;
const FORCE: f32 = 0.001;
const GRAVITY: f32 = 0.0025;

/// The classic under-powered car in a valley.
///
/// Actions: 0 = push left, 1 = no push, 2 = push right. Every step costs -1
/// and the episode ends when the car reaches the flag on the right hill.
/// There is no built-in step limit; the training loop enforces its own cap.
#[derive(Clone, Debug)]
pub struct MountainCar {
    position: f32,
    velocity: f32,
    rng: StdRng,
}

impl MountainCar {
    pub fn new(seed: u64) -> Self {
        MountainCar {
            position: -0.5,
            velocity: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    fn state(&self) -> Array1<f32> {
        array![self.position, self.velocity]
    }
}

impl Environment for MountainCar {
    fn state_size(&self) -> usize {
        2
    }

    fn num_actions(&self) -> usize {
        3
    }

    fn reset(&mut self) -> Array1<f32> {
        self.position = self.rng.gen_range(-0.6..-0.4);
        self.velocity = 0.0;
        self.state()
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= self.num_actions() {
            return Err(SisyphusError::InvalidAction {
                action,
                max_actions: self.num_actions(),
            });
        }

        self.velocity += (action as f32 - 1.0) * FORCE - GRAVITY * (3.0 * self.position).cos();
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        self.position = (self.position + self.velocity).clamp(MIN_POSITION, MAX_POSITION);
        if self.position <= MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }

        let done = self.position >= GOAL_POSITION && self.velocity >= GOAL_VELOCITY;

        Ok(Step {
            next_state: self.state(),
            reward: -1.0,
            done,
        })
    }
}
