use ndarray::{Array1, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::traits::QFunction;
use crate::config::DqnConfig;
use crate::error::{Result, SisyphusError};
use crate::network::NeuralNetwork;
use crate::optimizer::{Adam, OptimizerWrapper};
use crate::replay_buffer::{Experience, ReplayBuffer};

/// Deep Q-learning agent with uniform experience replay.
///
/// The same approximator produces both the current estimates and the
/// bootstrapped next-state values; there is no separate target network.
/// Learning is gated on a full replay buffer, and every sampled experience is
/// applied as its own single-row gradient step.
///
/// # Example
///
/// ```rust
/// use sisyphus::agent::DqnAgentBuilder;
/// use sisyphus::network::NeuralNetwork;
/// use sisyphus::optimizer::{OptimizerWrapper, Adam};
/// use sisyphus::replay_buffer::Experience;
/// use ndarray::array;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let network = NeuralNetwork::q_network(
///     2, &[16, 16], 3, OptimizerWrapper::Adam(Adam::default()), 0.001, &mut rng,
/// ).unwrap();
/// let mut agent = DqnAgentBuilder::new()
///     .buffer_capacity(4)
///     .batch_size(2)
///     .seed(7)
///     .build(network)
///     .unwrap();
///
/// let state = array![-0.5, 0.0];
/// let action = agent.act(state.view()).unwrap();
/// agent.observe(Experience {
///     state: state.clone(),
///     action,
///     reward: -1.0,
///     next_state: array![-0.49, 0.001],
///     done: false,
/// });
///
/// // Nothing happens until the buffer is full
/// assert_eq!(agent.learn().unwrap(), None);
/// ```
pub struct DqnAgent<Q: QFunction = NeuralNetwork> {
    q_function: Q,
    buffer: ReplayBuffer,
    epsilon: f32,
    epsilon_min: f32,
    epsilon_max: f32,
    epsilon_decay: f32,
    gamma: f32,
    batch_size: usize,
    train_steps: usize,
    rng: StdRng,
}

/// Copy of the current prediction for `state` with the taken action's slot
/// replaced by the one-step target.
fn bootstrap_target<Q: QFunction>(q_function: &mut Q, experience: &Experience, gamma: f32) -> Result<Array1<f32>> {
    let num_actions = q_function.num_actions();
    if experience.action >= num_actions {
        return Err(SisyphusError::InvalidAction {
            action: experience.action,
            max_actions: num_actions,
        });
    }

    let target_value = if experience.done {
        experience.reward
    } else {
        experience.reward + gamma * q_function.max_value(experience.next_state.view())?
    };

    let mut target = q_function.predict(experience.state.view())?;
    if target.len() != num_actions {
        return Err(SisyphusError::dimension_mismatch(
            format!("{} action values", num_actions),
            format!("{} action values", target.len()),
        ));
    }
    target[experience.action] = target_value;
    Ok(target)
}

/// Index of the first maximal entry.
fn argmax(values: ArrayView1<f32>) -> Result<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            return Err(SisyphusError::NumericalError(format!("action value {} is NaN", index)));
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
        .ok_or_else(|| SisyphusError::NumericalError("No action values to choose from".to_string()))
}

impl<Q: QFunction> DqnAgent<Q> {
    /// Select an action with the epsilon-greedy policy.
    pub fn act(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        let state_size = self.q_function.state_size();
        if state.len() != state_size {
            return Err(SisyphusError::dimension_mismatch(
                format!("state of length {}", state_size),
                format!("state of length {}", state.len()),
            ));
        }

        if self.rng.gen::<f32>() < self.epsilon {
            Ok(self.rng.gen_range(0..self.q_function.num_actions()))
        } else {
            let q_values = self.q_function.predict(state)?;
            argmax(q_values.view())
        }
    }

    /// Store a transition. Never triggers learning on its own.
    pub fn observe(&mut self, experience: Experience) {
        self.buffer.add(experience);
    }

    /// The regression target the agent would train `experience` towards right now.
    pub fn compute_target(&mut self, experience: &Experience) -> Result<Array1<f32>> {
        bootstrap_target(&mut self.q_function, experience, self.gamma)
    }

    /// Runs one learning step if the replay buffer is full.
    ///
    /// Returns `Ok(None)` without touching the approximator or the exploration
    /// rate while the buffer is still filling, otherwise the mean loss over the
    /// sampled mini-batch.
    pub fn learn(&mut self) -> Result<Option<f32>> {
        if !self.buffer.is_full() {
            return Ok(None);
        }

        let batch = self.buffer.sample(self.batch_size, &mut self.rng);
        if batch.is_empty() {
            return Err(SisyphusError::EmptyBuffer("No experiences to train on".to_string()));
        }

        let mut total_loss = 0.0;
        for experience in &batch {
            let target = bootstrap_target(&mut self.q_function, experience, self.gamma)?;
            let states = experience.state.view().insert_axis(Axis(0));
            let targets = target.view().insert_axis(Axis(0));
            total_loss += self.q_function.update(states, targets)?;
        }
        let mean_loss = total_loss / batch.len() as f32;

        self.decay_epsilon();
        self.train_steps += 1;
        tracing::trace!(step = self.train_steps, loss = mean_loss, epsilon = self.epsilon, "learning step");

        Ok(Some(mean_loss))
    }

    fn decay_epsilon(&mut self) {
        if self.epsilon > self.epsilon_min {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Overrides the exploration rate, clamped to the configured bounds.
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(self.epsilon_min, self.epsilon_max);
    }

    pub fn epsilon_bounds(&self) -> (f32, f32) {
        (self.epsilon_min, self.epsilon_max)
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of learning steps actually executed
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn q_function(&self) -> &Q {
        &self.q_function
    }

    pub fn q_function_mut(&mut self) -> &mut Q {
        &mut self.q_function
    }
}

impl DqnAgent<NeuralNetwork> {
    /// Builds the Adam-trained Q-network and the agent described by `config`.
    pub fn from_config(config: &DqnConfig, state_size: usize, num_actions: usize) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = NeuralNetwork::q_network(
            state_size,
            &config.hidden_sizes,
            num_actions,
            OptimizerWrapper::Adam(Adam::default()),
            config.learning_rate,
            &mut rng,
        )?;
        DqnAgentBuilder::from_config(config).rng(rng).build(network)
    }
}

/// Builder pattern for DqnAgent
pub struct DqnAgentBuilder {
    gamma: f32,
    epsilon_max: f32,
    epsilon_min: f32,
    epsilon_decay: f32,
    buffer_capacity: usize,
    batch_size: usize,
    rng: Option<StdRng>,
    seed: u64,
}

impl DqnAgentBuilder {
    pub fn new() -> Self {
        let defaults = DqnConfig::default();
        DqnAgentBuilder {
            gamma: defaults.discount_factor,
            epsilon_max: defaults.epsilon_max,
            epsilon_min: defaults.epsilon_min,
            epsilon_decay: defaults.epsilon_decay,
            buffer_capacity: defaults.buffer_capacity,
            batch_size: defaults.batch_size,
            rng: None,
            seed: defaults.seed,
        }
    }

    pub fn from_config(config: &DqnConfig) -> Self {
        DqnAgentBuilder {
            gamma: config.discount_factor,
            epsilon_max: config.epsilon_max,
            epsilon_min: config.epsilon_min,
            epsilon_decay: config.epsilon_decay,
            buffer_capacity: config.buffer_capacity,
            batch_size: config.batch_size,
            rng: None,
            seed: config.seed,
        }
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn epsilon_bounds(mut self, min: f32, max: f32) -> Self {
        self.epsilon_min = min;
        self.epsilon_max = max;
        self
    }

    pub fn epsilon_decay(mut self, decay: f32) -> Self {
        self.epsilon_decay = decay;
        self
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = None;
        self
    }

    /// Continue from an already advanced generator instead of seeding a new one.
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build<Q: QFunction>(self, q_function: Q) -> Result<DqnAgent<Q>> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(SisyphusError::invalid_parameter("gamma".to_string(), format!("{} is outside [0, 1]", self.gamma)));
        }
        if !(0.0 <= self.epsilon_min && self.epsilon_min <= self.epsilon_max && self.epsilon_max <= 1.0) {
            return Err(SisyphusError::invalid_parameter(
                "epsilon",
                "bounds must satisfy 0 <= min <= max <= 1",
            ));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(SisyphusError::invalid_parameter("epsilon_decay", "must be in (0, 1]"));
        }
        if self.buffer_capacity == 0 {
            return Err(SisyphusError::invalid_parameter("buffer_capacity", "must be positive"));
        }
        if self.batch_size == 0 || self.batch_size > self.buffer_capacity {
            return Err(SisyphusError::invalid_parameter(
                "batch_size".to_string(),
                format!("{} must be in 1..={}", self.batch_size, self.buffer_capacity),
            ));
        }
        if q_function.num_actions() == 0 {
            return Err(SisyphusError::invalid_parameter("q_function", "must expose at least one action"));
        }

        Ok(DqnAgent {
            q_function,
            buffer: ReplayBuffer::new(self.buffer_capacity),
            epsilon: self.epsilon_max,
            epsilon_min: self.epsilon_min,
            epsilon_max: self.epsilon_max,
            epsilon_decay: self.epsilon_decay,
            gamma: self.gamma,
            batch_size: self.batch_size,
            train_steps: 0,
            rng: self.rng.unwrap_or_else(|| StdRng::seed_from_u64(self.seed)),
        })
    }
}

impl Default for DqnAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
