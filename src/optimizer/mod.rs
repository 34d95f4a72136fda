//! # Optimizers
//!
//! First-order update rules applied layer by layer. Every update carries the
//! index of the layer it belongs to so stateful optimizers (Adam) keep one set
//! of moment estimates per layer.

use ndarray::{Array1, Array2, Dimension};
use serde::{Serialize, Deserialize};

pub trait Optimizer {
    /// Called once before the layer updates of a single gradient step.
    fn begin_step(&mut self) {}

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with bias-corrected moment estimates.
///
/// Moment buffers are allocated lazily the first time a layer index is seen,
/// so the optimizer can be built before the network it trains.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    /// Number of gradient steps taken so far
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }

    fn correction(&self) -> (f32, f32) {
        let t = self.t.max(1);
        (1.0 - self.beta1.powi(t), 1.0 - self.beta2.powi(t))
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

/// Makes sure `slots[layer]` exists with the shape of `like`.
fn ensure_slot<D: Dimension>(slots: &mut Vec<ndarray::Array<f32, D>>, layer: usize, like: &ndarray::Array<f32, D>) {
    while slots.len() <= layer {
        slots.push(ndarray::Array::zeros(like.raw_dim()));
    }
    if slots[layer].shape() != like.shape() {
        slots[layer] = ndarray::Array::zeros(like.raw_dim());
    }
}

fn adam_update<D: Dimension>(
    params: &mut ndarray::Array<f32, D>,
    gradients: &ndarray::Array<f32, D>,
    m: &mut ndarray::Array<f32, D>,
    v: &mut ndarray::Array<f32, D>,
    (beta1, beta2, epsilon): (f32, f32, f32),
    (bias1, bias2): (f32, f32),
    learning_rate: f32,
) {
    m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
    v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

    ndarray::Zip::from(params)
        .and(&*m)
        .and(&*v)
        .for_each(|p, &m, &v| {
            let m_hat = m / bias1;
            let v_hat = v / bias2;
            *p -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
        });
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        ensure_slot(&mut self.m_weights, layer, weights);
        ensure_slot(&mut self.v_weights, layer, weights);
        let hyper = (self.beta1, self.beta2, self.epsilon);
        let correction = self.correction();
        adam_update(
            weights,
            gradients,
            &mut self.m_weights[layer],
            &mut self.v_weights[layer],
            hyper,
            correction,
            learning_rate,
        );
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        ensure_slot(&mut self.m_biases, layer, biases);
        ensure_slot(&mut self.v_biases, layer, biases);
        let hyper = (self.beta1, self.beta2, self.epsilon);
        let correction = self.correction();
        adam_update(
            biases,
            gradients,
            &mut self.m_biases[layer],
            &mut self.v_biases[layer],
            hyper,
            correction,
            learning_rate,
        );
    }
}
