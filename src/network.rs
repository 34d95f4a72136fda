use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::agent::traits::QFunction;
use crate::error::{Result, SisyphusError};
use crate::layers::{DenseLayer, WeightInit};
use crate::loss::{Loss, MSE};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward network of dense layers trained with mean squared error.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
    pub learning_rate: f32,
}

impl NeuralNetwork {
    /// Create a new neural network with the given layer sizes, activations, and optimizer.
    /// `layer_sizes` includes the input and output widths, so it must be one longer
    /// than `activations`.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        init: WeightInit,
        optimizer: OptimizerWrapper,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(SisyphusError::invalid_parameter(
                "layer_sizes",
                "must contain at least an input and an output size",
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(SisyphusError::invalid_parameter(
                "activations".to_string(),
                format!("expected {} activations, got {}", layer_sizes.len() - 1, activations.len()),
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(SisyphusError::invalid_parameter("layer_sizes", "every layer needs at least one unit"));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| DenseLayer::new_with_init(window[0], window[1], activation, init, rng))
            .collect::<Vec<_>>();

        Ok(NeuralNetwork { layers, optimizer, learning_rate })
    }

    /// The Q-network shape: ReLU on every hidden layer and a linear output with
    /// one unit per action.
    pub fn q_network<R: Rng + ?Sized>(
        state_size: usize,
        hidden_sizes: &[usize],
        num_actions: usize,
        optimizer: OptimizerWrapper,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let mut layer_sizes = Vec::with_capacity(hidden_sizes.len() + 2);
        layer_sizes.push(state_size);
        layer_sizes.extend_from_slice(hidden_sizes);
        layer_sizes.push(num_actions);

        let mut activations = vec![Activation::Relu; hidden_sizes.len()];
        activations.push(Activation::Linear);

        Self::new(&layer_sizes, &activations, WeightInit::XavierUniform, optimizer, learning_rate, rng)
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    /// Perform a forward pass for a single input vector.
    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Perform a forward pass for a batch of input vectors (one per row).
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut current_output = inputs.to_owned();
        for layer in &self.layers {
            current_output = layer.infer_batch(current_output.view())?;
        }
        Ok(current_output)
    }

    fn forward_train(&mut self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut current_output = inputs.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_batch(current_output.view())?;
        }
        Ok(current_output)
    }

    fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Result<Vec<(Array2<f32>, Array1<f32>)>> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors.to_owned();

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) = layer.backward_batch(current_error.view())?;
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        Ok(gradients)
    }

    /// One gradient step on the MSE between the network outputs and `targets`.
    /// Returns the loss measured before the parameters move.
    pub fn train_minibatch(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<f32> {
        if inputs.nrows() != targets.nrows() || targets.ncols() != self.output_size() {
            return Err(SisyphusError::dimension_mismatch(
                format!("targets of shape ({}, {})", inputs.nrows(), self.output_size()),
                format!("{:?}", targets.dim()),
            ));
        }

        let outputs = self.forward_train(inputs)?;
        let loss = MSE.compute_batch(outputs.view(), targets);
        if !loss.is_finite() {
            return Err(SisyphusError::NumericalError(format!("loss diverged to {}", loss)));
        }

        let output_errors = MSE.gradient_batch(outputs.view(), targets);
        let gradients = self.backward_batch(output_errors.view())?;

        let learning_rate = self.learning_rate;
        self.optimizer.begin_step();
        for (index, (layer, (weight_gradients, bias_gradients))) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(index, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(index, &mut layer.biases, &bias_gradients, learning_rate);
        }

        Ok(loss)
    }
}

impl QFunction for NeuralNetwork {
    fn state_size(&self) -> usize {
        self.input_size()
    }

    fn num_actions(&self) -> usize {
        self.output_size()
    }

    fn predict(&mut self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.forward(state)
    }

    fn update(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<f32> {
        self.train_minibatch(states, targets)
    }
}
