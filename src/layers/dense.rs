use ndarray::{Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand::Rng;
use serde::{Serialize, Deserialize};
use crate::activations::Activation;
use crate::error::{Result, SisyphusError};
use super::initialization::WeightInit;

/// A fully connected (dense) layer in a neural network
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation_output: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl DenseLayer {
    /// Create a new dense layer whose weights are drawn with `init` from `rng`.
    pub fn new_with_init<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        let weights = init.initialize_weights((input_size, output_size), rng);
        let biases = init.initialize_biases(output_size, rng);
        DenseLayer {
            weights,
            biases,
            activation,
            pre_activation_output: None,
            inputs: None,
        }
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(SisyphusError::dimension_mismatch(
                format!("{:?}", self.weights.dim()),
                format!("{:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.dim() != self.biases.dim() {
            return Err(SisyphusError::dimension_mismatch(
                format!("{}", self.biases.len()),
                format!("{}", biases.len()),
            ));
        }
        self.biases = biases;
        Ok(self)
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Forward pass without caching anything for backpropagation.
    pub fn infer_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_inputs(inputs)?;
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.activation.apply_batch(&mut outputs);
        Ok(outputs)
    }

    /// Forward pass that keeps the inputs and pre-activations for `backward_batch`.
    pub fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_inputs(inputs)?;
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.pre_activation_output = Some(outputs.clone());
        self.activation.apply_batch(&mut outputs);
        Ok(outputs)
    }

    /// Returns `(adjusted_error, weight_gradients, bias_gradients)` for a batch of
    /// errors w.r.t. this layer's outputs.
    pub fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Result<(Array2<f32>, Array2<f32>, Array1<f32>)> {
        let (pre_activation_output, inputs) = match (&self.pre_activation_output, &self.inputs) {
            (Some(pre), Some(inputs)) => (pre, inputs),
            _ => {
                return Err(SisyphusError::NumericalError(
                    "forward_batch() must be called before backward_batch()".to_string(),
                ))
            }
        };
        if output_errors.dim() != pre_activation_output.dim() {
            return Err(SisyphusError::dimension_mismatch(
                format!("{:?}", pre_activation_output.dim()),
                format!("{:?}", output_errors.dim()),
            ));
        }

        let activation_deriv = self.activation.derivative_batch(pre_activation_output.view());
        let adjusted_error = &output_errors * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));

        Ok((adjusted_error, weight_gradients, bias_gradients))
    }

    fn check_inputs(&self, inputs: ArrayView2<f32>) -> Result<()> {
        if inputs.ncols() != self.input_size() {
            return Err(SisyphusError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", inputs.ncols()),
            ));
        }
        Ok(())
    }
}
