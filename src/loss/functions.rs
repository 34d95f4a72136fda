use ndarray::{Array2, ArrayView2};

/// Trait defining the interface for loss functions
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32;

    /// Compute the gradient of the loss w.r.t. predictions for a batch
    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32>;
}

/// Mean squared error averaged over every element of the batch.
///
/// Slots whose target equals the prediction contribute nothing, which is what
/// lets a Q-learning target carry signal for a single action only.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSE;

impl Loss for MSE {
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        (&diff * &diff).mean().unwrap_or(0.0)
    }

    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        let n = predictions.len().max(1) as f32;
        (&predictions - &targets) * (2.0 / n)
    }
}
