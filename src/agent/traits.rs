use ndarray::{Array1, ArrayView1, ArrayView2};
use crate::error::Result;

/// A differentiable mapping from a state vector to one value per discrete action.
///
/// The agent only talks to its approximator through this trait, so tests can
/// swap in a stub that returns known vectors.
pub trait QFunction {
    /// Length of the state vectors accepted by `predict` and `update`
    fn state_size(&self) -> usize;

    /// Number of discrete actions, i.e. the length of every prediction
    fn num_actions(&self) -> usize;

    /// Action values for a single state
    fn predict(&mut self, state: ArrayView1<f32>) -> Result<Array1<f32>>;

    /// One gradient step towards `targets` (one row per state).
    /// Returns the loss measured before the step.
    fn update(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<f32>;

    /// The largest action value for `state`
    fn max_value(&mut self, state: ArrayView1<f32>) -> Result<f32> {
        let values = self.predict(state)?;
        Ok(values.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)))
    }
}
