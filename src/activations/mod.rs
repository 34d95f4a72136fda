//! # Activation Functions Module
//!
//! Activations used by the Q-network. Hidden layers use ReLU, the output
//! layer stays linear so action values are unbounded.
//!
//! ```rust
//! use sisyphus::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![[1.0, -0.5, 0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0, 0.0, 0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
