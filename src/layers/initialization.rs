use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use serde::{Serialize, Deserialize};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    #[default]
    XavierUniform,

    /// He/Kaiming uniform initialization (for ReLU)
    HeUniform,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize a `(fan_in, fan_out)` weight matrix from the given generator.
    pub fn initialize_weights<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Array2<f32> {
        let (fan_in, fan_out) = shape;

        match self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new_inclusive(-limit, limit), rng)
            }

            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in as f32).sqrt();
                Array2::random_using(shape, Uniform::new_inclusive(-limit, limit), rng)
            }

            WeightInit::Uniform { min, max } => {
                Array2::random_using(shape, Uniform::new_inclusive(*min, *max), rng)
            }

            WeightInit::Zeros => {
                Array2::zeros(shape)
            }
        }
    }

    /// Initialize biases for a layer. Only the explicit uniform range draws random biases.
    pub fn initialize_biases<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Array1<f32> {
        match self {
            WeightInit::Uniform { min, max } => {
                Array1::random_using(size, Uniform::new_inclusive(*min, *max), rng)
            }
            _ => Array1::zeros(size),
        }
    }
}
