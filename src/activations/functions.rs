use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// An enumeration of the activation functions available to network layers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum Activation {
    /// No transformation.
    #[default]
    Identity,
    /// Rectified linear unit: `max(0, x)`.
    Relu,
    /// Hyperbolic tangent.
    Tanh,
}

impl Activation {
    /// Compute the activation function output at `value`.
    pub fn output(&self, value: f32) -> f32 {
        match self {
            Activation::Identity => value,
            Activation::Relu => {
                if 0.0 < value {
                    value
                } else {
                    0.0
                }
            }
            Activation::Tanh => value.tanh(),
        }
    }

    /// Compute the activation function derivative at `value`.
    ///
    /// ReLU uses a strictly-greater-than-zero test, so the derivative at
    /// exactly 0 is 0.
    pub fn delta(&self, value: f32) -> f32 {
        match self {
            Activation::Identity => 1.0,
            Activation::Relu => {
                if 0.0 < value {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Tanh => {
                let tanh_v = value.tanh();
                1.0 - tanh_v * tanh_v
            }
        }
    }

    /// Apply the activation function to a 1D array in-place.
    pub fn apply(&self, input: &mut Array1<f32>) {
        match self {
            Activation::Identity => {}
            _ => input.mapv_inplace(|v| self.output(v)),
        }
    }

    /// Apply the activation function to a 2D array in-place.
    pub fn apply2d(&self, input: &mut Array2<f32>) {
        match self {
            Activation::Identity => {}
            _ => input.mapv_inplace(|v| self.output(v)),
        }
    }
}
