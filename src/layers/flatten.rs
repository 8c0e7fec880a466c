//! Flatten layer bridging the 2D convolution stack and the 1D dense chain.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{CnnError, Result};
use crate::validation;

/// Converts a square `n × n` matrix into a row-major vector of length `n²`
/// on feedforward, and reshapes an `n²`-length gradient vector back into the
/// square shape on backpropagation. Values pass through unchanged both ways.
#[derive(Serialize, Deserialize, Clone)]
pub struct Flatten {
    output: Array1<f32>,
    input_gradients: Array2<f32>,
}

impl Flatten {
    /// Create a flatten layer for `input_size × input_size` matrices.
    /// Rejects a zero input size.
    pub fn new(input_size: usize) -> Result<Self> {
        if input_size == 0 {
            return Err(CnnError::invalid_parameter(
                "input_size",
                "input size cannot be 0",
            ));
        }
        Ok(Flatten {
            output: Array1::zeros(input_size * input_size),
            input_gradients: Array2::zeros((input_size, input_size)),
        })
    }

    /// Side length of the square input matrix.
    pub fn input_size(&self) -> usize {
        self.input_gradients.nrows()
    }

    /// Length of the flattened output vector, `input_size²`.
    pub fn output_size(&self) -> usize {
        self.output.len()
    }

    /// Last flattened output, overwritten by each `feedforward` call.
    pub fn output(&self) -> ArrayView1<f32> {
        self.output.view()
    }

    /// Last reshaped gradients, overwritten by each `backpropagate` call.
    pub fn input_gradients(&self) -> ArrayView2<f32> {
        self.input_gradients.view()
    }

    /// Flatten the input from 2D to 1D, row-major.
    pub fn feedforward(&mut self, input: ArrayView2<f32>) -> Result<()> {
        const OP: &str = "feedforward in flatten layer";
        validation::require_square(OP, &input)?;
        validation::match_dimensions(OP, self.input_size(), input.nrows())?;

        self.output = Array1::from_iter(input.iter().copied());
        Ok(())
    }

    /// Unflatten the output gradients from 1D back to the square 2D shape.
    pub fn backpropagate(&mut self, output_gradients: ArrayView1<f32>) -> Result<()> {
        const OP: &str = "backpropagation in flatten layer";
        validation::match_dimensions(OP, self.output_size(), output_gradients.len())?;

        let n = self.input_size();
        self.input_gradients = output_gradients
            .to_owned()
            .into_shape((n, n))
            .expect("length was checked against the square shape");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_flatten_round_trip() {
        let mut layer = Flatten::new(2).unwrap();
        let input = arr2(&[[1.0, 2.0], [3.0, 4.0]]);

        layer.feedforward(input.view()).unwrap();
        assert_eq!(layer.output().to_owned(), arr1(&[1.0, 2.0, 3.0, 4.0]));

        layer
            .backpropagate(arr1(&[1.0, 2.0, 3.0, 4.0]).view())
            .unwrap();
        assert_eq!(layer.input_gradients().to_owned(), input);
    }

    #[test]
    fn test_flatten_rejects_zero_size() {
        assert!(Flatten::new(0).is_err());
    }

    #[test]
    fn test_flatten_dimension_mismatch_leaves_state() {
        let mut layer = Flatten::new(2).unwrap();
        let before = layer.output().to_owned();
        assert!(layer.feedforward(arr2(&[[1.0]]).view()).is_err());
        assert_eq!(layer.output().to_owned(), before);

        let grads_before = layer.input_gradients().to_owned();
        assert!(layer.backpropagate(arr1(&[1.0, 2.0]).view()).is_err());
        assert_eq!(layer.input_gradients().to_owned(), grads_before);
    }
}
