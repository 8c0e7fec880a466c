//! Max-pooling layer over square 2D inputs.
//!
//! Pools non-overlapping `pool_size × pool_size` windows, so the pool size
//! must evenly divide the input size. The forward pass records the position
//! of each window's maximum; backpropagation routes each output gradient to
//! that recorded position only.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{CnnError, Result};
use crate::validation;

use super::traits::SpatialLayer;

/// 2D max-pooling layer with non-overlapping windows.
#[derive(Serialize, Deserialize, Clone)]
pub struct MaxPool2D {
    pool_size: usize,
    output: Array2<f32>,
    input_gradients: Array2<f32>,
    max_positions: Array2<(usize, usize)>,
}

impl MaxPool2D {
    /// Create a max-pooling layer for `input_size × input_size` matrices.
    ///
    /// Rejects a zero input or pool size, a pool size larger than the input
    /// size, and an input size not evenly divisible by the pool size.
    pub fn new(input_size: usize, pool_size: usize) -> Result<Self> {
        if input_size == 0 {
            return Err(CnnError::invalid_parameter(
                "input_size",
                "input size cannot be 0",
            ));
        }
        if pool_size == 0 {
            return Err(CnnError::invalid_parameter(
                "pool_size",
                "pool size cannot be 0",
            ));
        }
        if input_size < pool_size {
            return Err(CnnError::invalid_parameter(
                "pool_size",
                "input size cannot be smaller than the pool size",
            ));
        }
        if input_size % pool_size != 0 {
            return Err(CnnError::InvalidParameter {
                name: "pool_size".to_string(),
                reason: format!(
                    "input size {} must be divisible by pool size {}",
                    input_size, pool_size
                ),
            });
        }

        let output_size = input_size / pool_size;
        Ok(MaxPool2D {
            pool_size,
            output: Array2::zeros((output_size, output_size)),
            input_gradients: Array2::zeros((input_size, input_size)),
            max_positions: Array2::from_elem((output_size, output_size), (0, 0)),
        })
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }
}

impl SpatialLayer for MaxPool2D {
    fn input_size(&self) -> usize {
        self.input_gradients.nrows()
    }

    fn output_size(&self) -> usize {
        self.output.nrows()
    }

    fn output(&self) -> ArrayView2<f32> {
        self.output.view()
    }

    fn input_gradients(&self) -> ArrayView2<f32> {
        self.input_gradients.view()
    }

    fn feedforward(&mut self, input: ArrayView2<f32>) -> Result<()> {
        const OP: &str = "feedforward in max pooling layer";
        validation::require_square(OP, &input)?;
        validation::match_dimensions(OP, self.input_size(), input.nrows())?;

        let p = self.pool_size;
        for r in 0..self.output_size() {
            for c in 0..self.output_size() {
                let mut max_val = f32::NEG_INFINITY;
                let mut max_pos = (r * p, c * p);
                for u in 0..p {
                    for v in 0..p {
                        let pos = (r * p + u, c * p + v);
                        let val = input[pos];
                        if val > max_val {
                            max_val = val;
                            max_pos = pos;
                        }
                    }
                }
                self.output[[r, c]] = max_val;
                self.max_positions[[r, c]] = max_pos;
            }
        }
        Ok(())
    }

    fn backpropagate(&mut self, output_gradients: ArrayView2<f32>) -> Result<()> {
        const OP: &str = "backpropagation in max pooling layer";
        validation::require_square(OP, &output_gradients)?;
        validation::match_dimensions(OP, self.output_size(), output_gradients.nrows())?;

        self.input_gradients.fill(0.0);
        for r in 0..self.output_size() {
            for c in 0..self.output_size() {
                let pos = self.max_positions[[r, c]];
                self.input_gradients[pos] += output_gradients[[r, c]];
            }
        }
        Ok(())
    }

    fn optimize(&mut self, learning_rate: f32) -> Result<()> {
        // No trainable parameters; only the learning rate is validated.
        const OP: &str = "optimization in max pooling layer";
        validation::check_learning_rate(OP, learning_rate)
    }
}
