//! Convolutional layer over square 2D inputs.
//!
//! Applies a zero-padded ("same") correlation, so the output matrix has the
//! same side length as the input. Gradient routing accumulates one gradient
//! per kernel weight against the input recorded during the forward pass, and
//! produces input-side gradients by correlating the adjusted output gradients
//! with the kernel.

use ndarray::{Array2, ArrayView2, Zip};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{CnnError, Result};
use crate::rng::RandomSource;
use crate::validation;

use super::traits::SpatialLayer;

/// Minimum permitted kernel side length.
pub const KERNEL_SIZE_MIN: usize = 1;

/// Maximum permitted kernel side length.
pub const KERNEL_SIZE_MAX: usize = 11;

/// 2D convolution layer with a single square kernel.
#[derive(Serialize, Deserialize, Clone)]
pub struct Conv2D {
    kernel: Array2<f32>,
    kernel_gradients: Array2<f32>,
    activation: Activation,
    input: Array2<f32>,
    output: Array2<f32>,
    input_gradients: Array2<f32>,
}

impl Conv2D {
    /// Create a convolution layer for `input_size × input_size` matrices with
    /// a `kernel_size × kernel_size` kernel.
    ///
    /// Rejects a kernel size outside `[KERNEL_SIZE_MIN, KERNEL_SIZE_MAX]` or
    /// larger than the input size. Kernel values initialize to uniform draws
    /// in `[0, 1)`.
    pub fn new(
        input_size: usize,
        kernel_size: usize,
        activation: Activation,
        rng: &mut RandomSource,
    ) -> Result<Self> {
        if !(KERNEL_SIZE_MIN..=KERNEL_SIZE_MAX).contains(&kernel_size) {
            return Err(CnnError::InvalidParameter {
                name: "kernel_size".to_string(),
                reason: format!(
                    "kernel size {} must be in range [{}, {}]",
                    kernel_size, KERNEL_SIZE_MIN, KERNEL_SIZE_MAX
                ),
            });
        }
        if input_size < kernel_size {
            return Err(CnnError::invalid_parameter(
                "kernel_size",
                "kernel size cannot be greater than input size",
            ));
        }

        let kernel =
            Array2::random_using((kernel_size, kernel_size), Uniform::new(0.0, 1.0), rng);

        Ok(Conv2D {
            kernel,
            kernel_gradients: Array2::zeros((kernel_size, kernel_size)),
            activation,
            input: Array2::zeros((input_size, input_size)),
            output: Array2::zeros((input_size, input_size)),
            input_gradients: Array2::zeros((input_size, input_size)),
        })
    }

    /// Replace the kernel with fixed values. Panics on a shape mismatch; test
    /// and diagnostic use only.
    pub fn with_kernel(mut self, kernel: Array2<f32>) -> Self {
        assert_eq!(kernel.dim(), self.kernel.dim());
        self.kernel = kernel;
        self
    }

    pub fn kernel(&self) -> &Array2<f32> {
        &self.kernel
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel.nrows()
    }

    fn padding(&self) -> usize {
        (self.kernel_size() - 1) / 2
    }

    /// Zero-padded correlation of `input` with the kernel.
    fn correlate(&self, input: &ArrayView2<f32>) -> Array2<f32> {
        let n = self.input_size();
        let k = self.kernel_size();
        let pad = self.padding();
        let mut out = Array2::zeros((n, n));
        for r in 0..n {
            for c in 0..n {
                let mut sum = 0.0;
                for u in 0..k {
                    for v in 0..k {
                        if r + u < pad || c + v < pad {
                            continue;
                        }
                        let (i, j) = (r + u - pad, c + v - pad);
                        if i < n && j < n {
                            sum += self.kernel[[u, v]] * input[[i, j]];
                        }
                    }
                }
                out[[r, c]] = sum;
            }
        }
        out
    }
}

impl SpatialLayer for Conv2D {
    fn input_size(&self) -> usize {
        self.input.nrows()
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
        const OP: &str = "feedforward in convolution layer";
        validation::require_square(OP, &input)?;
        validation::match_dimensions(OP, self.input_size(), input.nrows())?;

        self.input.assign(&input);
        let mut out = self.correlate(&input);
        self.activation.apply2d(&mut out);
        self.output = out;
        Ok(())
    }

    fn backpropagate(&mut self, output_gradients: ArrayView2<f32>) -> Result<()> {
        const OP: &str = "backpropagation in convolution layer";
        validation::require_square(OP, &output_gradients)?;
        validation::match_dimensions(OP, self.output_size(), output_gradients.nrows())?;

        let n = self.input_size();
        let k = self.kernel_size();
        let pad = self.padding();

        // Scale by the activation derivative at the recorded output.
        let mut grad = output_gradients.to_owned();
        Zip::from(&mut grad)
            .and(&self.output)
            .for_each(|g, &o| *g *= self.activation.delta(o));

        // One accumulated gradient per kernel weight, against the recorded
        // input.
        let mut kernel_gradients = Array2::zeros((k, k));
        for u in 0..k {
            for v in 0..k {
                let mut sum = 0.0;
                for r in 0..n {
                    for c in 0..n {
                        if r + u < pad || c + v < pad {
                            continue;
                        }
                        let (i, j) = (r + u - pad, c + v - pad);
                        if i < n && j < n {
                            sum += grad[[r, c]] * self.input[[i, j]];
                        }
                    }
                }
                kernel_gradients[[u, v]] = sum;
            }
        }

        // Route each output gradient back to the input positions its window
        // covered.
        let mut input_gradients = Array2::zeros((n, n));
        for r in 0..n {
            for c in 0..n {
                for u in 0..k {
                    for v in 0..k {
                        if r + u < pad || c + v < pad {
                            continue;
                        }
                        let (i, j) = (r + u - pad, c + v - pad);
                        if i < n && j < n {
                            input_gradients[[i, j]] += grad[[r, c]] * self.kernel[[u, v]];
                        }
                    }
                }
            }
        }

        self.kernel_gradients = kernel_gradients;
        self.input_gradients = input_gradients;
        Ok(())
    }

    fn optimize(&mut self, learning_rate: f32) -> Result<()> {
        const OP: &str = "optimization in convolution layer";
        validation::check_learning_rate(OP, learning_rate)?;
        self.kernel.scaled_add(learning_rate, &self.kernel_gradients);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn rng() -> RandomSource {
        RandomSource::from_seed(7)
    }

    #[test]
    fn test_conv_forward_same_size() {
        let mut layer = Conv2D::new(4, 2, Activation::Identity, &mut rng()).unwrap();
        let input = arr2(&[
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        layer.feedforward(input.view()).unwrap();
        assert_eq!(layer.output().dim(), (4, 4));
    }

    #[test]
    fn test_conv_forward_known_correlation() {
        // Kernel size 2 pads right/bottom only, so
        // out[r][c] = k00*x[r][c] + k01*x[r][c+1] + k10*x[r+1][c] + k11*x[r+1][c+1].
        let mut layer = Conv2D::new(2, 2, Activation::Identity, &mut rng())
            .unwrap()
            .with_kernel(arr2(&[[1.0, 2.0], [3.0, 4.0]]));
        let input = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        layer.feedforward(input.view()).unwrap();

        let expected = arr2(&[
            [1.0 + 4.0 + 9.0 + 16.0, 2.0 + 12.0],
            [3.0 + 8.0, 4.0],
        ]);
        assert_eq!(layer.output().to_owned(), expected);
    }

    #[test]
    fn test_conv_backward_kernel_gradients() {
        let mut layer = Conv2D::new(2, 1, Activation::Identity, &mut rng())
            .unwrap()
            .with_kernel(arr2(&[[2.0]]));
        let input = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        layer.feedforward(input.view()).unwrap();

        let grads = arr2(&[[1.0, 1.0], [1.0, 1.0]]);
        layer.backpropagate(grads.view()).unwrap();

        // With a 1x1 kernel the kernel gradient is the sum of all inputs and
        // the input gradients are the kernel value everywhere.
        assert_eq!(layer.kernel_gradients[[0, 0]], 10.0);
        assert_eq!(layer.input_gradients().to_owned(), arr2(&[[2.0, 2.0], [2.0, 2.0]]));
    }

    #[test]
    fn test_conv_rejects_bad_kernel_sizes() {
        assert!(Conv2D::new(16, 12, Activation::Identity, &mut rng()).is_err());
        assert!(Conv2D::new(16, 0, Activation::Identity, &mut rng()).is_err());
        assert!(Conv2D::new(2, 3, Activation::Identity, &mut rng()).is_err());
    }

    #[test]
    fn test_conv_dimension_mismatch_leaves_state() {
        let mut layer = Conv2D::new(4, 2, Activation::Relu, &mut rng()).unwrap();
        let before = layer.output().to_owned();
        let wrong = Array2::<f32>::zeros((3, 3));
        assert!(layer.feedforward(wrong.view()).is_err());
        assert_eq!(layer.output().to_owned(), before);

        let rect = Array2::<f32>::zeros((4, 3));
        assert!(layer.feedforward(rect.view()).is_err());

        let kernel = layer.kernel().clone();
        let grads_before = layer.input_gradients().to_owned();
        assert!(layer.backpropagate(wrong.view()).is_err());
        assert!(layer.optimize(2.0).is_err());
        assert_eq!(layer.kernel(), &kernel);
        assert_eq!(layer.input_gradients().to_owned(), grads_before);
    }
}
