use ndarray::ArrayView2;

use crate::error::Result;

/// Trait defining the interface for the 2D layers of the convolution stack
/// (convolution and max-pooling).
///
/// The network holds these behind `Box<dyn SpatialLayer>` so the stack can
/// mix layer kinds. Every operation validates its argument sizes and returns
/// `Err` without touching owned state on a mismatch.
pub trait SpatialLayer: Send + Sync {
    /// Side length of the square input matrix, fixed at construction.
    fn input_size(&self) -> usize;

    /// Side length of the square output matrix, fixed at construction.
    fn output_size(&self) -> usize;

    /// Last computed forward result, overwritten by each `feedforward` call.
    fn output(&self) -> ArrayView2<f32>;

    /// Last computed input-side gradients, overwritten by each
    /// `backpropagate` call.
    fn input_gradients(&self) -> ArrayView2<f32>;

    /// Compute this layer's output from `input`.
    fn feedforward(&mut self, input: ArrayView2<f32>) -> Result<()>;

    /// Compute input-side gradients from output-side gradients.
    fn backpropagate(&mut self, output_gradients: ArrayView2<f32>) -> Result<()>;

    /// Apply the gradients recorded by `backpropagate` to this layer's
    /// trainable parameters, if it has any.
    fn optimize(&mut self, learning_rate: f32) -> Result<()>;
}
