use crate::activations::Activation;
use crate::error::{CnnError, Result};
use crate::network::Cnn;
use crate::rng::RandomSource;

/// Builder for [`Cnn`].
///
/// The convolution input size, kernel size, pool size, and dense output size
/// are required; activations default to [`Activation::Identity`] for the
/// convolution layer and [`Activation::Relu`] for the dense layer.
pub struct CnnBuilder {
    conv_input: Option<usize>,
    conv_kernel: Option<usize>,
    conv_activation: Activation,
    pool_size: Option<usize>,
    dense_output: Option<usize>,
    dense_activation: Activation,
}

impl CnnBuilder {
    pub fn new() -> Self {
        CnnBuilder {
            conv_input: None,
            conv_kernel: None,
            conv_activation: Activation::Identity,
            pool_size: None,
            dense_output: None,
            dense_activation: Activation::Relu,
        }
    }

    /// Set the convolution layer input size (side length).
    pub fn conv_input(mut self, size: usize) -> Self {
        self.conv_input = Some(size);
        self
    }

    /// Set the convolution kernel size (side length).
    pub fn conv_kernel(mut self, size: usize) -> Self {
        self.conv_kernel = Some(size);
        self
    }

    /// Set the convolution layer activation function.
    pub fn conv_activation(mut self, activation: Activation) -> Self {
        self.conv_activation = activation;
        self
    }

    /// Set the max-pooling window size.
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = Some(size);
        self
    }

    /// Set the dense layer output size.
    pub fn dense_output(mut self, size: usize) -> Self {
        self.dense_output = Some(size);
        self
    }

    /// Set the dense layer activation function.
    pub fn dense_activation(mut self, activation: Activation) -> Self {
        self.dense_activation = activation;
        self
    }

    /// Build the network, drawing initial parameters from `rng`.
    pub fn build(self, rng: &mut RandomSource) -> Result<Cnn> {
        let conv_input = self.conv_input.ok_or_else(|| {
            CnnError::invalid_parameter("conv_input", "conv_input is required for Cnn")
        })?;
        let conv_kernel = self.conv_kernel.ok_or_else(|| {
            CnnError::invalid_parameter("conv_kernel", "conv_kernel is required for Cnn")
        })?;
        let pool_size = self.pool_size.ok_or_else(|| {
            CnnError::invalid_parameter("pool_size", "pool_size is required for Cnn")
        })?;
        let dense_output = self.dense_output.ok_or_else(|| {
            CnnError::invalid_parameter("dense_output", "dense_output is required for Cnn")
        })?;

        Cnn::new(
            conv_input,
            conv_kernel,
            self.conv_activation,
            pool_size,
            dense_output,
            self.dense_activation,
            rng,
        )
    }
}

impl Default for CnnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
