//! Network orchestration: the layer pipeline and the training loop.
//!
//! A [`Cnn`] owns an ordered convolution stack (convolution and max-pooling
//! layers behind [`SpatialLayer`]), exactly one flatten layer, and an ordered
//! dense chain. Feedforward runs the pipeline front to back, backpropagation
//! runs it back to front, and optimization applies the recorded gradients in
//! forward order. Layer sizes chain at every boundary by construction.

use ndarray::{ArrayView1, ArrayView2};

use crate::activations::Activation;
use crate::error::Result;
use crate::layers::{Conv2D, DenseLayer, Flatten, MaxPool2D, SpatialLayer};
use crate::rng::RandomSource;
use crate::types::{Matrix1d, Matrix2d};
use crate::validation;

/// Permutation of training-example indices, reshuffled every epoch.
pub struct TrainOrder {
    indices: Vec<usize>,
}

impl TrainOrder {
    /// Create the identity permutation of `[0, size)`.
    pub fn new(size: usize) -> Self {
        TrainOrder {
            indices: (0..size).collect(),
        }
    }

    /// The current permutation.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Reshuffle in place with a uniform Fisher-Yates pass.
    pub fn shuffle(&mut self, rng: &mut RandomSource) {
        for i in (1..self.indices.len()).rev() {
            let j = rng.uniform_u32(i as u32 + 1) as usize;
            self.indices.swap(i, j);
        }
    }
}

/// A convolutional neural network.
pub struct Cnn {
    conv_stack: Vec<Box<dyn SpatialLayer>>,
    flatten: Flatten,
    dense_layers: Vec<DenseLayer>,
}

impl std::fmt::Debug for Cnn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cnn")
            .field("conv_stack_len", &self.conv_stack.len())
            .field("dense_layers_len", &self.dense_layers.len())
            .finish()
    }
}

impl Cnn {
    /// Build a convolution -> max-pool -> flatten -> dense pipeline with
    /// sizes chained automatically, propagating any construction rejection.
    pub fn new(
        conv_input: usize,
        conv_kernel: usize,
        conv_activation: Activation,
        pool_size: usize,
        dense_output: usize,
        dense_activation: Activation,
        rng: &mut RandomSource,
    ) -> Result<Self> {
        let conv = Conv2D::new(conv_input, conv_kernel, conv_activation, rng)?;
        let pool = MaxPool2D::new(conv.output_size(), pool_size)?;
        let flatten = Flatten::new(pool.output_size())?;
        let dense = DenseLayer::new(flatten.output_size(), dense_output, dense_activation, rng)?;

        Ok(Cnn {
            conv_stack: vec![Box::new(conv), Box::new(pool)],
            flatten,
            dense_layers: vec![dense],
        })
    }

    /// Side length of the square matrices the network consumes.
    pub fn input_size(&self) -> usize {
        self.conv_stack[0].input_size()
    }

    /// Length of the prediction vector the network produces.
    pub fn output_size(&self) -> usize {
        self.last_dense().output_size()
    }

    /// Append a dense layer whose input size is the network's current output
    /// size.
    pub fn add_dense_layer(
        &mut self,
        output_size: usize,
        activation: Activation,
        rng: &mut RandomSource,
    ) -> Result<()> {
        let layer = DenseLayer::new(self.output_size(), output_size, activation, rng)?;
        self.dense_layers.push(layer);
        Ok(())
    }

    /// Run feedforward only and return the final dense layer's output.
    /// Weights are never mutated.
    pub fn predict(&mut self, input: &Matrix2d) -> Result<Matrix1d> {
        self.feedforward(input.view())?;
        Ok(self.last_dense().output().to_owned())
    }

    /// Train the network on paired example sets.
    ///
    /// The effective set count is the shorter of the two slices. An invalid
    /// learning rate, a zero epoch count, or an empty example set is rejected
    /// before the epoch loop. Each epoch reshuffles the training order and
    /// runs feedforward -> backpropagate -> optimize per example, aborting
    /// with the first error.
    pub fn train(
        &mut self,
        inputs: &[Matrix2d],
        targets: &[Matrix1d],
        epoch_count: usize,
        learning_rate: f32,
        rng: &mut RandomSource,
    ) -> Result<()> {
        const OP: &str = "training of CNN";
        validation::check_learning_rate(OP, learning_rate)?;
        validation::check_epoch_count(OP, epoch_count)?;
        let set_count = inputs.len().min(targets.len());
        validation::check_train_set_count(OP, set_count)?;

        let mut order = TrainOrder::new(set_count);
        for _ in 0..epoch_count {
            order.shuffle(rng);
            for &i in order.indices() {
                self.feedforward(inputs[i].view())?;
                self.backpropagate(targets[i].view())?;
                self.optimize(learning_rate)?;
            }
        }
        Ok(())
    }

    fn last_dense(&self) -> &DenseLayer {
        self.dense_layers
            .last()
            .expect("dense chain is never empty")
    }

    fn feedforward(&mut self, input: ArrayView2<f32>) -> Result<()> {
        self.conv_stack[0].feedforward(input)?;
        for i in 1..self.conv_stack.len() {
            let (prev, rest) = self.conv_stack.split_at_mut(i);
            rest[0].feedforward(prev[i - 1].output())?;
        }

        let conv_output = self
            .conv_stack
            .last()
            .expect("convolution stack is never empty")
            .output();
        self.flatten.feedforward(conv_output)?;

        self.dense_layers[0].feedforward(self.flatten.output())?;
        for i in 1..self.dense_layers.len() {
            let (prev, rest) = self.dense_layers.split_at_mut(i);
            rest[0].feedforward(prev[i - 1].output())?;
        }
        Ok(())
    }

    fn backpropagate(&mut self, targets: ArrayView1<f32>) -> Result<()> {
        let last = self.dense_layers.len() - 1;
        self.dense_layers[last].backpropagate_output(targets)?;
        for i in (1..=last).rev() {
            let (head, tail) = self.dense_layers.split_at_mut(i);
            head[i - 1].backpropagate_hidden(&tail[0])?;
        }

        self.flatten
            .backpropagate(self.dense_layers[0].input_gradients())?;

        let last = self.conv_stack.len() - 1;
        self.conv_stack[last].backpropagate(self.flatten.input_gradients())?;
        for i in (1..=last).rev() {
            let (head, tail) = self.conv_stack.split_at_mut(i);
            head[i - 1].backpropagate(tail[0].input_gradients())?;
        }
        Ok(())
    }

    fn optimize(&mut self, learning_rate: f32) -> Result<()> {
        for layer in &mut self.conv_stack {
            layer.optimize(learning_rate)?;
        }

        self.dense_layers[0].optimize(self.flatten.output(), learning_rate)?;
        for i in 1..self.dense_layers.len() {
            let (prev, rest) = self.dense_layers.split_at_mut(i);
            rest[0].optimize(prev[i - 1].output(), learning_rate)?;
        }
        Ok(())
    }
}
