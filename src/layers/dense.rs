//! Fully connected layer with dual backpropagation forms.
//!
//! A dense layer backpropagates in one of two ways depending on its position
//! in the chain: the output layer compares its output against a target vector
//! (the supervised loss is implicit, `target - output`), while a hidden layer
//! routes gradients from its downstream neighbor. The two contracts are
//! materially different, so they are separate methods rather than one
//! overloaded operation.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{CnnError, Result};
use crate::rng::RandomSource;
use crate::validation;

/// A fully connected (dense) layer.
///
/// Weights are stored with one row per output node and one column per input
/// node. Weights and bias are mutated only by [`DenseLayer::optimize`].
#[derive(Serialize, Deserialize, Clone)]
pub struct DenseLayer {
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
    output: Array1<f32>,
    deltas: Array1<f32>,
    input_gradients: Array1<f32>,
}

impl DenseLayer {
    /// Create a dense layer with the given input size, output size, and
    /// activation function. Weights and bias initialize to uniform draws in
    /// `[0, 1)` from the injected random source.
    ///
    /// Rejects a zero node count (output size) or weight count (input size).
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut RandomSource,
    ) -> Result<Self> {
        if output_size == 0 {
            return Err(CnnError::invalid_parameter(
                "output_size",
                "node count cannot be 0",
            ));
        }
        if input_size == 0 {
            return Err(CnnError::invalid_parameter(
                "input_size",
                "weight count cannot be 0",
            ));
        }

        let weights =
            Array2::random_using((output_size, input_size), Uniform::new(0.0, 1.0), rng);
        let bias = Array1::random_using(output_size, Uniform::new(0.0, 1.0), rng);

        Ok(DenseLayer {
            weights,
            bias,
            activation,
            output: Array1::zeros(output_size),
            deltas: Array1::zeros(output_size),
            input_gradients: Array1::zeros(input_size),
        })
    }

    /// Replace the weights with fixed values. Panics on a shape mismatch;
    /// test and diagnostic use only.
    pub fn with_weights(mut self, weights: Array2<f32>) -> Self {
        assert_eq!(weights.dim(), self.weights.dim());
        self.weights = weights;
        self
    }

    /// Replace the bias with fixed values. Panics on a shape mismatch; test
    /// and diagnostic use only.
    pub fn with_bias(mut self, bias: Array1<f32>) -> Self {
        assert_eq!(bias.dim(), self.bias.dim());
        self.bias = bias;
        self
    }

    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    /// Last computed forward result, overwritten by each `feedforward` call.
    pub fn output(&self) -> ArrayView1<f32> {
        self.output.view()
    }

    /// Per-node error terms from the last backpropagation, the quantity
    /// `optimize` applies.
    pub fn deltas(&self) -> ArrayView1<f32> {
        self.deltas.view()
    }

    /// Gradients with respect to this layer's input, the transpose-weighted
    /// propagation of the deltas. Overwritten by each backpropagate call.
    pub fn input_gradients(&self) -> ArrayView1<f32> {
        self.input_gradients.view()
    }

    /// Compute `output[i] = activation(bias[i] + Σ_j weights[i][j] * input[j])`.
    pub fn feedforward(&mut self, input: ArrayView1<f32>) -> Result<()> {
        const OP: &str = "feedforward in dense layer";
        validation::match_dimensions(OP, self.input_size(), input.len())?;

        let mut out = self.weights.dot(&input) + &self.bias;
        self.activation.apply(&mut out);
        self.output = out;
        Ok(())
    }

    /// Output-layer backpropagation: treat `targets` as the supervised target
    /// vector and derive each node's delta from `target - output`.
    pub fn backpropagate_output(&mut self, targets: ArrayView1<f32>) -> Result<()> {
        const OP: &str = "backpropagation in output dense layer";
        validation::match_dimensions(OP, self.output_size(), targets.len())?;

        let act = self.activation;
        self.deltas = (&targets - &self.output)
            .iter()
            .zip(self.output.iter())
            .map(|(&error, &out)| error * act.delta(out))
            .collect();
        self.input_gradients = self.weights.t().dot(&self.deltas);
        Ok(())
    }

    /// Hidden-layer backpropagation: each node's error is the downstream
    /// layer's transpose-weighted delta sum, i.e. its input gradient at this
    /// node's position.
    pub fn backpropagate_hidden(&mut self, downstream: &DenseLayer) -> Result<()> {
        const OP: &str = "backpropagation in hidden dense layer";
        validation::match_dimensions(OP, self.output_size(), downstream.input_size())?;

        let act = self.activation;
        self.deltas = downstream
            .input_gradients
            .iter()
            .zip(self.output.iter())
            .map(|(&error, &out)| error * act.delta(out))
            .collect();
        self.input_gradients = self.weights.t().dot(&self.deltas);
        Ok(())
    }

    /// Apply the deltas from the last backpropagation:
    /// `bias[i] += deltas[i] * learning_rate` and
    /// `weights[i][j] += deltas[i] * learning_rate * input[j]`.
    ///
    /// The sign moves the output toward the target; the deltas already encode
    /// `target - output`.
    pub fn optimize(&mut self, input: ArrayView1<f32>, learning_rate: f32) -> Result<()> {
        const OP: &str = "optimization in dense layer";
        validation::match_dimensions(OP, self.input_size(), input.len())?;
        validation::check_learning_rate(OP, learning_rate)?;

        self.bias.scaled_add(learning_rate, &self.deltas);
        let weight_gradients = self
            .deltas
            .view()
            .insert_axis(Axis(1))
            .dot(&input.insert_axis(Axis(0)));
        self.weights.scaled_add(learning_rate, &weight_gradients);
        Ok(())
    }
}
