//! # Convnet - A Small Convolutional Neural Network Library
//!
//! Convnet trains and evaluates a small convolutional neural network built
//! from heterogeneous, interchangeable layer types. A [`network::Cnn`] owns
//! an ordered convolution stack (convolution and max-pooling layers), one
//! flatten layer, and an ordered dense chain, and drives three passes across
//! the pipeline: feedforward, backpropagation, and parameter optimization.
//! Training iterates epochs over paired example sets, reshuffling the
//! example order at the start of every epoch.
//!
//! Every layer operation validates its argument dimensions and fails with a
//! descriptive error instead of panicking; the orchestrator treats the first
//! layer failure as fatal to the current pass and aborts immediately.
//!
//! ## Quick Start
//!
//! ```rust
//! use convnet::activations::Activation;
//! use convnet::builders::CnnBuilder;
//! use convnet::rng::RandomSource;
//!
//! let mut rng = RandomSource::from_seed(42);
//! let mut cnn = CnnBuilder::new()
//!     .conv_input(4)
//!     .conv_kernel(2)
//!     .pool_size(2)
//!     .dense_output(1)
//!     .dense_activation(Activation::Identity)
//!     .build(&mut rng)
//!     .unwrap();
//!
//! let input = ndarray::Array2::zeros((4, 4));
//! let prediction = cnn.predict(&input).unwrap();
//! assert_eq!(prediction.len(), 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (Identity, ReLU, Tanh)
//! - [`builders`] - Builder patterns for network construction
//! - [`error`] - Error types and result handling
//! - [`layers`] - Network layers (convolution, max-pooling, flatten, dense)
//! - [`network`] - The network orchestrator and training loop
//! - [`rng`] - Explicit, seedable random-source handle
//! - [`types`] - Matrix aliases and diagnostic formatting

pub mod activations;
pub mod builders;
pub mod error;
pub mod layers;
pub mod network;
pub mod rng;
pub mod types;

mod validation;
