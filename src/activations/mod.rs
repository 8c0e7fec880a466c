//! # Activation Functions Module
//!
//! Scalar activation functions used inside dense and convolutional layers.
//!
//! ## Available Activations
//!
//! - **Identity**: no transformation, derivative 1
//! - **ReLU** (Rectified Linear Unit): `max(0, x)`
//! - **Tanh**: hyperbolic tangent, outputs between -1 and 1
//!
//! ## Usage Example
//!
//! ```rust
//! use convnet::activations::Activation;
//!
//! let relu = Activation::Relu;
//! assert_eq!(relu.output(-0.5), 0.0);
//! assert_eq!(relu.delta(2.0), 1.0);
//! ```

pub mod functions;

pub use functions::Activation;
