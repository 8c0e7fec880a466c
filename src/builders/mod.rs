//! Builder patterns for convenient network construction.

pub mod network;

pub use network::CnnBuilder;
