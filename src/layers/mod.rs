pub mod conv;
pub mod dense;
pub mod flatten;
pub mod pooling;
pub mod traits;

pub use conv::Conv2D;
pub use dense::DenseLayer;
pub use flatten::Flatten;
pub use pooling::MaxPool2D;
pub use traits::SpatialLayer;
