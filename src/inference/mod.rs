//! Pest classification: labels, preprocessing, the model seam and its
//! one-entry cache.

pub mod artifact;
pub mod cache;
pub mod labels;
pub mod model;
pub mod prediction;
pub mod preprocess;

pub use cache::ModelCache;
pub use labels::{NUM_CLASSES, PestClass};
pub use model::{OnnxPestModel, PestModel};
pub use prediction::Prediction;
