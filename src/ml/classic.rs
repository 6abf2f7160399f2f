pub mod features;
pub mod k_nearest;
pub mod labels;

#[cfg(test)]
mod tests;

// Re-export public types
pub use features::IntoFeatureVector;
pub use k_nearest::{KNNClassifier, KNNConfig, Neighbor};
pub use labels::{IntoLabel, Label, TagMap};
