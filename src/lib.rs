//! An in-memory k-nearest-neighbors classifier.
//!
//! Labeled feature vectors are stored as rows of a dense matrix; a query is
//! classified by majority vote among its `k` nearest rows under Euclidean
//! distance. Label IDs can optionally be named with string tags.
//!
//! ```
//! use knn_classifier::{KNNClassifier, Label};
//!
//! let mut knn = KNNClassifier::new(1, 3);
//! knn.insert(0.0, 0).unwrap();
//! knn.insert(0.1, 0).unwrap();
//! knn.insert(5.0, 1).unwrap();
//!
//! assert_eq!(knn.predict(0.05).unwrap(), Label::Id(0));
//! ```

pub mod error;
pub mod ml;

pub use error::{Error, Result};
pub use ml::classic::{
    IntoFeatureVector, IntoLabel, KNNClassifier, KNNConfig, Label, Neighbor, TagMap,
};
