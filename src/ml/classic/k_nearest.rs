use std::cmp::Reverse;
use std::collections::HashMap;

use log::{debug, info, trace, warn};
use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};
use crate::ml::classic::features::IntoFeatureVector;
use crate::ml::classic::labels::{IntoLabel, Label, TagMap};

/// Configuration for a [`KNNClassifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KNNConfig {
    /// Length every stored and queried vector must have.
    pub dimensionality: usize,
    /// Number of neighbors consulted per prediction.
    pub k: usize,
    /// Optional tags; the tag at position `i` names label ID `i`.
    pub tags: Option<Vec<String>>,
}

impl KNNConfig {
    /// Create a config without tags.
    pub fn new(dimensionality: usize, k: usize) -> Self {
        Self {
            dimensionality,
            k,
            tags: None,
        }
    }

    /// Name label IDs with string tags, in ID order.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// One of the nearest stored points found for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Insertion index of the stored point.
    pub index: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f64,
    /// Integer label of the stored point.
    pub label: usize,
}

/// A k-NN classifier that stores labeled points and predicts by majority
/// vote among the `k` nearest under Euclidean distance.
///
/// Points live in an `n × dimensionality` matrix, one row per insert, with
/// `labels[i]` belonging to row `i`. Labels are stored as integer IDs; when
/// a [`TagMap`] is configured, string tags are accepted on insert and
/// returned from predict.
///
/// # Example
///
/// ```
/// use knn_classifier::{KNNClassifier, Label};
///
/// let mut knn = KNNClassifier::with_tags(2, 3, ["cat", "dog"]).unwrap();
/// knn.insert([1.0, 2.0], "cat").unwrap();
/// knn.insert([2.0, 3.0], "cat").unwrap();
/// knn.insert([2.5, 2.7], "dog").unwrap();
/// knn.insert([10.0, 10.0], "dog").unwrap();
///
/// assert_eq!(knn.predict([2.1, 2.9]).unwrap(), Label::from("cat"));
/// ```
#[derive(Debug, Clone)]
pub struct KNNClassifier {
    dimensionality: usize,
    k: usize,
    points: Array2<f64>,
    labels: Vec<usize>,
    tags: Option<TagMap>,
}

impl KNNClassifier {
    /// Constructs an empty classifier without tags.
    ///
    /// # Panics
    ///
    /// - If `dimensionality == 0`.
    /// - If `k == 0`.
    pub fn new(dimensionality: usize, k: usize) -> Self {
        assert!(dimensionality > 0, "dimensionality must be > 0");
        assert!(k > 0, "k must be > 0");
        Self::empty(dimensionality, k)
    }

    /// Constructs an empty classifier whose label IDs are named by `tags`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `dimensionality` or `k` is zero, or if `tags` is
    /// empty or holds duplicates.
    pub fn with_tags<I, S>(dimensionality: usize, k: usize, tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(KNNConfig::new(dimensionality, k).with_tags(tags))
    }

    /// Constructs an empty classifier from a [`KNNConfig`], reporting bad
    /// parameters as errors instead of panicking.
    pub fn from_config(config: KNNConfig) -> Result<Self> {
        if config.dimensionality == 0 {
            return Err(Error::InvalidInput(
                "dimensionality must be > 0".to_string(),
            ));
        }
        if config.k == 0 {
            return Err(Error::InvalidInput("k must be > 0".to_string()));
        }

        let mut knn = Self::empty(config.dimensionality, config.k);
        if let Some(tags) = config.tags {
            knn.set_tags(tags)?;
        }
        Ok(knn)
    }

    fn empty(dimensionality: usize, k: usize) -> Self {
        info!(
            "Expecting data to have dimensionality {}, using k = {}",
            dimensionality, k
        );
        Self {
            dimensionality,
            k,
            points: Array2::zeros((0, dimensionality)),
            labels: Vec::new(),
            tags: None,
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Stored points, one row per insert.
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Stored integer labels, aligned with [`points`](Self::points).
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// The active tag map, if tags were configured.
    pub fn tags(&self) -> Option<&TagMap> {
        self.tags.as_ref()
    }

    /// Replaces the tag map wholesale. Tag `i` names label ID `i`.
    ///
    /// Already stored labels are not re-mapped, so tags should be set before
    /// inserting tag-labeled data. On error the previous tags stay active.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `tags` is empty or holds duplicates.
    pub fn set_tags<I, S>(&mut self, tags: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = TagMap::new(tags)?;
        if !self.labels.is_empty() {
            warn!(
                "Replacing tags on a classifier with {} stored points; existing label ids are not re-mapped",
                self.labels.len()
            );
        }
        debug!(
            "Tag mapping: {:?}",
            tags.iter().map(|(id, tag)| (tag, id)).collect::<Vec<_>>()
        );
        self.tags = Some(tags);
        Ok(())
    }

    /// Inserts one labeled point.
    ///
    /// `label` may be an integer ID or, once tags are configured, a tag.
    /// Nothing is stored unless the whole call succeeds.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `data` is not a finite numeric vector of length
    ///   `dimensionality`.
    /// - `InvalidLabel` for a negative ID, an ID outside the tag range, or a
    ///   tag when no tags are configured.
    /// - `LabelNotFound` for a tag missing from the tag map.
    pub fn insert<D, L>(&mut self, data: D, label: L) -> Result<()>
    where
        D: IntoFeatureVector,
        L: IntoLabel,
    {
        let point = data.into_feature_vector()?;
        self.check_dimensionality(point.len())?;
        let id = self.resolve_label(label.into_label()?)?;

        self.points
            .push_row(point.view())
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        self.labels.push(id);
        debug!("Inserted point {} with label {}", self.labels.len() - 1, id);
        Ok(())
    }

    /// Predicts the label of `data` by majority vote among its `k` nearest
    /// neighbors (fewer if fewer points are stored).
    ///
    /// Returns `Label::Tag` when tags are configured, `Label::Id` otherwise.
    /// If several labels share the highest vote count, the one whose nearest
    /// member is closest to the query wins.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `data` is not a finite numeric vector of length
    ///   `dimensionality`.
    /// - `EmptyClassifier` if no points are stored.
    /// - `LabelNotFound` if the winning ID has no tag (tags were replaced by
    ///   a shorter list after it was inserted).
    pub fn predict<D: IntoFeatureVector>(&self, data: D) -> Result<Label> {
        let neighbors = self.nearest(data)?;
        trace!("Nearest neighbors: {:?}", neighbors);
        let id = majority_vote(&neighbors).ok_or(Error::EmptyClassifier)?;

        match &self.tags {
            Some(tags) => tags
                .tag_of(id)
                .map(Label::from)
                .ok_or_else(|| Error::LabelNotFound(format!("no tag for label id {id}"))),
            None => Ok(Label::Id(id)),
        }
    }

    /// The `min(k, len)` stored points nearest to `data`, closest first.
    /// Equal distances keep insertion order.
    ///
    /// # Errors
    ///
    /// Same input and empty-classifier errors as [`predict`](Self::predict).
    pub fn nearest<D: IntoFeatureVector>(&self, data: D) -> Result<Vec<Neighbor>> {
        let query = data.into_feature_vector()?;
        self.check_dimensionality(query.len())?;
        if self.is_empty() {
            return Err(Error::EmptyClassifier);
        }
        Ok(self.find_k_nearest(query.view()))
    }

    fn check_dimensionality(&self, len: usize) -> Result<()> {
        if len != self.dimensionality {
            return Err(Error::InvalidInput(format!(
                "expected {} values, got {}",
                self.dimensionality, len
            )));
        }
        Ok(())
    }

    /// Maps a label to its stored integer form against the active tags.
    fn resolve_label(&self, label: Label) -> Result<usize> {
        match (label, &self.tags) {
            (Label::Id(id), None) => Ok(id),
            (Label::Id(id), Some(tags)) if id < tags.len() => Ok(id),
            (Label::Id(id), Some(tags)) => Err(Error::InvalidLabel(format!(
                "label id {id} is outside the {} configured tags",
                tags.len()
            ))),
            (Label::Tag(tag), None) => Err(Error::InvalidLabel(format!(
                "tag {tag:?} given but no tags are configured"
            ))),
            (Label::Tag(tag), Some(tags)) => tags
                .id_of(&tag)
                .ok_or(Error::LabelNotFound(tag)),
        }
    }

    fn find_k_nearest(&self, query: ArrayView1<f64>) -> Vec<Neighbor> {
        let mut dists: Vec<(f64, usize)> = self
            .points
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| (euclidean_distance_sq(row, query), i))
            .collect();

        // Stable, so equal distances stay in insertion order.
        dists.sort_by(|(d1, _), (d2, _)| d1.total_cmp(d2));

        dists
            .into_iter()
            .take(self.k)
            .map(|(distance, index)| Neighbor {
                index,
                distance,
                label: self.labels[index],
            })
            .collect()
    }
}

/// Most frequent label among `neighbors`, which must be ordered closest
/// first. Ties go to the label seen earliest in that order. `None` only for
/// an empty slice.
fn majority_vote(neighbors: &[Neighbor]) -> Option<usize> {
    // label -> (votes, rank of its closest neighbor)
    let mut counts = HashMap::<usize, (usize, usize)>::new();
    for (rank, neighbor) in neighbors.iter().enumerate() {
        counts.entry(neighbor.label).or_insert((0, rank)).0 += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(_label, (count, first_rank))| (count, Reverse(first_rank)))
        .map(|(label, _)| label)
}

/// Returns the **squared** Euclidean distance between two vectors.
/// Ranking by squared distance gives the same order as true distance.
fn euclidean_distance_sq(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}
