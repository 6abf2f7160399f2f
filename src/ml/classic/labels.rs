use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// A class label: either a raw integer ID or a string tag that resolves to
/// one through a [`TagMap`].
///
/// Stored labels are always the integer form; tags are resolved on insert
/// and re-applied on predict.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Id(usize),
    Tag(String),
}

impl Label {
    /// The integer ID, if this is an `Id` label.
    pub fn as_id(&self) -> Option<usize> {
        match self {
            Label::Id(id) => Some(*id),
            Label::Tag(_) => None,
        }
    }

    /// The tag string, if this is a `Tag` label.
    pub fn as_tag(&self) -> Option<&str> {
        match self {
            Label::Id(_) => None,
            Label::Tag(tag) => Some(tag),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Id(id) => write!(f, "{id}"),
            Label::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

impl From<usize> for Label {
    fn from(id: usize) -> Self {
        Label::Id(id)
    }
}

impl From<&str> for Label {
    fn from(tag: &str) -> Self {
        Label::Tag(tag.to_string())
    }
}

impl From<String> for Label {
    fn from(tag: String) -> Self {
        Label::Tag(tag)
    }
}

/// Conversion accepted wherever a label is taken as input.
///
/// Integers become `Label::Id` (negative values are rejected with
/// `InvalidLabel`); strings become `Label::Tag`.
pub trait IntoLabel {
    fn into_label(self) -> Result<Label>;
}

impl IntoLabel for Label {
    fn into_label(self) -> Result<Label> {
        Ok(self)
    }
}

impl IntoLabel for usize {
    fn into_label(self) -> Result<Label> {
        Ok(Label::Id(self))
    }
}

macro_rules! integer_into_label {
    ($($t:ty),*) => {
        $(
            impl IntoLabel for $t {
                fn into_label(self) -> Result<Label> {
                    usize::try_from(self).map(Label::Id).map_err(|_| {
                        Error::InvalidLabel(format!(
                            "label id must be a non-negative integer, got {self}"
                        ))
                    })
                }
            }
        )*
    };
}

integer_into_label!(i32, i64, u32, u64);

impl IntoLabel for &str {
    fn into_label(self) -> Result<Label> {
        Ok(Label::from(self))
    }
}

impl IntoLabel for String {
    fn into_label(self) -> Result<Label> {
        Ok(Label::Tag(self))
    }
}

impl IntoLabel for &String {
    fn into_label(self) -> Result<Label> {
        Ok(Label::Tag(self.clone()))
    }
}

/// Two-way dictionary between string tags and integer label IDs.
///
/// IDs are assigned by list position: the first tag is `0`, the second `1`
/// and so on. Both directions are built together and the map is immutable
/// afterwards, so they can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMap {
    tag_to_id: HashMap<String, usize>,
    id_to_tag: Vec<String>,
}

impl TagMap {
    /// Builds a tag map from an ordered list of distinct tags.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `tags` is empty or contains the same tag twice.
    ///
    /// # Example
    ///
    /// ```
    /// use knn_classifier::TagMap;
    ///
    /// let tags = TagMap::new(["cat", "dog"]).unwrap();
    /// assert_eq!(tags.id_of("dog"), Some(1));
    /// assert_eq!(tags.tag_of(0), Some("cat"));
    /// ```
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id_to_tag: Vec<String> = tags.into_iter().map(Into::into).collect();
        if id_to_tag.is_empty() {
            return Err(Error::InvalidInput(
                "tag list must not be empty".to_string(),
            ));
        }

        let mut tag_to_id = HashMap::with_capacity(id_to_tag.len());
        for (id, tag) in id_to_tag.iter().enumerate() {
            if let Some(first) = tag_to_id.insert(tag.clone(), id) {
                return Err(Error::InvalidInput(format!(
                    "duplicate tag {tag:?} at positions {first} and {id}"
                )));
            }
        }

        Ok(Self {
            tag_to_id,
            id_to_tag,
        })
    }

    pub fn id_of(&self, tag: &str) -> Option<usize> {
        self.tag_to_id.get(tag).copied()
    }

    pub fn tag_of(&self, id: usize) -> Option<&str> {
        self.id_to_tag.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id_to_tag.len()
    }

    /// Always false; an empty tag map cannot be built.
    pub fn is_empty(&self) -> bool {
        self.id_to_tag.is_empty()
    }

    /// `(id, tag)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.id_to_tag
            .iter()
            .enumerate()
            .map(|(id, tag)| (id, tag.as_str()))
    }
}
