use thiserror::Error;

/// Errors returned by the classifier.
///
/// Every variant is raised before any state is mutated, so a failed call
/// leaves the classifier exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Data could not be coerced into a feature vector of the right shape,
    /// or a tag list / configuration was malformed.
    #[error("Invalid data type, expected numeric vector: {0}")]
    InvalidInput(String),

    /// Label is neither a valid integer ID nor a usable tag.
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// Tag (or predicted ID) has no entry in the active tag map.
    #[error("label not found: {0}")]
    LabelNotFound(String),

    /// Prediction was requested before any point was inserted.
    #[error("classifier has no stored points")]
    EmptyClassifier,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::InvalidInput("expected 3 values, got 2".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid data type, expected numeric vector: expected 3 values, got 2"
        );
        assert_eq!(
            Error::LabelNotFound("dog".to_string()).to_string(),
            "label not found: dog"
        );
        assert_eq!(
            Error::EmptyClassifier.to_string(),
            "classifier has no stored points"
        );
    }
}
