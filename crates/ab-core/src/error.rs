//! Error taxonomy for builder operations.
//!
//! Every engine operation that can fail leaves its state untouched on `Err`.
//! The session layer turns these into logged no-ops so a failed gesture never
//! reaches the user as an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuilderError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuilderError {
    /// A referenced row, item, or index does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// Grid size or size floor is non-finite, zero, or negative.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The targeted drop zone was unregistered between hover and drop.
    #[error("drop zone {row}[{slot}] is no longer registered")]
    StaleDropZone { row: String, slot: usize },

    /// A property editor value does not fit the field's schema.
    #[error("invalid value for property `{key}`")]
    InvalidProperty { key: String },

    /// Configuration could not be decoded.
    #[error("config: {0}")]
    Config(String),
}

impl BuilderError {
    pub fn not_found(what: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            what,
            id: id.to_string(),
        }
    }

    /// Whether this error is absorbed as a silent no-op at the UI boundary.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::StaleDropZone { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_thing() {
        let err = BuilderError::not_found("row", "row-7");
        assert_eq!(err.to_string(), "row not found: row-7");
        assert!(err.is_recoverable());
    }

    #[test]
    fn geometry_errors_are_not_recoverable() {
        let err = BuilderError::InvalidGeometry("grid x = 0".into());
        assert!(!err.is_recoverable());
    }
}
