//! Error types for hydration.
//!
//! All fallible operations in this crate return [`HydrateError`]:
//!
//! - [`HydrateError::UnknownDto`] - the by-name API was asked for a type that
//!   was never registered as a DTO
//! - [`HydrateError::FactoryMismatch`] - a custom factory produced a value of
//!   the wrong type
//! - [`HydrateError::MissingField`] - a required field had no payload entry
//!   and no fallback
//! - [`HydrateError::Field`] - a payload value could not be converted into
//!   the field's declared type

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while constructing a DTO.
#[derive(Error, Debug)]
pub enum HydrateError {
    /// The requested name does not identify a registered DTO type.
    #[error("`{0}` is not a registered DTO type")]
    UnknownDto(String),

    /// A custom factory returned a value of a different type than requested.
    #[error("custom factory for `{dto}` returned a value of a different type")]
    FactoryMismatch {
        /// Name of the DTO type the factory was registered for.
        dto: &'static str,
    },

    /// A non-nullable field without a default was absent from the payload.
    #[error("missing required field `{field}` for `{dto}`")]
    MissingField {
        /// Name of the DTO type being hydrated.
        dto: &'static str,
        /// Payload key of the missing field.
        field: &'static str,
    },

    /// A payload value could not be converted into the field's declared type.
    #[error("field `{field}` of `{dto}`: {source}")]
    Field {
        /// Name of the DTO type being hydrated.
        dto: &'static str,
        /// Payload key of the offending field.
        field: &'static str,
        /// The underlying conversion failure.
        #[source]
        source: BoxError,
    },

    /// A validation failure raised by a custom factory, passed through unchanged.
    #[error(transparent)]
    Validation(BoxError),

    /// Any other error raised by a custom factory.
    #[error(transparent)]
    Custom(BoxError),
}

impl HydrateError {
    /// Build a [`HydrateError::Field`] from any error-like source.
    pub fn field(
        dto: &'static str,
        field: &'static str,
        source: impl Into<BoxError>,
    ) -> Self {
        HydrateError::Field {
            dto,
            field,
            source: source.into(),
        }
    }

    /// Wrap an external validation failure for propagation through `make`.
    pub fn validation(source: impl Into<BoxError>) -> Self {
        HydrateError::Validation(source.into())
    }
}

impl From<BoxError> for HydrateError {
    fn from(err: BoxError) -> Self {
        HydrateError::Custom(err)
    }
}
