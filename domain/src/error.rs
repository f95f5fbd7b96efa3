//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `web` only ever sees these kinds, never `entity_api` errors, and
/// uses them to pick HTTP status codes.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
}

#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// A recognized delivery could not be turned into an activity record
    Payload(PayloadErrorKind),
    /// The event store rejected or could not serve a request
    Store(StoreErrorKind),
    Other(String),
}

#[derive(Debug, PartialEq)]
pub enum PayloadErrorKind {
    /// A field the classifier requires is absent or empty; holds its dotted path
    MissingField(String),
    /// A field is present but has the wrong JSON type
    Malformed,
    /// An event time that is not a valid ISO-8601 timestamp
    InvalidTimestamp,
}

#[derive(Debug, PartialEq)]
pub enum StoreErrorKind {
    /// Connection failure or timeout while reaching the store
    Unavailable,
    /// Record refused by the store
    Invalid,
    Other,
}

impl Error {
    pub fn payload(kind: PayloadErrorKind, message: impl Into<String>) -> Self {
        Error {
            source: Some(message.into().into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Payload(kind)),
        }
    }

    pub fn missing_field(path: &str) -> Self {
        Error::payload(
            PayloadErrorKind::MissingField(path.to_string()),
            format!("Missing required field: {path}"),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let store_error_kind = match err.error_kind {
            EntityApiErrorKind::ConnectionUnavailable => StoreErrorKind::Unavailable,
            EntityApiErrorKind::ValidationError => StoreErrorKind::Invalid,
            _ => StoreErrorKind::Other,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Store(store_error_kind)),
        }
    }
}
