//! Error types for the `webhook-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for webhook-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in webhook-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Webhook(WebhookErrorKind),
}

/// Reasons a delivery signature was rejected.
#[derive(Debug, PartialEq)]
pub enum WebhookErrorKind {
    /// No signature header, or an empty one, while a secret is configured
    MissingSignature,
    /// Header is not of the form `<algorithm>=<hexdigest>`
    MalformedSignature,
    /// Algorithm other than `sha256`
    UnsupportedAlgorithm,
    /// Well-formed signature that does not match the body
    SignatureMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Webhook(kind) => write!(f, "Webhook error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Helper function to create webhook errors.
pub fn webhook_error(kind: WebhookErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Webhook(kind),
    }
}
