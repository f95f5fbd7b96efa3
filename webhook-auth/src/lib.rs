//! # webhook-auth
//!
//! Authentication of inbound webhook deliveries from the source-control host.
//!
//! Deliveries carry an `X-Hub-Signature-256: sha256=<hexdigest>` header holding
//! the HMAC-SHA256 of the raw request body keyed with a shared secret. This
//! crate checks that header:
//!
//! ```rust
//! use webhook_auth::webhook::{sign, verify};
//!
//! let body = br#"{"ref":"refs/heads/main"}"#;
//! let header = sign("s3cret", body);
//!
//! assert!(verify("s3cret", body, Some(header.as_str())));
//! assert!(!verify("other", body, Some(header.as_str())));
//! // An empty secret turns verification off.
//! assert!(verify("", body, None));
//! ```

pub mod error;
pub mod webhook;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
