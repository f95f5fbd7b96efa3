//! Webhook signature validation.

mod hmac;

pub use hmac::{sign, verify, HmacSignatureVerifier, SUPPORTED_ALGORITHM};

/// Header carrying the HMAC-SHA256 signature of the raw body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Header naming the kind of event being delivered, e.g. `push`.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the provider's unique id for a delivery.
pub const DELIVERY_HEADER: &str = "x-github-delivery";
