//! Delivery authentication, re-exported so the web layer does not reach into
//! `webhook-auth` directly.
pub use webhook_auth::webhook::{
    sign, verify, HmacSignatureVerifier, DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER,
};
