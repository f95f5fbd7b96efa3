//! HMAC-SHA256 webhook signature validation.

use hmac::{Hmac, Mac};
use log::*;
use sha2::Sha256;

use crate::error::{webhook_error, Error, WebhookErrorKind};

type HmacSha256 = Hmac<Sha256>;

/// The only algorithm accepted in the signature header.
pub const SUPPORTED_ALGORITHM: &str = "sha256";

/// HMAC-SHA256 signature verifier bound to one shared secret.
///
/// An empty secret puts the verifier in disabled mode: every delivery is
/// accepted, signed or not. Operators opt into this by leaving the secret
/// unset.
#[derive(Clone)]
pub struct HmacSignatureVerifier {
    secret: String,
}

impl HmacSignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Returns `false` when the verifier accepts every delivery.
    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Checks a `<algorithm>=<hexdigest>` signature header against `body`,
    /// reporting why a delivery was rejected.
    pub fn check(&self, signature_header: Option<&str>, body: &[u8]) -> Result<(), Error> {
        if !self.is_enabled() {
            return Ok(());
        }

        let signature_header = signature_header.filter(|s| !s.is_empty()).ok_or_else(|| {
            webhook_error(
                WebhookErrorKind::MissingSignature,
                "Missing signature header",
            )
        })?;

        let parts: Vec<&str> = signature_header.split('=').collect();
        let [algorithm, digest] = parts.as_slice() else {
            return Err(webhook_error(
                WebhookErrorKind::MalformedSignature,
                "Signature header must be <algorithm>=<hexdigest>",
            ));
        };

        if *algorithm != SUPPORTED_ALGORITHM {
            return Err(webhook_error(
                WebhookErrorKind::UnsupportedAlgorithm,
                &format!("Unsupported signature algorithm: {algorithm}"),
            ));
        }

        // Digests are emitted as lowercase hex; anything else can never match.
        if digest
            .chars()
            .any(|c| !(c.is_ascii_digit() || ('a'..='f').contains(&c)))
        {
            return Err(webhook_error(
                WebhookErrorKind::SignatureMismatch,
                "Signature digest is not lowercase hex",
            ));
        }

        let expected_sig = hex::decode(digest).map_err(|_| {
            webhook_error(
                WebhookErrorKind::SignatureMismatch,
                "Signature digest is not valid hex",
            )
        })?;

        // verify_slice compares in constant time
        self.mac(body).verify_slice(&expected_sig).map_err(|_| {
            webhook_error(
                WebhookErrorKind::SignatureMismatch,
                "Signature does not match payload",
            )
        })
    }

    /// Produces the `sha256=<hexdigest>` header value for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let digest = self.mac(body).finalize().into_bytes();
        format!("{SUPPORTED_ALGORITHM}={}", hex::encode(digest))
    }

    fn mac(&self, body: &[u8]) -> HmacSha256 {
        // HMAC accepts keys of any length, including empty ones.
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(body);
        mac
    }
}

/// Verifies a delivery signature. An empty `secret` disables verification and
/// always returns `true`.
pub fn verify(secret: &str, body: &[u8], signature_header: Option<&str>) -> bool {
    match HmacSignatureVerifier::new(secret).check(signature_header, body) {
        Ok(()) => true,
        Err(e) => {
            debug!("Rejected webhook signature: {e}");
            false
        }
    }
}

/// Signs `body` with `secret`, producing a `sha256=<hexdigest>` header value.
pub fn sign(secret: &str, body: &[u8]) -> String {
    HmacSignatureVerifier::new(secret).sign(body)
}
