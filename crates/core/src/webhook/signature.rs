//! HMAC-SHA256 webhook signatures.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::webhook::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Request header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Verifies webhook bodies against a shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    /// Creates a verifier for `secret`.
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, WebhookError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| WebhookError::InvalidSignature)
    }

    /// Hex HMAC-SHA256 of `body`.
    pub fn sign(&self, body: &[u8]) -> Result<String, WebhookError> {
        let mut mac = self.mac()?;
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Checks `header` against the HMAC of the raw `body`.
    ///
    /// Accepts a bare hex digest or one prefixed with `sha256=`. The digest
    /// comparison is constant time.
    pub fn verify(&self, body: &[u8], header: Option<&str>) -> Result<(), WebhookError> {
        let header = header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(WebhookError::MissingSignature)?;
        let digest = header.strip_prefix("sha256=").unwrap_or(header);
        let expected = hex::decode(digest).map_err(|_| WebhookError::InvalidSignature)?;

        let mut mac = self.mac()?;
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| WebhookError::InvalidSignature)
    }
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"event":"charge.complete"}"#;

    #[test]
    fn test_sign_then_verify() {
        let verifier = SignatureVerifier::new("whsec_test");
        let signature = verifier.sign(BODY).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(verifier.verify(BODY, Some(&signature)).is_ok());
        assert!(
            verifier
                .verify(BODY, Some(&format!("sha256={signature}")))
                .is_ok()
        );
    }

    #[test]
    fn test_known_digest() {
        // RFC 4231 test case 2.
        let verifier = SignatureVerifier::new("Jefe");
        assert_eq!(
            verifier.sign(b"what do ya want for nothing?").unwrap(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_tampered_body_rejected() {
        let verifier = SignatureVerifier::new("whsec_test");
        let signature = verifier.sign(BODY).unwrap();
        assert_eq!(
            verifier.verify(b"{\"event\":\"charge.failed\"}", Some(&signature)),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature = SignatureVerifier::new("other").sign(BODY).unwrap();
        assert_eq!(
            SignatureVerifier::new("whsec_test").verify(BODY, Some(&signature)),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn test_missing_or_garbage_header() {
        let verifier = SignatureVerifier::new("whsec_test");
        assert_eq!(
            verifier.verify(BODY, None),
            Err(WebhookError::MissingSignature)
        );
        assert_eq!(
            verifier.verify(BODY, Some("  ")),
            Err(WebhookError::MissingSignature)
        );
        assert_eq!(
            verifier.verify(BODY, Some("not-hex")),
            Err(WebhookError::InvalidSignature)
        );
        assert_eq!(
            verifier.verify(BODY, Some("abcd")),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let verifier = SignatureVerifier::new("whsec_test");
        assert!(!format!("{verifier:?}").contains("whsec_test"));
    }
}
