#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Signed download tokens
//!
//! A token binds an (email, platform) pair to a 24 hour validity window and
//! is safe to embed in a URL query parameter. Verification is pure: validity
//! is fully determined by the signed payload plus the server clock, so no
//! server-side session state exists. Tokens are deliberately multi-use;
//! expiry is the only termination path.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use downlink_errors::{Error, TokenError};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use downlink_types::Platform;

type HmacSha256 = Hmac<Sha256>;

/// Fixed token lifetime.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Decoded claims of a verified download token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadToken {
    #[serde(rename = "sub")]
    pub subject_email: String,
    #[serde(rename = "plt")]
    pub platform: Platform,
    /// Unix seconds at issuance.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Unix seconds; `issued_at + TOKEN_TTL_SECS`, signed with the rest.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl DownloadToken {
    /// True once the server clock has passed the expiry instant. No grace
    /// window is granted.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expires_at
    }
}

/// Issues and verifies download tokens with a server-held HMAC-SHA256 secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a token for `email` on `platform`, valid for 24 hours from now.
    ///
    /// The returned string is `base64url(payload).base64url(tag)` with no
    /// padding, safe for a URL query parameter.
    ///
    /// # Errors
    /// Returns an error if the claims cannot be serialized.
    pub fn issue(&self, email: &str, platform: Platform) -> Result<String, Error> {
        self.issue_at(email, platform, Utc::now())
    }

    /// Issue a token with an explicit issuance instant (clock injection for
    /// expiry tests and backdated links).
    ///
    /// # Errors
    /// Returns an error if the claims cannot be serialized.
    pub fn issue_at(
        &self,
        email: &str,
        platform: Platform,
        issued_at: DateTime<Utc>,
    ) -> Result<String, Error> {
        let claims = DownloadToken {
            subject_email: email.to_string(),
            platform,
            issued_at: issued_at.timestamp(),
            expires_at: issued_at.timestamp() + TOKEN_TTL_SECS,
        };
        let payload = serde_json::to_vec(&claims)?;
        let tag = self.sign(&payload)?;
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Verify a token against the server clock.
    ///
    /// # Errors
    /// Returns `TokenError::Malformed` when the structure cannot be decoded,
    /// `TokenError::SignatureMismatch` when the tag does not verify, and
    /// `TokenError::Expired` once the validity window has passed.
    pub fn verify(&self, token: &str) -> Result<DownloadToken, Error> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against an explicit clock.
    ///
    /// # Errors
    /// See [`TokenSigner::verify`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<DownloadToken, Error> {
        let (payload_b64, tag_b64) = token.split_once('.').ok_or(TokenError::Malformed {
            reason: "expected payload.signature".to_string(),
        })?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| TokenError::Malformed {
                reason: format!("payload: {e}"),
            })?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|e| TokenError::Malformed {
                reason: format!("signature: {e}"),
            })?;

        // Constant-time tag comparison; the signature covers every claim
        // field, so any payload tampering fails here.
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| Error::internal(format!("mac init: {e}")))?;
        mac.update(&payload);
        mac.verify_slice(&tag)
            .map_err(|_| TokenError::SignatureMismatch)?;

        let claims: DownloadToken =
            serde_json::from_slice(&payload).map_err(|e| TokenError::Malformed {
                reason: format!("claims: {e}"),
            })?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired {
                expired_at: claims.expires_at,
            }
            .into());
        }

        Ok(claims)
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| Error::internal(format!("mac init: {e}")))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(*b"correct horse battery staple....")
    }

    #[test]
    fn round_trip_preserves_claims() {
        let signer = signer();
        let token = signer.issue("a@b.com", Platform::Android).unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.subject_email, "a@b.com");
        assert_eq!(claims.platform, Platform::Android);
        assert_eq!(claims.expires_at, claims.issued_at + TOKEN_TTL_SECS);
    }

    #[test]
    fn valid_one_second_before_expiry() {
        let signer = signer();
        let issued = Utc::now() - Duration::seconds(TOKEN_TTL_SECS - 1);
        let token = signer.issue_at("a@b.com", Platform::Mac, issued).unwrap();
        assert!(signer.verify(&token).is_ok());
    }

    #[test]
    fn rejected_after_expiry() {
        let signer = signer();
        let issued = Utc::now() - Duration::seconds(TOKEN_TTL_SECS + 1);
        let token = signer.issue_at("a@b.com", Platform::Mac, issued).unwrap();
        let err = signer.verify(&token).unwrap_err();
        assert!(matches!(
            err,
            Error::Token(TokenError::Expired { .. })
        ));
    }

    #[test]
    fn no_grace_window_at_exact_expiry_plus_one() {
        let signer = signer();
        let issued = Utc::now();
        let token = signer.issue_at("a@b.com", Platform::Linux, issued).unwrap();
        let claims = signer.verify(&token).unwrap();

        let at_expiry = DateTime::from_timestamp(claims.expires_at, 0).unwrap();
        assert!(signer.verify_at(&token, at_expiry).is_ok());
        assert!(signer
            .verify_at(&token, at_expiry + Duration::seconds(1))
            .is_err());
    }

    #[test]
    fn any_single_byte_flip_is_rejected() {
        let signer = signer();
        let token = signer.issue("a@b.com", Platform::Windows).unwrap();
        let bytes = token.as_bytes();

        for i in 0..bytes.len() {
            let mut tampered = bytes.to_vec();
            // Stay within ASCII so the flip hits token content, not UTF-8
            // validity.
            tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
            if tampered == bytes {
                continue;
            }
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(
                signer.verify(&tampered).is_err(),
                "byte {i} flip was accepted"
            );
        }
    }

    #[test]
    fn truncated_token_is_rejected() {
        let signer = signer();
        let token = signer.issue("a@b.com", Platform::Android).unwrap();
        assert!(signer.verify(&token[..token.len() - 1]).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = signer().issue("a@b.com", Platform::Generic).unwrap();
        let other = TokenSigner::new(*b"incorrect horse battery staple..");
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(
            err,
            Error::Token(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn missing_separator_is_malformed() {
        let err = signer().verify("nodothere").unwrap_err();
        assert!(matches!(err, Error::Token(TokenError::Malformed { .. })));
    }

    proptest! {
        #[test]
        fn round_trip_for_arbitrary_identities(
            email in "[a-z]{1,12}@[a-z]{1,12}\\.[a-z]{2,4}",
            idx in 0usize..Platform::ALL.len(),
        ) {
            let signer = signer();
            let platform = Platform::ALL[idx];
            let token = signer.issue(&email, platform).unwrap();
            let claims = signer.verify(&token).unwrap();
            prop_assert_eq!(claims.subject_email, email);
            prop_assert_eq!(claims.platform, platform);
        }
    }
}
