//! Bearer token issuance and verification.
//!
//! Tokens are a base64url-encoded JSON claims blob plus an HMAC-SHA256
//! signature over it, giving the same observable behavior as the JWTs the
//! service issues conceptually: subject plus expiry, signed with a shared
//! secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use parley_core::error::{ParleyError, Result};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the username the token was issued to.
    sub: String,
    /// Expiry as unix seconds.
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: Vec<u8>,
    ttl_minutes: i64,
}

impl TokenService {
    pub fn new(secret: impl AsRef<[u8]>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl_minutes,
        }
    }

    /// Issues a token for a username, valid for the configured lifetime.
    pub fn issue(&self, username: &str) -> Result<String> {
        let claims = Claims {
            sub: username.to_string(),
            exp: (Utc::now() + Duration::minutes(self.ttl_minutes)).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes())?);
        Ok(format!("{}.{}", payload, signature))
    }

    /// Verifies a token and returns the subject username.
    ///
    /// # Errors
    ///
    /// Returns an `Auth` error for malformed, tampered or expired tokens.
    pub fn verify(&self, token: &str) -> Result<String> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| ParleyError::auth("malformed token"))?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| ParleyError::auth("malformed token signature"))?;
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| ParleyError::auth("invalid token signature"))?;

        let claims: Claims = serde_json::from_slice(
            &URL_SAFE_NO_PAD
                .decode(payload)
                .map_err(|_| ParleyError::auth("malformed token payload"))?,
        )
        .map_err(|_| ParleyError::auth("malformed token claims"))?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(ParleyError::auth("token expired"));
        }
        Ok(claims.sub)
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| ParleyError::internal("invalid token secret"))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = TokenService::new("test-secret", 60);
        let token = service.issue("alice").unwrap();
        assert_eq!(service.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = TokenService::new("test-secret", 60);
        let token = service.issue("alice").unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let forged_payload =
            URL_SAFE_NO_PAD.encode(r#"{"sub":"mallory","exp":9999999999}"#.as_bytes());
        let forged = format!("{}.{}", forged_payload, signature);

        assert!(service.verify(&forged).unwrap_err().is_auth());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a", 60);
        let verifier = TokenService::new("secret-b", 60);
        let token = issuer.issue("alice").unwrap();

        assert!(verifier.verify(&token).unwrap_err().is_auth());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new("test-secret", -1);
        let token = service.issue("alice").unwrap();
        assert!(service.verify(&token).unwrap_err().is_auth());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new("test-secret", 60);
        assert!(service.verify("not-a-token").unwrap_err().is_auth());
        assert!(service.verify("a.b.c").unwrap_err().is_auth());
        assert!(service.verify("").unwrap_err().is_auth());
    }
}
