//! Session tokens
//!
//! Opaque HS256-signed claim sets. Stateless: the server holds no session
//! state and there is no revocation list.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use stackd_common::{Error, Principal, Result, Role};
use std::time::Duration;

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User name
    pub sub: String,
    /// User role at issuance time
    pub role: Role,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn principal(&self) -> Principal {
        Principal::new(self.sub.clone(), self.role)
    }
}

/// Signs and verifies session tokens with a shared secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `principal` valid for `ttl`
    pub fn issue(&self, principal: &Principal, ttl: Duration) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.name.clone(),
            role: principal.role,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("token encoding failed: {}", e);
            Error::AuthenticationFailed
        })
    }

    /// Verify signature and expiry, returning the embedded principal.
    ///
    /// Any failure collapses to `AuthenticationFailed`; callers never learn
    /// whether the signature or the expiry was at fault.
    pub fn verify(&self, token: &str) -> Result<Principal> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims.principal())
            .map_err(|e| {
                tracing::debug!("token rejected: {}", e);
                Error::AuthenticationFailed
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_preserves_identity() {
        let signer = TokenSigner::new("test-secret");
        let principal = Principal::new("alice", Role::Admin);

        let token = signer.issue(&principal, Duration::from_secs(60)).unwrap();
        let verified = signer.verify(&token).unwrap();

        assert_eq!(verified, principal);
    }

    #[test]
    fn wrong_secret_fails() {
        let signer = TokenSigner::new("test-secret");
        let other = TokenSigner::new("other-secret");
        let token = signer
            .issue(&Principal::new("alice", Role::User), Duration::from_secs(60))
            .unwrap();

        assert!(matches!(other.verify(&token), Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn expired_token_fails() {
        let signer = TokenSigner::new("test-secret");
        let now = Utc::now().timestamp();
        // Expired two minutes ago, past the decoder's default leeway.
        let claims = Claims {
            sub: "alice".into(),
            role: Role::User,
            iat: now - 300,
            exp: now - 120,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            signer.verify(&token),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn garbage_token_fails() {
        let signer = TokenSigner::new("test-secret");
        assert!(matches!(
            signer.verify("not-a-token"),
            Err(Error::AuthenticationFailed)
        ));
    }
}
