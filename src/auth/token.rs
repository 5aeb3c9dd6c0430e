use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, Identity};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issues and verifies HS256 credentials with a shared secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Sign a credential naming `email`
    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify an `Authorization` header value and return its identity.
    ///
    /// The token is whatever follows the first space; the scheme word is not
    /// inspected. Never touches storage.
    pub fn verify(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingCredential)?;

        let token = match header.split_once(' ') {
            Some((_, token)) if !token.is_empty() => token,
            _ => return Err(AuthError::InvalidCredential("malformed authorization header".to_string())),
        };

        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;

        Ok(Identity {
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("s3cret", 10)
    }

    #[test]
    fn issued_token_verifies_to_same_email() {
        let tokens = service();
        let token = tokens.issue("alice@example.com").unwrap();

        let identity = tokens.verify(Some(&format!("Bearer {}", token))).unwrap();
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn token_expires_after_ttl_days() {
        let tokens = service();
        let token = tokens.issue("alice@example.com").unwrap();
        let claims = decode::<Claims>(&token, &tokens.decoding_key, &Validation::default())
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, 10 * 24 * 60 * 60);
    }

    #[test]
    fn missing_header_is_missing_credential() {
        assert!(matches!(service().verify(None), Err(AuthError::MissingCredential)));
    }

    #[test]
    fn header_without_space_is_invalid() {
        let token = service().issue("alice@example.com").unwrap();
        assert!(matches!(
            service().verify(Some(&token)),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn extra_whitespace_around_token_is_invalid() {
        let tokens = service();
        let token = tokens.issue("alice@example.com").unwrap();

        for header in [format!("Bearer  {}", token), format!("Bearer {} ", token), "Bearer ".to_string()] {
            assert!(matches!(
                tokens.verify(Some(&header)),
                Err(AuthError::InvalidCredential(_))
            ));
        }
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let foreign = TokenService::new("other", 10).issue("alice@example.com").unwrap();
        assert!(matches!(
            service().verify(Some(&format!("Bearer {}", foreign))),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let tokens = service();
        let token = tokens.issue("alice@example.com").unwrap();
        let mallory = tokens.issue("mallory@example.com").unwrap();

        // Splice mallory's payload under alice's signature
        let alice_parts: Vec<&str> = token.split('.').collect();
        let mallory_parts: Vec<&str> = mallory.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], mallory_parts[1], alice_parts[2]);

        assert!(matches!(
            tokens.verify(Some(&format!("Bearer {}", forged))),
            Err(AuthError::InvalidCredential(_))
        ));
    }

    #[test]
    fn expired_token_is_invalid() {
        let tokens = service();
        let past = Utc::now() - Duration::days(11);
        let claims = Claims {
            email: "alice@example.com".to_string(),
            exp: (past + Duration::days(10)).timestamp(),
            iat: past.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding_key).unwrap();

        assert!(matches!(
            tokens.verify(Some(&format!("Bearer {}", token))),
            Err(AuthError::InvalidCredential(_))
        ));
    }
}
