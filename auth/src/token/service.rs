use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and verifies signed bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signing secret and token lifetime are
/// fixed at construction and shared process-wide; nothing about a request can
/// influence either.
///
/// # Security Notes
/// - The secret should be at least 256 bits (32 bytes) for HS256
/// - Store secrets in environment variables or secure vaults, never in code
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Create a new token service.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `ttl` - Lifetime of every issued token
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a signed token for a subject.
    ///
    /// The token carries `iat = now` and `exp = now + ttl`, read from the
    /// same clock `verify` uses.
    ///
    /// # Arguments
    /// * `subject` - Account identifier the token will prove
    ///
    /// # Returns
    /// Compact signed token string
    ///
    /// # Errors
    /// * `IssueFailed` - Token signing failed
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims::new(subject, now.timestamp(), (now + self.ttl).timestamp());

        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::IssueFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// The signature is checked first, then expiry. A token is rejected from
    /// the instant `exp` is reached; no clock-skew leeway is applied.
    ///
    /// # Arguments
    /// * `token` - Compact token string presented by a client
    ///
    /// # Returns
    /// Verified claims
    ///
    /// # Errors
    /// * `Expired` - Token lifetime is over
    /// * `InvalidSignature` - Token was not signed with this service's secret
    /// * `Malformed` - Token is not a parseable signed structure
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the issuing clock, strictly and
        // without leeway; jsonwebtoken's own exp check stays out of the way.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
