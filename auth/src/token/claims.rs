use serde::Deserialize;
use serde::Serialize;

/// Claim set carried by every issued token.
///
/// The subject is the account identifier the token proves; `iat` and `exp`
/// are Unix timestamps taken from the issuing clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject with explicit timestamps.
    pub fn new(sub: impl ToString, iat: i64, exp: i64) -> Self {
        Self {
            sub: sub.to_string(),
            iat,
            exp,
        }
    }

    /// Check whether the claims are expired at the given instant.
    ///
    /// A token is expired from the moment `exp` is reached.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
