use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims as they travel inside a token.
///
/// Every field is optional on the wire so that a structurally valid token
/// with absent claims can be classified precisely instead of failing with a
/// generic deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Role name (canonical names are `USER` and `ADMIN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims for a freshly authenticated identity.
    ///
    /// `iat` and `nbf` are set to now, `exp` to now + `lifetime_seconds`.
    pub fn for_identity(
        subject: impl ToString,
        role: impl ToString,
        issuer: impl ToString,
        lifetime_seconds: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::seconds(lifetime_seconds);

        Self {
            sub: Some(subject.to_string()),
            role: Some(role.to_string()),
            iss: Some(issuer.to_string()),
            iat: Some(now.timestamp()),
            nbf: Some(now.timestamp()),
            exp: Some(expiration.timestamp()),
        }
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set role.
    pub fn with_role(mut self, role: impl ToString) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set not before (Unix timestamp).
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(true, |exp| exp < current_timestamp)
    }
}

/// Claims of a token that passed verification.
///
/// Only produced by [`JwtHandler::verify`](super::JwtHandler::verify);
/// subject and role are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub subject: String,
    pub role: String,
    pub issuer: String,
    pub issued_at: i64,
    pub not_before: i64,
    pub expires_at: i64,
}

impl TryFrom<Claims> for IdentityClaims {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let subject = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(JwtError::MissingSubjectClaim)?;
        let role = claims
            .role
            .filter(|r| !r.is_empty())
            .ok_or(JwtError::MissingRoleClaim)?;
        let issued_at = claims
            .iat
            .ok_or_else(|| JwtError::MalformedToken("missing iat claim".to_string()))?;
        let not_before = claims
            .nbf
            .ok_or_else(|| JwtError::MalformedToken("missing nbf claim".to_string()))?;
        let expires_at = claims
            .exp
            .ok_or_else(|| JwtError::MalformedToken("missing exp claim".to_string()))?;

        Ok(Self {
            subject,
            role,
            issuer: claims.iss.unwrap_or_default(),
            issued_at,
            not_before,
            expires_at,
        })
    }
}
