use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::claims::Claims;
use super::claims::IdentityClaims;
use super::errors::JwtError;

const NIL_SUBJECT: &str = "00000000-0000-0000-0000-000000000000";

/// Immutable token configuration, supplied once at construction.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Symmetric signing secret
    pub secret: Vec<u8>,
    /// Value written to and required in the `iss` claim
    pub issuer: String,
    /// Seconds between `iat` and `exp`
    pub lifetime_seconds: i64,
}

/// JWT token handler for issuing and verifying identity tokens.
///
/// The signing algorithm is pinned to HS256 and never taken from the token.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    lifetime_seconds: i64,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Tokens cannot be revoked; a leaked secret or token stays usable
    ///   until the token's `exp`
    pub fn new(settings: TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&settings.secret),
            decoding_key: DecodingKey::from_secret(&settings.secret),
            algorithm: Algorithm::HS256,
            issuer: settings.issuer,
            lifetime_seconds: settings.lifetime_seconds,
        }
    }

    /// Issue a signed token for a subject and role.
    ///
    /// # Errors
    /// * `InvalidSubject` - Subject is empty or the nil UUID
    /// * `InvalidRole` - Role is empty
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str, role: &str) -> Result<String, JwtError> {
        if subject.trim().is_empty() || subject == NIL_SUBJECT {
            return Err(JwtError::InvalidSubject);
        }
        if role.trim().is_empty() {
            return Err(JwtError::InvalidRole);
        }

        let claims = Claims::for_identity(subject, role, &self.issuer, self.lifetime_seconds);
        self.encode(&claims)
    }

    /// Sign arbitrary claims with the pinned algorithm.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its identity claims.
    ///
    /// The declared algorithm is checked against the pinned one before the
    /// signature or any other header field is looked at.
    ///
    /// # Errors
    /// * `MalformedToken` - Token cannot be parsed or lacks a timestamp claim
    /// * `WrongAlgorithm` - Header declares an algorithm other than HS256
    /// * `InvalidSignature` - Signature does not verify under the secret
    /// * `Expired` / `NotYetValid` / `IssuedInFuture` - Timestamp checks failed
    /// * `InvalidIssuer` - `iss` differs from the configured issuer
    /// * `MissingSubjectClaim` / `MissingRoleClaim` - Claim absent or empty
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        let declared = declared_algorithm(token)?;
        match declared.parse::<Algorithm>() {
            Ok(algorithm) if algorithm == self.algorithm => {}
            _ => return Err(JwtError::WrongAlgorithm(declared)),
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(classify)?;
        let claims = token_data.claims;

        match claims.iat {
            None => return Err(JwtError::MalformedToken("missing iat claim".to_string())),
            Some(iat) if iat > Utc::now().timestamp() => return Err(JwtError::IssuedInFuture),
            Some(_) => {}
        }

        IdentityClaims::try_from(claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf"]);
        validation.set_issuer(&[&self.issuer]);
        validation
    }
}

/// Only the `alg` member of a JOSE header is read before the pin is checked.
#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

/// Read `alg` from the raw header segment.
///
/// Names the signing library has no variant for, such as `none`, still
/// come back as text so they classify as a wrong algorithm.
fn declared_algorithm(token: &str) -> Result<String, JwtError> {
    let (segment, _) = token
        .split_once('.')
        .ok_or_else(|| JwtError::MalformedToken("missing header segment".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwtError::MalformedToken(e.to_string()))?;
    let header: DeclaredHeader =
        serde_json::from_slice(&bytes).map_err(|e| JwtError::MalformedToken(e.to_string()))?;

    Ok(header.alg)
}

fn classify(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => JwtError::WrongAlgorithm(error.to_string()),
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::ImmatureSignature => JwtError::NotYetValid,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::MalformedToken(error.to_string()),
    }
}
