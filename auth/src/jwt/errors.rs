use thiserror::Error;

/// Error type for token issuance and verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Subject identifier is empty")]
    InvalidSubject,

    #[error("Role is empty")]
    InvalidRole,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Unexpected signing method: {0}")]
    WrongAlgorithm(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotYetValid,

    #[error("Token was issued in the future")]
    IssuedInFuture,

    #[error("Token issuer is not accepted")]
    InvalidIssuer,

    #[error("Missing subject claim")]
    MissingSubjectClaim,

    #[error("Missing role claim")]
    MissingRoleClaim,
}
