use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PhcError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Argon2id cost parameters.
///
/// Part of the deployed contract: every hash records the work factor it was
/// produced with, so raising it only affects newly hashed passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl WorkFactor {
    /// Argon2id, 19 MiB, 2 passes, 1 lane.
    pub const DEFAULT: WorkFactor = WorkFactor {
        memory_kib: 19_456,
        iterations: 2,
        parallelism: 1,
    };
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Password hashing implementation.
///
/// Produces salted Argon2id hashes in PHC string format and verifies
/// candidates against them in constant time.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    work_factor: WorkFactor,
}

impl PasswordHasher {
    /// Create a new password hasher using [`WorkFactor::DEFAULT`].
    pub fn new() -> Self {
        Self::with_work_factor(WorkFactor::DEFAULT)
    }

    /// Create a password hasher with explicit cost parameters.
    pub fn with_work_factor(work_factor: WorkFactor) -> Self {
        Self { work_factor }
    }

    /// Work factor applied to newly hashed passwords.
    pub fn work_factor(&self) -> WorkFactor {
        self.work_factor
    }

    /// Hash a plaintext password.
    ///
    /// A random salt is generated per call and embedded in the output
    /// together with the algorithm parameters.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Invalid work factor or hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let params = Params::new(
            self.work_factor.memory_kib,
            self.work_factor.iterations,
            self.work_factor.parallelism,
            None,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters are taken from the stored hash, not from this hasher's
    /// work factor.
    ///
    /// # Arguments
    /// * `password` - Plaintext candidate
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match the hash
    /// * `InvalidHash` - Stored hash cannot be parsed or carries bad parameters
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(PhcError::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::InvalidHash(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
