use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand_core::OsRng;

// Argon2 parameters for 50-150ms target latency
pub const ARGON2_M_COST: u32 = 19456; // 19 MB
pub const ARGON2_T_COST: u32 = 2; // 2 iterations
pub const ARGON2_P_COST: u32 = 1; // 1 parallelism

/// Work factor for password hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingCost {
    fn default() -> Self {
        Self {
            memory_kib: ARGON2_M_COST,
            iterations: ARGON2_T_COST,
            parallelism: ARGON2_P_COST,
        }
    }
}

/// One-way password hashing and verification (Argon2id, PHC string format).
#[derive(Debug, Clone)]
pub struct PasswordSecurity {
    params: argon2::Params,
}

impl PasswordSecurity {
    pub fn new(cost: HashingCost) -> Result<Self, argon2::Error> {
        let params = argon2::Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.clone(),
        )
    }

    pub fn hash_password(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Verifies against the parameters recorded in `hash`, so hashes created
    /// under an older cost keep working.
    pub fn verify_password(
        &self,
        password: &str,
        hash: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}
