use std::sync::Arc;

use anyhow::{anyhow, Context};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tokio::sync::Semaphore;
use tracing::error;

/// Argon2 hashing on the blocking pool, at most `permits` jobs at a time.
#[derive(Clone)]
pub struct PasswordPool {
    permits: Arc<Semaphore>,
}

impl PasswordPool {
    pub fn new(concurrency: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Salted PHC string for `plain`.
    pub async fn hash(&self, plain: String) -> anyhow::Result<String> {
        let _permit = self.permits.acquire().await?;
        tokio::task::spawn_blocking(move || Self::hash_blocking(&plain))
            .await
            .context("hash task")?
    }

    /// `Ok(false)` on mismatch; `Err` only when `stored` is not a PHC string.
    pub async fn verify(&self, plain: String, stored: String) -> anyhow::Result<bool> {
        let _permit = self.permits.acquire().await?;
        tokio::task::spawn_blocking(move || Self::verify_blocking(&plain, &stored))
            .await
            .context("verify task")?
    }

    fn hash_blocking(plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| {
                error!(error = %e, "password hashing failed");
                anyhow!("password hashing failed: {e}")
            })
    }

    fn verify_blocking(plain: &str, stored: &str) -> anyhow::Result<bool> {
        let phc = PasswordHash::new(stored).map_err(|e| {
            error!(error = %e, "stored password hash is unreadable");
            anyhow!("stored password hash is unreadable: {e}")
        })?;
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &phc)
            .is_ok())
    }
}
