//! Shared-secret gate in front of configuration changes.

use crate::error::{RackError, RackResult};

/// Environment variable holding the admin secret.
pub const ADMIN_SECRET_ENV: &str = "RACKSEARCH_ADMIN_SECRET";

/// Checks candidate secrets against one fixed shared secret.
///
/// With no secret configured every attempt is denied.
#[derive(Clone, Default)]
pub struct AdminGate {
    secret: Option<String>,
}

impl AdminGate {
    /// Create a gate. An empty secret counts as no secret.
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Read the secret from [`ADMIN_SECRET_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(ADMIN_SECRET_ENV).ok())
    }

    /// Whether admin access is possible at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check a candidate secret.
    ///
    /// # Errors
    ///
    /// `RackError::AccessDenied` on any mismatch.
    pub fn verify(&self, candidate: &str) -> RackResult<()> {
        match &self.secret {
            Some(secret) if constant_time_eq(secret.as_bytes(), candidate.as_bytes()) => Ok(()),
            _ => {
                tracing::warn!("admin access denied");
                Err(RackError::AccessDenied)
            }
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
