//! Static airline allowlist
//!
//! Privileged airline identities live in configuration, not in the credential
//! store. The table is built once at startup and never mutated; lookups are
//! exact-match on normalized email with constant-time password comparison.

use std::collections::HashMap;

use crate::core::config::AirlineEntryConfig;
use crate::utils::crypto::constant_time_eq;

/// Immutable table of privileged airline identities
#[derive(Debug, Default)]
pub struct AirlineAllowlist {
    entries: HashMap<String, AirlineEntryConfig>,
}

impl AirlineAllowlist {
    /// Build the allowlist from configuration entries, keyed by normalized email
    pub fn from_entries(entries: &[AirlineEntryConfig]) -> Self {
        let entries: HashMap<String, AirlineEntryConfig> = entries
            .iter()
            .map(|e| (normalize_email(&e.email), e.clone()))
            .collect();

        tracing::debug!(count = entries.len(), "Airline allowlist loaded");
        Self { entries }
    }

    /// Look up an entry by email + password
    ///
    /// Returns the entry only when the normalized email exists AND the
    /// password matches in constant time.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&AirlineEntryConfig> {
        self.entries
            .get(&normalize_email(email))
            .filter(|entry| constant_time_eq(&entry.password, password))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize an email for lookups and storage: trim then lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
