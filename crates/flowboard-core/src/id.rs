//! ID generation for columns and tasks
//!
//! Ids combine a hashed random suffix with a per-generator counter, so two ids
//! drawn in the same instant still differ.
//! Format: prefix-xxxx-N (4 lowercase base32 chars, then the counter)

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generates fresh column and task ids.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    counter: u64,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Draw the next id.
    pub fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("{}-{}-{}", self.prefix, hash_suffix(), self.counter)
    }

    /// Draw ids until one is not `taken`.
    pub fn next_unique(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.next_id();
            if !taken(&id) {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("fb")
    }
}

/// UUID + timestamp hash, encoded as base32 lowercase, first 4 chars.
fn hash_suffix() -> String {
    let uuid = Uuid::new_v4();
    let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(uuid.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    let hash = hasher.finalize();

    base32::encode(base32::Alphabet::Crockford, &hash[..4])
        .to_lowercase()
        .chars()
        .take(4)
        .collect()
}
