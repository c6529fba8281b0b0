use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// `update_seq` tokens are opaque but the test corpus asserts a fixed
/// length on them; 138 matches the source this was distilled from.
pub const UPDATE_SEQ_LEN: usize = 138;

/// Generates document ids, revision tokens, and update-sequence tokens.
///
/// Revision hashes are deterministic given `(generation, prior_hash)` plus
/// an internal counter and a fresh source of entropy. Only the `N-`
/// generation prefix is externally meaningful; the hash tail is free.
#[derive(Debug, Default)]
pub struct IdGen {
    counter: AtomicU64,
}

impl IdGen {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Opaque id, unique within the process lifetime. Clients must treat
    /// this as opaque; length and alphabet are not contractual.
    pub fn new_doc_id(&self) -> String {
        self.counter.fetch_add(1, Ordering::Relaxed);
        Uuid::new_v4().simple().to_string()
    }

    /// `"{generation}-{hash}"` where hash is >= 32 hex chars.
    pub fn new_rev(&self, generation: u64, prior_hash: Option<&str>) -> String {
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(generation.to_be_bytes());
        hasher.update(prior_hash.unwrap_or("").as_bytes());
        hasher.update(count.to_be_bytes());
        hasher.update(Uuid::new_v4().as_bytes());
        let hash = hex::encode(hasher.finalize());
        format!("{generation}-{hash}")
    }

    /// 138-character opaque token, refreshed on every mutation.
    pub fn new_update_seq(&self) -> String {
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(count.to_be_bytes());
        hasher.update(Uuid::new_v4().as_bytes());
        let digest_hex = hex::encode(hasher.finalize());

        let mut raw = format!(
            "{count:020}{digest_hex}{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        while raw.len() < UPDATE_SEQ_LEN {
            raw.push_str(&hex::encode(Uuid::new_v4().as_bytes()));
        }
        raw.truncate(UPDATE_SEQ_LEN);
        raw
    }
}
