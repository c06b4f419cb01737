//! Share link tokens.
//!
//! The raw token is only ever handed to the project owner; the database
//! keeps its SHA-256 digest.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A freshly minted share token and the digest to persist.
#[derive(Debug, Clone)]
pub struct ShareToken {
    pub token: String,
    pub hash: String,
}

impl ShareToken {
    pub fn generate() -> Self {
        let token = Uuid::new_v4().simple().to_string();
        let hash = hash_share_token(&token);
        Self { token, hash }
    }
}

/// Hex SHA-256 digest of a share token.
pub fn hash_share_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Public URL of a shared project.
pub fn share_url(frontend_url: &str, token: &str) -> String {
    format!("{}/shared-project/{}", frontend_url.trim_end_matches('/'), token)
}
