//! Public read-only share links
//!
//! Each user has at most one share link. Sharing again while the link is
//! active returns the existing hash; sharing after it was turned off issues
//! a fresh hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Length of a share hash in hex characters
pub const SHARE_HASH_LEN: usize = 12;

/// Errors that can occur during share operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    /// No share link exists for the user
    #[error("No share link found for user: {0}")]
    NotFound(String),
}

/// Result type for share operations
pub type Result<T> = std::result::Result<T, ShareError>;

/// Generate a fresh share hash (12 lowercase hex characters)
pub fn generate_share_hash() -> String {
    // The first six bytes of a v4 UUID are fully random.
    let mut hash = Uuid::new_v4().simple().to_string();
    hash.truncate(SHARE_HASH_LEN);
    hash
}

/// Share link configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareConfig {
    /// Public base URL of the application
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl ShareConfig {
    /// Public URL for a share hash
    pub fn share_url(&self, hash: &str) -> String {
        format!("{}/shared/{}", self.base_url.trim_end_matches('/'), hash)
    }
}

/// A user's share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    /// Owning user ID
    pub owner_id: String,
    /// Public hash
    pub hash: String,
    /// Whether the link currently resolves
    pub active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl ShareLink {
    /// Create an active share link with a fresh hash
    pub fn new(owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            owner_id: owner_id.into(),
            hash: generate_share_hash(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Turn the link back on under a new hash
    fn reactivate(&mut self, hash: String) {
        self.hash = hash;
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Turn the link off
    fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }
}

/// Result of a share request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareOutcome {
    /// A link was created or reactivated
    Shared,
    /// An active link already existed and was returned unchanged
    AlreadyShared,
}

/// In-process registry of share links keyed by owner
#[derive(Debug, Default)]
pub struct ShareRegistry {
    links: RwLock<HashMap<String, ShareLink>>,
}

impl ShareRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Share a user's content, creating or reactivating their link
    pub async fn share(&self, owner_id: &str) -> (ShareLink, ShareOutcome) {
        let mut links = self.links.write().await;

        if let Some(link) = links.get(owner_id) {
            if link.active {
                return (link.clone(), ShareOutcome::AlreadyShared);
            }
        }

        let hash = loop {
            let candidate = generate_share_hash();
            if !links.values().any(|l| l.hash == candidate) {
                break candidate;
            }
        };

        let link = match links.get_mut(owner_id) {
            Some(existing) => {
                existing.reactivate(hash);
                existing.clone()
            }
            None => {
                let link = ShareLink {
                    hash,
                    ..ShareLink::new(owner_id)
                };
                links.insert(owner_id.to_string(), link.clone());
                link
            }
        };

        info!(owner = %owner_id, hash = %link.hash, "share link activated");
        (link, ShareOutcome::Shared)
    }

    /// Turn off a user's share link
    pub async fn unshare(&self, owner_id: &str) -> Result<ShareLink> {
        let mut links = self.links.write().await;
        let link = links
            .get_mut(owner_id)
            .ok_or_else(|| ShareError::NotFound(owner_id.to_string()))?;
        link.deactivate();
        info!(owner = %owner_id, "share link deactivated");
        Ok(link.clone())
    }

    /// Get a user's active share link
    pub async fn status(&self, owner_id: &str) -> Option<ShareLink> {
        self.links
            .read()
            .await
            .get(owner_id)
            .filter(|l| l.active)
            .cloned()
    }

    /// Resolve a public hash to its owner; inactive links do not resolve
    pub async fn resolve(&self, hash: &str) -> Option<String> {
        self.links
            .read()
            .await
            .values()
            .find(|l| l.active && l.hash == hash)
            .map(|l| l.owner_id.clone())
    }
}
