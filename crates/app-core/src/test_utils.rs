//! Test utilities and fixtures for content and sharing tests
//!
//! This module provides an in-memory [`ContentStore`], test users, and
//! draft fixtures covering each embed type.

#![allow(dead_code)] // Test utilities may not all be used yet

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::content::{
    AuthenticatedUser, ContentDraft, ContentError, ContentRecord, ContentStore, ContentType,
    Result,
};
use crate::embeds::classify;

/// In-memory content store keyed by record ID
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    records: RwLock<HashMap<Uuid, ContentRecord>>,
}

impl MemoryContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn insert(&self, record: ContentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(ContentError::Store(format!("duplicate id {}", record.id)));
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(&self, record: ContentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(ContentError::NotFound(record.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ContentRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

/// Build a stored record for a draft without going through the service
pub fn record_for(user: &AuthenticatedUser, draft: ContentDraft) -> ContentRecord {
    let now = Utc::now();
    ContentRecord {
        id: Uuid::new_v4(),
        owner_id: user.id.clone(),
        embed_info: classify(&draft.link),
        link: draft.link,
        title: draft.title,
        content_type: draft.content_type,
        description: draft.description,
        tags: draft.tags,
        created_at: now,
        updated_at: now,
    }
}

/// Test users
pub mod users {
    use super::*;

    /// Alice
    pub fn alice() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "64f0c2a1e4b0a1b2c3d4e5f6".to_string(),
            user_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    /// Bob
    pub fn bob() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "64f0c2a1e4b0a1b2c3d4e5f7".to_string(),
            user_name: "bob".to_string(),
            email: "bob@example.com".to_string(),
        }
    }
}

/// Draft fixtures
pub mod drafts {
    use super::*;

    fn draft(link: &str, content_type: ContentType, tags: &[&str]) -> ContentDraft {
        ContentDraft {
            link: link.to_string(),
            title: "Saved item".to_string(),
            content_type,
            description: "Something worth keeping".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// YouTube watch URL
    pub fn youtube() -> ContentDraft {
        draft(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            ContentType::Video,
            &["music", "classic"],
        )
    }

    /// Tweet embed snippet
    pub fn tweet_snippet() -> ContentDraft {
        draft(
            r#"<blockquote class="twitter-tweet"><a href="https://twitter.com/jack/status/20">March 21, 2006</a></blockquote><script async src="https://platform.twitter.com/widgets.js"></script>"#,
            ContentType::Text,
            &["history"],
        )
    }

    /// Direct image URL
    pub fn image() -> ContentDraft {
        draft("https://example.com/photo.jpg", ContentType::Image, &[])
    }

    /// Plain article link
    pub fn article() -> ContentDraft {
        draft("https://example.com/article", ContentType::Text, &["reading"])
    }
}
