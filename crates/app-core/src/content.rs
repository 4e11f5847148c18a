//! Saved content items
//!
//! This module validates create/update payloads, classifies their links into
//! embed descriptors, and hands the resulting records to a [`ContentStore`].
//! Storage and authentication are collaborators: the store is injected into
//! [`ContentService`] and the caller's identity is passed into every call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::embeds::{is_embed_markup, EmbedClassifier, EmbedDescriptor, EmbedType};
use crate::sharing::ShareRegistry;

/// Errors that can occur during content operations
#[derive(Debug, Error)]
pub enum ContentError {
    /// Required field is missing or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Link is neither an absolute URL nor an embed snippet
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// Content item not found
    #[error("Content not found: {0}")]
    NotFound(Uuid),

    /// Content item belongs to another user
    #[error("Content {0} is not owned by the current user")]
    Forbidden(Uuid),

    /// Share hash is unknown or its link has been turned off
    #[error("Shared content not found: {0}")]
    ShareNotFound(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Store(String),
}

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Kind of content the user says they are saving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Text, articles, documents
    Text,
    /// Images
    Image,
    /// Videos
    Video,
    /// Audio
    Audio,
}

impl ContentType {
    /// Get the content type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
        }
    }
}

/// Identity supplied by the authentication layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// User ID
    pub id: String,
    /// Display name
    pub user_name: String,
    /// Email address
    pub email: String,
}

/// Create or update payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    /// URL or embed snippet
    pub link: String,
    /// Title
    pub title: String,
    /// Declared content type
    pub content_type: ContentType,
    /// Description
    pub description: String,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A saved content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Record ID
    pub id: Uuid,
    /// Owning user ID
    pub owner_id: String,
    /// URL or embed snippet as submitted
    pub link: String,
    /// Title
    pub title: String,
    /// Declared content type
    pub content_type: ContentType,
    /// Description
    pub description: String,
    /// Normalized tags
    pub tags: Vec<String>,
    /// Classified embed
    pub embed_info: EmbedDescriptor,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Filter for listing content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    /// Only items with this declared content type
    pub content_type: Option<ContentType>,
    /// Only items classified as this embed type
    pub embed_type: Option<EmbedType>,
}

impl ContentFilter {
    /// Check if a record passes the filter
    pub fn matches(&self, record: &ContentRecord) -> bool {
        self.content_type.map_or(true, |t| record.content_type == t)
            && self
                .embed_type
                .map_or(true, |t| record.embed_info.embed_type() == t)
    }
}

/// Validate a draft before it is classified and stored
///
/// Embed snippets skip URL validation; everything else must be an absolute
/// URL.
pub fn validate_draft(draft: &ContentDraft) -> Result<()> {
    for (name, value) in [
        ("link", &draft.link),
        ("title", &draft.title),
        ("description", &draft.description),
    ] {
        if value.trim().is_empty() {
            return Err(ContentError::MissingField(name));
        }
    }

    if !is_embed_markup(&draft.link) && Url::parse(&draft.link).is_err() {
        return Err(ContentError::InvalidUrl(draft.link.clone()));
    }

    Ok(())
}

/// Trim tags, drop empty ones, and remove duplicates keeping first occurrence
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Persistence for content records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a new record
    async fn insert(&self, record: ContentRecord) -> Result<()>;

    /// Get a record by ID
    async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>>;

    /// Replace an existing record
    async fn update(&self, record: ContentRecord) -> Result<()>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// List all records owned by a user
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ContentRecord>>;
}

/// Content service for saving and managing classified content
pub struct ContentService<S: ContentStore> {
    store: Arc<S>,
    classifier: EmbedClassifier,
}

impl<S: ContentStore> ContentService<S> {
    /// Create a new content service with the default classifier
    pub fn new(store: Arc<S>) -> Self {
        Self::with_classifier(store, EmbedClassifier::default())
    }

    /// Create a new content service with a specific classifier
    pub fn with_classifier(store: Arc<S>, classifier: EmbedClassifier) -> Self {
        Self { store, classifier }
    }

    /// Validate, classify, and save a new content item
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        draft: ContentDraft,
    ) -> Result<ContentRecord> {
        validate_draft(&draft)?;

        let now = Utc::now();
        let record = ContentRecord {
            id: Uuid::new_v4(),
            owner_id: user.id.clone(),
            embed_info: self.classifier.classify(&draft.link),
            tags: normalize_tags(&draft.tags),
            link: draft.link,
            title: draft.title,
            content_type: draft.content_type,
            description: draft.description,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(record.clone()).await?;
        info!(
            id = %record.id,
            owner = %record.owner_id,
            embed_type = %record.embed_info.embed_type(),
            "content created"
        );
        Ok(record)
    }

    /// Replace an owned content item, re-classifying its link
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        draft: ContentDraft,
    ) -> Result<ContentRecord> {
        let existing = self.owned(user, id).await?;
        validate_draft(&draft)?;

        let record = ContentRecord {
            id: existing.id,
            owner_id: existing.owner_id,
            embed_info: self.classifier.classify(&draft.link),
            tags: normalize_tags(&draft.tags),
            link: draft.link,
            title: draft.title,
            content_type: draft.content_type,
            description: draft.description,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.store.update(record.clone()).await?;
        info!(id = %record.id, "content updated");
        Ok(record)
    }

    /// Delete an owned content item
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        self.owned(user, id).await?;
        if !self.store.delete(id).await? {
            return Err(ContentError::NotFound(id));
        }
        info!(%id, "content deleted");
        Ok(())
    }

    /// Get an owned content item
    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ContentRecord> {
        self.owned(user, id).await
    }

    /// List the user's content, newest first
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        filter: &ContentFilter,
    ) -> Result<Vec<ContentRecord>> {
        let mut records: Vec<ContentRecord> = self
            .store
            .list_by_owner(&user.id)
            .await?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        newest_first(&mut records);
        debug!(owner = %user.id, count = records.len(), "listed content");
        Ok(records)
    }

    /// List everything the owner of an active share link has saved, newest
    /// first
    ///
    /// Needs no authenticated user: the hash is the credential.
    pub async fn list_shared(
        &self,
        registry: &ShareRegistry,
        hash: &str,
    ) -> Result<Vec<ContentRecord>> {
        let owner_id = registry
            .resolve(hash)
            .await
            .ok_or_else(|| ContentError::ShareNotFound(hash.to_string()))?;

        let mut records = self.store.list_by_owner(&owner_id).await?;
        newest_first(&mut records);
        debug!(%hash, owner = %owner_id, count = records.len(), "listed shared content");
        Ok(records)
    }

    async fn owned(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ContentRecord> {
        let record = self.store.get(id).await?.ok_or(ContentError::NotFound(id))?;
        if record.owner_id != user.id {
            return Err(ContentError::Forbidden(id));
        }
        Ok(record)
    }
}

fn newest_first(records: &mut [ContentRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
