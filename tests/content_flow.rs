//! Content Flow Integration Tests
//!
//! Saving, listing, and sharing content through the public services.

use std::sync::Arc;

use app_core::test_utils::{drafts, users, MemoryContentStore};
use app_core::{
    ContentError, ContentFilter, ContentService, EmbedType, ShareConfig, ShareOutcome,
    ShareRegistry,
};

/// Test saving one item of each kind and reading them back
#[tokio::test]
async fn test_save_each_kind() {
    let store = Arc::new(MemoryContentStore::new());
    let service = ContentService::new(store.clone());
    let alice = users::alice();

    let expected = [
        (drafts::youtube(), EmbedType::YouTube),
        (drafts::tweet_snippet(), EmbedType::Twitter),
        (drafts::image(), EmbedType::Image),
        (drafts::article(), EmbedType::Link),
    ];

    for (draft, embed_type) in expected {
        let record = service.create(&alice, draft).await.unwrap();
        assert_eq!(record.embed_info.embed_type(), embed_type);
        let loaded = service.get(&alice, record.id).await.unwrap();
        assert_eq!(loaded, record);
    }

    assert_eq!(store.len().await, 4);

    let images = service
        .list(
            &alice,
            &ContentFilter {
                embed_type: Some(EmbedType::Image),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].link, "https://example.com/photo.jpg");
}

/// Test that tweet snippets keep their raw markup for rendering
#[tokio::test]
async fn test_tweet_snippet_renders_without_scripts() {
    let service = ContentService::new(Arc::new(MemoryContentStore::new()));
    let record = service.create(&users::alice(), drafts::tweet_snippet()).await.unwrap();

    assert_eq!(record.embed_info.embed_url(), "https://twitter.com/jack/status/20");
    let markup = record.embed_info.render_markup(&record.link).unwrap();
    assert!(markup.starts_with("<blockquote"));
    assert!(!markup.contains("<script"));
}

/// Test that another user cannot see or edit content
#[tokio::test]
async fn test_content_is_isolated_per_user() {
    let service = ContentService::new(Arc::new(MemoryContentStore::new()));
    let record = service.create(&users::alice(), drafts::article()).await.unwrap();

    let bobs = service.list(&users::bob(), &ContentFilter::default()).await.unwrap();
    assert!(bobs.is_empty());

    let err = service.get(&users::bob(), record.id).await.unwrap_err();
    assert!(matches!(err, ContentError::Forbidden(_)));
}

/// Test the share link lifecycle alongside saved content
#[tokio::test]
async fn test_share_lifecycle() {
    let service = ContentService::new(Arc::new(MemoryContentStore::new()));
    let registry = ShareRegistry::new();
    let config = ShareConfig {
        base_url: "https://brain.example.com".to_string(),
    };
    let alice = users::alice();
    service.create(&alice, drafts::youtube()).await.unwrap();

    let (link, outcome) = registry.share(&alice.id).await;
    assert_eq!(outcome, ShareOutcome::Shared);
    assert_eq!(
        config.share_url(&link.hash),
        format!("https://brain.example.com/shared/{}", link.hash)
    );

    // Visitors only hold the hash
    let shared = service.list_shared(&registry, &link.hash).await.unwrap();
    assert_eq!(shared.len(), 1);
    assert!(shared[0].embed_info.is_youtube());
    assert_eq!(shared[0].owner_id, alice.id);

    // Bob's content stays out of Alice's shared view
    service.create(&users::bob(), drafts::article()).await.unwrap();
    assert_eq!(service.list_shared(&registry, &link.hash).await.unwrap().len(), 1);

    registry.unshare(&alice.id).await.unwrap();
    assert!(registry.resolve(&link.hash).await.is_none());
    let err = service.list_shared(&registry, &link.hash).await.unwrap_err();
    assert!(matches!(err, ContentError::ShareNotFound(_)));

    // Re-sharing issues a fresh hash; the old one stays dead
    let (again, outcome) = registry.share(&alice.id).await;
    assert_eq!(outcome, ShareOutcome::Shared);
    assert_ne!(again.hash, link.hash);
    assert_eq!(service.list_shared(&registry, &again.hash).await.unwrap().len(), 1);
    assert!(service.list_shared(&registry, &link.hash).await.is_err());
}
