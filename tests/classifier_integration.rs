//! Classifier Integration Tests
//!
//! End-to-end classification scenarios through the public API, including the
//! wire shape handed to storage.

use app_core::embeds::{classify, EmbedClassifier, EmbedDescriptor, EmbedType};
use serde_json::json;

const WATCH: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const EMBED: &str = "https://www.youtube.com/embed/dQw4w9WgXcQ";
const THUMB: &str = "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg";

/// Test the documented scenarios end to end
#[test]
fn test_documented_scenarios() {
    let cases = [
        (
            WATCH,
            json!({ "type": "youtube", "embedUrl": EMBED, "thumbnail": THUMB }),
        ),
        (
            "https://youtu.be/dQw4w9WgXcQ",
            json!({ "type": "youtube", "embedUrl": EMBED, "thumbnail": THUMB }),
        ),
        (
            "https://twitter.com/jack/status/20",
            json!({ "type": "twitter", "embedUrl": "https://twitter.com/jack/status/20" }),
        ),
        (
            "https://example.com/photo.jpg",
            json!({ "type": "image", "embedUrl": "https://example.com/photo.jpg" }),
        ),
        (
            r#"<iframe src="https://www.youtube.com/embed/abc123XYZ90"></iframe>"#,
            json!({
                "type": "youtube",
                "embedUrl": "https://www.youtube.com/embed/abc123XYZ90",
                "thumbnail": "https://img.youtube.com/vi/abc123XYZ90/maxresdefault.jpg",
            }),
        ),
        (
            "not a url at all",
            json!({ "type": "link", "embedUrl": "not a url at all" }),
        ),
        ("", json!({ "type": "link", "embedUrl": "" })),
        (
            "youtube.com/watch?v=abc",
            json!({ "type": "link", "embedUrl": "youtube.com/watch?v=abc" }),
        ),
    ];

    for (input, expected) in cases {
        let embed = classify(input);
        assert_eq!(serde_json::to_value(&embed).unwrap(), expected, "input: {:?}", input);
    }
}

/// Test that a YouTube embed URL classifies to itself
#[test]
fn test_youtube_round_trip_is_stable() {
    let first = classify(WATCH);
    let second = classify(first.embed_url());
    let third = classify(second.embed_url());
    assert_eq!(first, second);
    assert_eq!(second, third);
}

/// Test that stored descriptors deserialize back to the same value
#[test]
fn test_descriptor_survives_storage_round_trip() {
    let inputs = [
        WATCH,
        "https://x.com/someone/status/1",
        r#"<iframe src="https://player.vimeo.com/video/1"></iframe>"#,
        "https://example.com/cat.gif",
        "mailto:someone@example.com",
    ];

    for input in inputs {
        let embed = classify(input);
        let stored = serde_json::to_string(&embed).unwrap();
        let loaded: EmbedDescriptor = serde_json::from_str(&stored).unwrap();
        assert_eq!(loaded, embed);
    }
}

/// Test that thumbnails only appear on YouTube descriptors
#[test]
fn test_thumbnail_only_on_youtube() {
    let inputs = [
        WATCH,
        "https://twitter.com/jack/status/20",
        "https://example.com/photo.png",
        "<blockquote class=\"twitter-tweet\"></blockquote>",
        "<iframe src=\"https://example.com\"></iframe>",
        "plain text",
    ];

    for input in inputs {
        let embed = classify(input);
        assert_eq!(embed.thumbnail().is_some(), embed.embed_type() == EmbedType::YouTube);
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json.get("thumbnail").is_some(), embed.is_youtube());
        assert!(json.get("title").is_none());
    }
}

/// Test concurrent classification from many threads
#[test]
fn test_concurrent_classification() {
    let classifier = EmbedClassifier::default();
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert!(classifier.classify(WATCH).is_youtube());
                    assert!(classifier.classify("nope").is_link());
                }
            });
        }
    });
}
