//! Core application logic for Second Brain
//!
//! This crate contains the embed classifier that turns saved links and embed
//! snippets into renderable descriptors, plus the content and sharing logic
//! built around it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod embeds;
pub mod sanitize;
pub mod sharing;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use content::{
    AuthenticatedUser, ContentDraft, ContentError, ContentFilter, ContentRecord, ContentService,
    ContentStore, ContentType,
};
pub use embeds::{
    classify, ClassifierConfig, EmbedClassifier, EmbedDescriptor, EmbedKind, EmbedType,
};
pub use sharing::{ShareConfig, ShareLink, ShareOutcome, ShareRegistry};
