//! Minimal cleanup for embed snippets rendered as raw markup

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::embeds::{is_embed_markup, EmbedDescriptor, EmbedType};

fn script_regex() -> &'static Regex {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    SCRIPT.get_or_init(|| Regex::new(r"(?i)<script[^>]*>.*?</script>").unwrap())
}

/// Remove `<script>` elements from an embed snippet
///
/// Matching is case-insensitive and does not span lines, so a script whose
/// body contains a newline is left in place. This is not a general HTML
/// sanitizer.
pub fn strip_script_tags(html: &str) -> Cow<'_, str> {
    script_regex().replace_all(html, "")
}

impl EmbedDescriptor {
    /// Markup to inject when this embed is displayed from its raw snippet
    ///
    /// Iframe embeds are shown as raw markup when the saved source is a
    /// snippet. Twitter embeds only when the source is a `<blockquote>`; any
    /// other twitter embed renders as a plain anchor.
    pub fn render_markup(&self, source: &str) -> Option<String> {
        let raw = match self.embed_type() {
            EmbedType::Iframe => is_embed_markup(source),
            EmbedType::Twitter => source.contains("<blockquote"),
            _ => false,
        };
        raw.then(|| strip_script_tags(source).into_owned())
    }
}
