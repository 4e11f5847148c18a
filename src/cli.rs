use app_core::embeds::DEFAULT_MAX_INPUT_BYTES;
use app_core::{ClassifierConfig, ShareConfig};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "second-brain",
    version,
    about = "Classify saved links and embed snippets",
    long_about = None
)]
pub struct CliArgs {
    /// Skip pattern matching for inputs longer than this (0 disables the cap).
    #[arg(
        long,
        env = "SECOND_BRAIN_MAX_INPUT_BYTES",
        default_value_t = DEFAULT_MAX_INPUT_BYTES
    )]
    pub max_input_bytes: usize,

    /// Public base URL used to build share links.
    #[arg(long, env = "SECOND_BRAIN_BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Log filter, used when RUST_LOG is not set.
    #[arg(long, env = "SECOND_BRAIN_LOG", default_value = "info")]
    pub log_level: String,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a URL or embed snippet and print its descriptor.
    Classify {
        /// Input to classify; read from stdin when omitted.
        input: Option<String>,
    },
    /// Strip script tags from an embed snippet.
    Sanitize {
        /// Snippet to clean; read from stdin when omitted.
        input: Option<String>,
    },
    /// Generate a share hash and its public URL.
    ShareHash,
}

impl CliArgs {
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            max_input_bytes: (self.max_input_bytes > 0).then_some(self.max_input_bytes),
        }
    }

    pub fn share_config(&self) -> ShareConfig {
        ShareConfig {
            base_url: self.base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["second-brain", "classify", "x"]).unwrap();
        assert_eq!(args.classifier_config(), ClassifierConfig::default());
        assert!(matches!(args.command, Command::Classify { input: Some(ref s) } if s == "x"));
    }

    #[test]
    fn test_zero_disables_cap() {
        let args =
            CliArgs::try_parse_from(["second-brain", "--max-input-bytes", "0", "share-hash"])
                .unwrap();
        assert_eq!(args.classifier_config().max_input_bytes, None);
    }

    #[test]
    fn test_share_config() {
        let args = CliArgs::try_parse_from([
            "second-brain",
            "--base-url",
            "https://brain.example.com",
            "share-hash",
        ])
        .unwrap();
        assert_eq!(args.share_config().share_url("h"), "https://brain.example.com/shared/h");
    }
}
