use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app_core::sanitize::strip_script_tags;
use app_core::sharing::generate_share_hash;
use app_core::EmbedClassifier;

mod cli;

use cli::{CliArgs, Command};

fn init_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn input_or_stdin(input: Option<String>) -> Result<String> {
    match input {
        Some(input) => Ok(input),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read input from stdin")?;
            Ok(buf.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareHashOutput {
    hash: String,
    share_link: String,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(&args);

    match args.command {
        Command::Classify { ref input } => {
            let input = input_or_stdin(input.clone())?;
            let classifier = EmbedClassifier::new(args.classifier_config());
            debug!(len = input.len(), "classifying input");
            print_json(&classifier.classify(&input), args.pretty)?;
        }
        Command::Sanitize { ref input } => {
            let input = input_or_stdin(input.clone())?;
            println!("{}", strip_script_tags(&input));
        }
        Command::ShareHash => {
            let hash = generate_share_hash();
            let share_link = args.share_config().share_url(&hash);
            print_json(&ShareHashOutput { hash, share_link }, args.pretty)?;
        }
    }

    Ok(())
}
