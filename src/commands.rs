//! Command-line front end
//!
//! A thin driver over the library: every subcommand builds one gateway, so
//! improvements chained with `--improve` share the session cookie of the
//! initial translation.

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::api::{ApiGateway, ReqwestTransport};
use crate::core::features::language::{self, common_languages, language_name};
use crate::core::features::{Composer, Translator};
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;
use crate::shared::types::HistoryKind;

#[derive(Parser, Debug)]
#[command(name = "babel", version, about = "Translate text through the Babel translation service")]
pub struct Cli {
    /// Base URL of the translation service (overrides settings and BABEL_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Translate one or more message turns, optionally refining the result
    Translate {
        /// Message turns; joined with a single space
        #[arg(required = true)]
        text: Vec<String>,

        /// Target language tag (defaults to the configured preference)
        #[arg(long, short)]
        to: Option<String>,

        /// Feedback to apply after the initial translation; repeatable
        #[arg(long = "improve", value_name = "FEEDBACK")]
        improve: Vec<String>,

        /// Also show the result translated back into the source language
        #[arg(long)]
        reverse: bool,

        /// Print every step instead of only the final text
        #[arg(long)]
        history: bool,
    },
    /// One-off translation without creating a context
    Preview {
        text: String,

        #[arg(long, short)]
        to: String,
    },
    /// Identify the language of a text
    Identify { text: String },
    /// List the common target languages
    Languages,
}

impl Cli {
    pub fn apply_overrides(&self, settings: &mut AppSettings) {
        if let Some(url) = &self.base_url {
            settings.api.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.api.timeout_secs = Some(secs);
        }
    }
}

pub fn build_translator(settings: &AppSettings) -> AppResult<Translator> {
    let transport = Arc::new(ReqwestTransport::new(&settings.api)?);
    let gateway = ApiGateway::new(transport, settings.api.session_path.clone());
    Ok(Translator::new(Arc::new(gateway)))
}

fn checked_lang(tag: &str) -> AppResult<String> {
    let tag = tag.trim();
    if language::is_valid_tag(tag) {
        Ok(tag.to_string())
    } else {
        Err(AppError::Validation(format!("Unknown language tag: {}", tag)))
    }
}

pub async fn execute<W: Write>(settings: &AppSettings, command: Command, out: &mut W) -> AppResult<()> {
    match command {
        Command::Languages => {
            for lang in common_languages() {
                writeln!(out, "{}\t{}", lang.code, lang.label)?;
            }
        }
        Command::Identify { text } => {
            let translator = build_translator(settings)?;
            match translator.detect_language(&text).await {
                Some(tag) => writeln!(out, "{}\t{}", tag, language_name(&tag))?,
                None => return Err(AppError::Validation("Could not identify the language".to_string())),
            }
        }
        Command::Preview { text, to } => {
            let lang = checked_lang(&to)?;
            let translator = build_translator(settings)?;
            let result = translator.preview(&text, &lang).await?;
            writeln!(out, "{}", result)?;
        }
        Command::Translate { text, to, improve, reverse, history } => {
            let lang = checked_lang(to.as_deref().unwrap_or(&settings.preferences.default_target_lang))?;
            let source = Composer::from_texts(text).compose();
            let translator = build_translator(settings)?;

            translator.translate(&source, &lang).await?;
            for feedback in &improve {
                translator.improve(feedback).await?;
            }

            let state = translator.state();
            if history {
                for item in &state.history {
                    match (item.kind, &item.feedback) {
                        (HistoryKind::Improve, Some(feedback)) => {
                            writeln!(out, "[improve: {}] {}", feedback, item.text)?
                        }
                        _ => writeln!(out, "[initial] {}", item.text)?,
                    }
                }
            } else {
                writeln!(out, "{}", state.context.output)?;
            }

            // Forward text is already printed; a failed back-translation only drops this line.
            if reverse {
                match translator.toggle_reverse().await {
                    Ok(back) => writeln!(out, "({}) {}", language_name(&state.context.source_lang), back)?,
                    Err(e) => warn!("reverse translation failed: {}", e),
                }
            }
        }
    }
    Ok(())
}
