//! Wire and state types shared between the API layer and the translator feature.
//!
//! Field names follow the backend's JSON (camelCase). Types are exported to
//! TypeScript with ts-rs for the UI layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// -- Wire types --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct StartRequest {
    pub source: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "translation.ts")]
pub struct StartResponse {
    pub context_id: String,
    pub result: String,
    #[serde(default)]
    pub source_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "translation.ts")]
pub struct ImproveRequest {
    pub context_id: String,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct ImproveResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct PreviewRequest {
    pub source: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct PreviewResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct IdentifyRequest {
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct IdentifyResponse {
    pub lang: String,
}

// -- Client state --

/// One composer turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct Message {
    pub id: String,
    pub text: String,
}

/// Server-side conversation thread as seen by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "translation.ts")]
pub struct TranslationContext {
    pub context_id: Option<String>,
    pub output: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "translation.ts")]
pub enum HistoryKind {
    Initial,
    Improve,
}

/// Immutable record of one translation or improvement step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct HistoryItem {
    pub kind: HistoryKind,
    pub text: String,
    /// Creation time, epoch milliseconds.
    #[ts(type = "number")]
    pub at: i64,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub feedback: Option<String>,
}

impl HistoryItem {
    pub fn initial(text: impl Into<String>) -> Self {
        Self {
            kind: HistoryKind::Initial,
            text: text.into(),
            at: chrono::Utc::now().timestamp_millis(),
            feedback: None,
        }
    }

    pub fn improve(text: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            kind: HistoryKind::Improve,
            text: text.into(),
            at: chrono::Utc::now().timestamp_millis(),
            feedback: Some(feedback.into()),
        }
    }
}

/// Cached back-translation of the current output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "translation.ts")]
pub struct ReverseView {
    pub active: bool,
    pub forward_text: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "translation.ts")]
pub struct LoadingState {
    pub translate: bool,
    pub improve: bool,
    pub language_detection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "translation.ts")]
pub struct Language {
    pub code: String,
    pub label: String,
}

/// Snapshot of everything the translator feature tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "translation.ts")]
pub struct TranslationState {
    pub context: TranslationContext,
    pub history: Vec<HistoryItem>,
    pub loading: LoadingState,
    pub loading_target: Option<String>,
    pub error: Option<String>,
    pub detected_lang: Option<String>,
    pub reverse: ReverseView,
}
