//! Translator feature
//!
//! Client-side state for one translation thread: the active context, its
//! history, loading flags, last error, the reverse view and the detected
//! source language. All network access goes through a [`TranslationBackend`].

pub mod composer;
pub mod reverse;

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::api::TranslationBackend;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{
    HistoryItem, IdentifyRequest, ImproveRequest, PreviewRequest, StartRequest,
    TranslationContext, TranslationState,
};
use reverse::ReverseAction;

pub const ERR_EMPTY_SOURCE: &str = "Please enter a message to translate";
pub const ERR_NO_CONTEXT: &str = "No active translation context";

#[derive(Clone)]
pub struct Translator {
    backend: Arc<dyn TranslationBackend>,
    state: Arc<RwLock<TranslationState>>,
}

impl Translator {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(TranslationState::default())),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TranslationState {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, TranslationState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut TranslationState) -> R) -> R {
        f(&mut self.write())
    }

    pub fn clear_error(&self) {
        self.update(|s| s.error = None);
    }

    /// Start a new context translating `source` into `target_lang`.
    ///
    /// On success the previous context and its history are replaced.
    pub async fn translate(&self, source: &str, target_lang: &str) -> AppResult<String> {
        let source = source.trim();
        if source.is_empty() {
            self.update(|s| s.error = Some(ERR_EMPTY_SOURCE.to_string()));
            return Err(AppError::Validation(ERR_EMPTY_SOURCE.to_string()));
        }

        self.update(|s| {
            s.loading.translate = true;
            s.loading_target = Some(target_lang.to_string());
            s.error = None;
        });

        let request = StartRequest {
            source: source.to_string(),
            lang: target_lang.to_string(),
        };
        let result = self.backend.start_translation(&request).await;

        self.update(|s| {
            s.loading.translate = false;
            s.loading_target = None;
            match &result {
                Ok(resp) => {
                    s.context = TranslationContext {
                        context_id: Some(resp.context_id.clone()),
                        output: resp.result.clone(),
                        source_lang: resp.source_lang.clone(),
                        target_lang: target_lang.to_string(),
                    };
                    s.history = vec![HistoryItem::initial(resp.result.clone())];
                    s.reverse.sync(&resp.result);
                }
                Err(e) => s.error = Some(e.user_message()),
            }
        });

        let resp = result?;
        debug!(context_id = %resp.context_id, target = target_lang, "translation started");
        Ok(resp.result)
    }

    /// Refine the active context's output with free-form feedback.
    pub async fn improve(&self, feedback: &str) -> AppResult<String> {
        let context_id = self.state().context.context_id;
        let Some(context_id) = context_id else {
            return Err(AppError::Validation(ERR_NO_CONTEXT.to_string()));
        };
        let feedback = feedback.trim().to_string();

        self.update(|s| s.loading.improve = true);

        let request = ImproveRequest {
            context_id: context_id.clone(),
            feedback: feedback.clone(),
        };
        let result = self.backend.improve_translation(&request).await;

        self.update(|s| {
            s.loading.improve = false;
            // A translate that finished meanwhile owns the state now.
            if s.context.context_id.as_deref() != Some(context_id.as_str()) {
                return;
            }
            match &result {
                Ok(resp) => {
                    s.context.output = resp.result.clone();
                    s.history.push(HistoryItem::improve(resp.result.clone(), feedback.clone()));
                    s.reverse.sync(&resp.result);
                }
                Err(e) => s.error = Some(e.user_message()),
            }
        });

        Ok(result?.result)
    }

    /// Stateless translation, no context involved.
    pub async fn preview(&self, source: &str, target_lang: &str) -> AppResult<String> {
        let request = PreviewRequest {
            source: source.to_string(),
            lang: target_lang.to_string(),
        };
        match self.backend.preview_translation(&request).await {
            Ok(resp) => Ok(resp.result),
            Err(e) => {
                warn!("preview failed: {}", e);
                Err(e)
            }
        }
    }

    /// Identify the language of `text`. Failures degrade to `None`.
    pub async fn detect_language(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            self.update(|s| {
                s.detected_lang = None;
                s.loading.language_detection = false;
            });
            return None;
        }

        self.update(|s| s.loading.language_detection = true);
        let request = IdentifyRequest {
            source: text.to_string(),
        };
        let detected = match self.backend.identify_language(&request).await {
            Ok(resp) => Some(resp.lang),
            Err(e) => {
                warn!("language identification failed: {}", e);
                None
            }
        };

        self.update(|s| {
            s.loading.language_detection = false;
            s.detected_lang = detected.clone();
        });
        detected
    }

    /// Flip between the output and its back-translation; returns the text to display.
    pub async fn toggle_reverse(&self) -> AppResult<String> {
        let action = self.update(|s| {
            s.reverse.sync(&s.context.output);
            s.reverse.plan_toggle(&s.context)
        });

        if let ReverseAction::Fetch { text, lang } = action {
            let preview = self.preview(&text, &lang).await?;
            self.update(|s| s.reverse.store_preview(&text, preview));
        }

        Ok(self.display_text())
    }

    pub fn display_text(&self) -> String {
        let state = self.state();
        state.reverse.display(&state.context.output).to_string()
    }
}
