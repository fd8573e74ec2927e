//! Reverse view: the current output translated back toward the source language.
//!
//! The preview is memoized per forward text, so toggling back and forth costs
//! one network call until the output changes.

use crate::core::features::language::primary_subtag;
use crate::shared::types::{ReverseView, TranslationContext};

/// What a toggle needs to do after updating the view's flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseAction {
    /// No output or no known source language.
    Unavailable,
    Hide,
    ShowCached,
    Fetch { text: String, lang: String },
}

impl ReverseView {
    /// Drop the cached preview if the output moved on.
    pub fn sync(&mut self, output: &str) {
        if self.forward_text != output {
            *self = ReverseView {
                active: false,
                forward_text: output.to_string(),
                preview: None,
            };
        }
    }

    pub fn plan_toggle(&mut self, context: &TranslationContext) -> ReverseAction {
        if context.output.is_empty() || context.source_lang.is_empty() {
            return ReverseAction::Unavailable;
        }
        if self.active {
            self.active = false;
            return ReverseAction::Hide;
        }
        if self.preview.is_some() {
            self.active = true;
            return ReverseAction::ShowCached;
        }
        ReverseAction::Fetch {
            text: context.output.clone(),
            lang: primary_subtag(&context.source_lang),
        }
    }

    /// Store a fetched preview, unless the output changed while it was in flight.
    pub fn store_preview(&mut self, forward_text: &str, preview: String) -> bool {
        if self.forward_text != forward_text {
            return false;
        }
        self.active = true;
        self.preview = Some(preview);
        true
    }

    pub fn display<'a>(&'a self, output: &'a str) -> &'a str {
        match self.preview.as_deref() {
            Some(preview) if self.active => preview,
            _ => output,
        }
    }
}
