//! Language catalog
//!
//! Target languages offered to the user, display names for detected tags,
//! and BCP-47 primary-subtag handling.

use crate::shared::types::Language;

/// Target languages offered by default, in display order.
pub const COMMON_LANGUAGES: &[(&str, &str)] = &[
    ("ja", "Japanese"),
    ("en", "English"),
    ("pt", "Portuguese"),
    ("es", "Spanish"),
    ("de", "German"),
    ("fr", "French"),
    ("it", "Italian"),
    ("zh", "Chinese (zh)"),
    ("ko", "Korean"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("nl", "Dutch"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
];

/// Names that differ from the generic ISO 639 English name.
const REGIONAL_NAMES: &[(&str, &str)] = &[("en-US", "American English")];

pub fn common_languages() -> Vec<Language> {
    COMMON_LANGUAGES
        .iter()
        .map(|(code, label)| Language {
            code: code.to_string(),
            label: label.to_string(),
        })
        .collect()
}

/// Common languages minus `exclude` (compared by primary subtag), e.g. hide the
/// detected source language from the target picker.
pub fn target_languages(exclude: Option<&str>) -> Vec<Language> {
    let excluded = exclude.map(primary_subtag);
    common_languages()
        .into_iter()
        .filter(|lang| excluded.as_deref() != Some(lang.code.as_str()))
        .collect()
}

/// `"en-US"` -> `"en"`, `"ZH_Hant"` -> `"zh"`.
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Human-readable name for a language tag. Falls back to the tag itself.
pub fn language_name(tag: &str) -> String {
    let tag = tag.trim();
    if let Some((_, name)) = REGIONAL_NAMES.iter().find(|(code, _)| code.eq_ignore_ascii_case(tag)) {
        return name.to_string();
    }

    let primary = primary_subtag(tag);
    let iso = match primary.len() {
        2 => isolang::Language::from_639_1(&primary),
        3 => isolang::Language::from_639_3(&primary),
        _ => None,
    };
    match iso {
        Some(lang) => lang.to_name().to_string(),
        None => tag.to_string(),
    }
}

/// Whether `tag` looks like a usable target: a known ISO 639 primary subtag
/// followed by optional alphanumeric subtags.
pub fn is_valid_tag(tag: &str) -> bool {
    let mut parts = tag.trim().split('-');
    let primary = parts.next().unwrap_or_default().to_ascii_lowercase();
    let known = match primary.len() {
        2 => isolang::Language::from_639_1(&primary).is_some(),
        3 => isolang::Language::from_639_3(&primary).is_some(),
        _ => false,
    };
    known && parts.all(|p| (1..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}
