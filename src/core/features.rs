//! Feature modules
//!
//! `translator` owns the translation thread state; `language` is the static
//! language catalog it and the CLI share.

pub mod translator;
pub mod language;

pub use translator::composer::Composer;
pub use translator::Translator;
