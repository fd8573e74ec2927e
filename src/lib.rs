// Module declarations
pub mod shared;
pub mod api;
pub mod core;
pub mod commands;

pub use crate::api::{ApiGateway, ReqwestTransport, SessionManager, SessionState, TranslationBackend};
pub use crate::core::features::{Composer, Translator};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::settings::AppSettings;

use crate::commands::Cli;

/// Load settings, layer the command-line overrides on top and run the command.
pub async fn run(cli: Cli) -> AppResult<()> {
    let mut settings = match AppSettings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            let mut settings = AppSettings::default();
            settings.apply_env_overrides(|key| std::env::var(key).ok())?;
            settings
        }
    };
    cli.apply_overrides(&mut settings);
    tracing::debug!(base_url = %settings.api.base_url, "settings loaded");

    let mut stdout = std::io::stdout().lock();
    commands::execute(&settings, cli.command, &mut stdout).await
}
