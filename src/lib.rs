pub mod conversation;
pub mod core;
pub mod providers;
pub mod telegram;
pub mod ui;

use crate::conversation::Conversation;
use crate::core::config::AppConfig;
use crate::providers::RateResolver;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Wires the currency set and rate sources described by `config`.
pub fn build_conversation(config: &AppConfig) -> Result<Conversation> {
    let currencies = config.currency_set()?;
    let resolver = RateResolver::from_config(&config.providers)?;
    info!(
        currencies = currencies.all().len(),
        sources = ?resolver.source_names(),
        "Conversation ready"
    );
    Ok(Conversation::new(currencies, resolver))
}

pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("Currency converter bot starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        currencies = ?config.currencies,
        providers = ?config.providers,
        "Loaded config"
    );

    let conversation = Arc::new(build_conversation(&config)?);
    telegram::run_polling(&config.token, conversation).await
}
