use anyhow::Result;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::exchangerate_api::ExchangeRateApiProvider;
use super::exchangerate_host::ExchangeRateHostProvider;
use crate::core::config::ProvidersConfig;
use crate::core::currency::{RateSnapshot, RateSource};

/// Ordered chain of rate sources. The first source to answer wins; results are never
/// merged or cached.
pub struct RateResolver {
    sources: Vec<Box<dyn RateSource>>,
}

impl RateResolver {
    pub fn new(sources: Vec<Box<dyn RateSource>>) -> Self {
        RateResolver { sources }
    }

    /// Primary then fallback, skipping whichever is not configured.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut sources: Vec<Box<dyn RateSource>> = Vec::new();

        if let Some(primary) = &config.primary {
            sources.push(Box::new(ExchangeRateApiProvider::new(
                &primary.base_url,
                timeout,
            )?));
        }
        if let Some(fallback) = &config.fallback {
            sources.push(Box::new(ExchangeRateHostProvider::new(
                &fallback.base_url,
                timeout,
            )?));
        }

        Ok(Self::new(sources))
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Rates for `base`, or an empty snapshot when every source failed.
    #[instrument(name = "ResolveRates", skip(self), fields(base = %base))]
    pub async fn resolve(&self, base: &str) -> RateSnapshot {
        for source in &self.sources {
            match source.fetch_rates(base).await {
                Ok(rates) => {
                    debug!(source = source.name(), count = rates.len(), "Resolved rates");
                    return rates;
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Rate source failed");
                }
            }
        }

        error!("All rate sources failed for {}", base);
        RateSnapshot::new()
    }
}
