use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::http_client;
use crate::core::currency::{RateSource, RateSnapshot};

/// Fallback source, `GET {base_url}?base={BASE}` answering
/// `{"success": true, "rates": {...}}`. The payload flag decides success, not the status.
pub struct ExchangeRateHostProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateHostProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(ExchangeRateHostProvider {
            base_url: base_url.to_string(),
            client: http_client(timeout)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct HostResponse {
    #[serde(default)]
    success: bool,
    rates: Option<RateSnapshot>,
    error: Option<HostError>,
}

#[derive(Debug, Deserialize)]
struct HostError {
    code: Option<i64>,
    info: Option<String>,
}

#[async_trait]
impl RateSource for ExchangeRateHostProvider {
    fn name(&self) -> &str {
        "exchangerate.host"
    }

    #[instrument(name = "ExchangeRateHostFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
        let url = format!("{}?base={}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        let text = response.text().await?;

        let data: HostResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if !data.success {
            let detail = match data.error {
                Some(HostError { code, info }) => format!(
                    " (code {}: {})",
                    code.map_or_else(|| "?".to_string(), |c| c.to_string()),
                    info.as_deref().unwrap_or("no details")
                ),
                None => String::new(),
            };
            return Err(anyhow!(
                "Provider reported failure for base currency: {}{}",
                base,
                detail
            ));
        }

        let rates = data
            .rates
            .ok_or_else(|| anyhow!("No rates found for base currency: {}", base))?;
        debug!(count = rates.len(), "Received rates");
        Ok(rates)
    }
}
