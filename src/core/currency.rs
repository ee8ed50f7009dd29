//! Currency set and exchange rate abstractions

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Rates relative to a base currency, keyed by target currency code.
pub type RateSnapshot = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Currency {
    pub code: String,
    pub label: String,
}

impl Currency {
    pub fn new(code: &str, label: &str) -> Self {
        Currency {
            code: code.to_string(),
            label: label.to_string(),
        }
    }
}

/// The fixed, ordered set of currencies offered to users.
#[derive(Debug, Clone)]
pub struct CurrencySet {
    currencies: Vec<Currency>,
}

impl CurrencySet {
    pub fn new(currencies: Vec<Currency>) -> Result<Self> {
        if currencies.len() < 2 {
            bail!("At least two currencies are required, got {}", currencies.len());
        }

        let mut seen = HashSet::new();
        for currency in &currencies {
            if currency.code.trim().is_empty() {
                bail!("Currency code must not be empty");
            }
            if !seen.insert(currency.code.as_str()) {
                return Err(anyhow!("Duplicate currency code: {}", currency.code));
            }
        }

        Ok(CurrencySet { currencies })
    }

    pub fn all(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Label for a code, falling back to the code itself.
    pub fn label<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map_or(code, |c| c.label.as_str())
    }

    /// Every currency except `code`, in configured order.
    pub fn excluding(&self, code: &str) -> Vec<&Currency> {
        self.currencies.iter().filter(|c| c.code != code).collect()
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot>;
}
