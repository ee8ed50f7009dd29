use crate::core::currency::{Currency, CurrencySet};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrimaryProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FallbackProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub primary: Option<PrimaryProviderConfig>,
    pub fallback: Option<FallbackProviderConfig>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            primary: Some(PrimaryProviderConfig {
                base_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
            }),
            fallback: Some(FallbackProviderConfig {
                base_url: "https://api.exchangerate.host/latest".to_string(),
            }),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_currencies() -> Vec<Currency> {
    [
        ("USD", "🇺🇸 USD"),
        ("EUR", "🇪🇺 EUR"),
        ("RUB", "🇷🇺 RUB"),
        ("GBP", "🇬🇧 GBP"),
        ("CNY", "🇨🇳 CNY"),
        ("KZT", "🇰🇿 KZT"),
        ("BYN", "🇧🇾 BYN"),
        ("UAH", "🇺🇦 UAH"),
        ("PLN", "🇵🇱 PLN"),
    ]
    .into_iter()
    .map(|(code, label)| Currency::new(code, label))
    .collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub token: String,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxbot", "fxbot")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            bail!("Bot token must not be empty");
        }
        if self.providers.primary.is_none() && self.providers.fallback.is_none() {
            bail!("At least one rate provider must be configured");
        }
        if self.providers.timeout_secs == 0 {
            bail!("Provider timeout must be at least one second");
        }
        self.currency_set()?;
        Ok(())
    }

    pub fn currency_set(&self) -> Result<CurrencySet> {
        CurrencySet::new(self.currencies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
token: "123456:ABC"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.token, "123456:ABC");
        assert_eq!(config.currencies.len(), 9);
        assert_eq!(config.currencies[0], Currency::new("USD", "🇺🇸 USD"));
        assert_eq!(config.currencies[8].code, "PLN");
        assert_eq!(
            config.providers.primary.unwrap().base_url,
            "https://api.exchangerate-api.com/v4/latest"
        );
        assert_eq!(
            config.providers.fallback.unwrap().base_url,
            "https://api.exchangerate.host/latest"
        );
        assert_eq!(config.providers.timeout_secs, 10);

        let yaml_str_with_providers = r#"
token: "123456:ABC"
currencies:
  - code: "USD"
    label: "Dollar"
  - code: "JPY"
    label: "Yen"
providers:
  primary:
    base_url: "http://example.com/primary"
  fallback: null
  timeout_secs: 3
        "#;
        let config_with_providers: AppConfig =
            serde_yaml::from_str(yaml_str_with_providers).unwrap();
        assert!(config_with_providers.validate().is_ok());
        assert_eq!(config_with_providers.currencies[1].label, "Yen");
        assert_eq!(
            config_with_providers.providers.primary.unwrap().base_url,
            "http://example.com/primary"
        );
        assert!(config_with_providers.providers.fallback.is_none());
        assert_eq!(config_with_providers.providers.timeout_secs, 3);
    }

    #[test]
    fn test_config_validation() {
        let empty_token: AppConfig = serde_yaml::from_str(r#"token: " ""#).unwrap();
        assert_eq!(
            empty_token.validate().unwrap_err().to_string(),
            "Bot token must not be empty"
        );

        let no_providers: AppConfig = serde_yaml::from_str(
            r#"
token: "t"
providers:
  primary: null
  fallback: null
"#,
        )
        .unwrap();
        assert_eq!(
            no_providers.validate().unwrap_err().to_string(),
            "At least one rate provider must be configured"
        );

        let one_currency: AppConfig = serde_yaml::from_str(
            r#"
token: "t"
currencies:
  - code: "USD"
    label: "USD"
"#,
        )
        .unwrap();
        assert!(one_currency.validate().is_err());

        let zero_timeout: AppConfig = serde_yaml::from_str(
            r#"
token: "t"
providers:
  primary:
    base_url: "http://localhost:8080/v4/latest"
  timeout_secs: 0
"#,
        )
        .unwrap();
        assert_eq!(
            zero_timeout.validate().unwrap_err().to_string(),
            "Provider timeout must be at least one second"
        );
    }

    #[test]
    fn test_load_from_path_reports_file() {
        let result = AppConfig::load_from_path("/nonexistent/fxbot/config.yaml");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file: /nonexistent/fxbot/config.yaml")
        );
    }
}
