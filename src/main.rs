use anyhow::Result;
use clap::{Parser, Subcommand};
use fxbot::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Start the bot (default)
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(cli.config_path.as_deref()),
        Some(Commands::Run) | None => fxbot::run(cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup(config_path: Option<&str>) -> anyhow::Result<()> {
    use anyhow::Context;

    let path = match config_path {
        Some(path) => std::path::PathBuf::from(path),
        None => fxbot::core::config::AppConfig::default_config_path()?,
    };

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# Token issued by @BotFather
token: ""

currencies:
  - { code: "USD", label: "🇺🇸 USD" }
  - { code: "EUR", label: "🇪🇺 EUR" }
  - { code: "RUB", label: "🇷🇺 RUB" }
  - { code: "GBP", label: "🇬🇧 GBP" }
  - { code: "CNY", label: "🇨🇳 CNY" }
  - { code: "KZT", label: "🇰🇿 KZT" }
  - { code: "BYN", label: "🇧🇾 BYN" }
  - { code: "UAH", label: "🇺🇦 UAH" }
  - { code: "PLN", label: "🇵🇱 PLN" }

providers:
  primary:
    base_url: "https://api.exchangerate-api.com/v4/latest"
  fallback:
    base_url: "https://api.exchangerate.host/latest"
  timeout_secs: 10
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
