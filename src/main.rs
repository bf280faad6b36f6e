use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scrawl::config::Config;

#[derive(Parser)]
#[command(name = "scrawl", version, about = "Line-oriented profile and micro-blog server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml", env = "SCRAWL_CONFIG")]
    config: String,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = if std::path::Path::new(&cli.config).exists() {
        Config::from_file(&cli.config)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("failed to load config from {}", cli.config))?
    } else {
        info!("no config file at {}, using defaults", cli.config);
        Config::default()
    };

    scrawl::server::run(cfg).await.map_err(|e| anyhow::anyhow!("{e}"))
}
