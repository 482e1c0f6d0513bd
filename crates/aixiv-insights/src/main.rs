//! AIxiv Insights relay - Entry Point

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use aixiv_insights::{config::{Config, api}, relay::RelayContext, server::AppServer};

#[derive(Parser, Debug)]
#[command(name = "aixiv-insights")]
#[command(about = "arXiv search relay and Gemini theme clustering backend")]
#[command(version)]
struct Cli {
    /// Gemini API key (theme extraction is disabled without it)
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Default Gemini model when a request does not name one
    #[arg(long, env = "GEMINI_MODEL", default_value = api::DEFAULT_MODEL)]
    model: String,

    /// HTTP server port
    #[arg(long, env = "PROXY_PORT", default_value_t = api::DEFAULT_PORT)]
    port: u16,

    /// arXiv query endpoint
    #[arg(long, env = "ARXIV_API_URL", default_value = api::ARXIV_API_URL)]
    arxiv_url: String,

    /// Gemini REST base URL
    #[arg(long, env = "GEMINI_API_URL", default_value = api::GEMINI_API_URL)]
    gemini_url: String,

    /// Timeout for arXiv requests, in seconds
    #[arg(long, default_value_t = api::SEARCH_TIMEOUT.as_secs())]
    search_timeout_secs: u64,

    /// Timeout for Gemini requests, in seconds
    #[arg(long, default_value_t = api::GENERATION_TIMEOUT.as_secs())]
    generation_timeout_secs: u64,

    /// Serve a built frontend from this directory
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        // Older deployments set GEMINI_API_KEY instead of API_KEY.
        let api_key = self.api_key.or_else(|| std::env::var("GEMINI_API_KEY").ok());

        let mut config = Config::new(api_key).with_default_model(self.model);
        config.port = self.port;
        config.arxiv_api_url = self.arxiv_url;
        config.gemini_api_url = self.gemini_url;
        config.search_timeout = Duration::from_secs(self.search_timeout_secs);
        config.generation_timeout = Duration::from_secs(self.generation_timeout_secs);
        config.static_dir = self.static_dir;

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in production.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let config = cli.into_config()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        default_model = %config.default_model,
        has_api_key = config.has_api_key(),
        "Starting AIxiv Insights relay"
    );
    if !config.has_api_key() {
        tracing::warn!("API_KEY is not set; theme extraction requests will fail");
    }

    let ctx = RelayContext::from_config(&config)?;
    AppServer::new(ctx).with_static_dir(config.static_dir.clone()).run_http(config.port).await
}
