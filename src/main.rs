use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use stockwatch_backend::app;
use stockwatch_backend::config::AppConfig;
use stockwatch_backend::db::PgStore;
use stockwatch_backend::external::finnhub::FinnhubProvider;
use stockwatch_backend::external::llm::LlmProvider;
use stockwatch_backend::external::news::NewsProvider;
use stockwatch_backend::external::openai::OpenAiProvider;
use stockwatch_backend::external::yahoo::YahooProvider;
use stockwatch_backend::logging::{init_logging, LoggingConfig};
use stockwatch_backend::services::session::JwtSessionIssuer;
use stockwatch_backend::state::AppState;

const USER_AGENT: &str = concat!("stockwatch-backend/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env().context("invalid configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("Database migrations applied");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;

    let news_provider: Option<Arc<dyn NewsProvider>> = match &config.news.api_key {
        Some(key) => {
            tracing::info!("News provider: Finnhub");
            Some(Arc::new(FinnhubProvider::new(key.clone(), http.clone())))
        }
        None => {
            tracing::warn!("NEWS_API_KEY not set, news and AI outlook are disabled");
            None
        }
    };

    let llm_provider: Option<Arc<dyn LlmProvider>> = match &config.llm.api_key {
        Some(key) => {
            tracing::info!("LLM provider: OpenAI ({})", config.llm.model);
            Some(Arc::new(OpenAiProvider::new(
                key.clone(),
                config.llm.model.clone(),
                config.llm.max_tokens,
                config.llm.temperature,
                http.clone(),
            )))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, AI outlook is disabled");
            None
        }
    };

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        market_data: Arc::new(YahooProvider::new(http)),
        news_provider,
        llm_provider,
        sessions: Arc::new(JwtSessionIssuer::new(&config.session.secret, config.session.ttl)),
    };
    let app = app::create_app(state, &config.cors_allowed_origins);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Stockwatch backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
