mod config;

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use storyteller_api::{AppState, AppStateInner};
use storyteller_db::Database;
use storyteller_generator::{OpenAiClient, StoryGenerator};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "storyteller=debug,storyteller_api=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Database::open(&config.db_path)?;

    // Completion client
    let client = OpenAiClient::new(config.openai.clone())?;
    let completion_configured = client.has_credentials();
    if completion_configured {
        info!("Completion API key configured, model {}", config.openai.model);
    } else {
        warn!("OPENAI_API_KEY not set, every story will use the fallback");
    }

    let state: AppState = Arc::new(AppStateInner {
        db,
        generator: StoryGenerator::new(Arc::new(client)),
        completion_configured,
    });

    let app = storyteller_api::router(state)
        .layer(cors(&config.cors_origins))
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Storyteller server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
