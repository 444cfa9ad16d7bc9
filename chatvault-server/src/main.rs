use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use chatvault_ai::rag::{RagConfig, RagEngine};
use chatvault_ai::{ChatProvider, ProviderConfig, SentimentEngine};
use chatvault_core::cache::{connect_backend, HistoryCache};
use chatvault_core::repositories::postgres::PostgresChatMessageRepository;
use chatvault_core::services::{KnowledgeService, MessageService};
use chatvault_core::{Database, Error};

mod context;
mod routes;

use context::ServerContext;

#[derive(Parser, Debug, Clone)]
#[command(name = "chatvault")]
#[command(author, version, about = "chatvault - chat history backend with sentiment tagging and document Q&A")]
struct Args {
    /// Address to which the HTTP server will bind
    #[arg(long, default_value = "0.0.0.0:8080")]
    server_addr: String,

    /// Postgres connection URL. Falls back to $DATABASE_URL.
    #[arg(long)]
    db_url: Option<String>,

    /// Redis URL for the history cache. Falls back to $REDIS_URL; when both
    /// are unset the service runs without a cache.
    #[arg(long)]
    redis_url: Option<String>,

    /// Directory holding uploaded PDFs and the vector index sidecar
    #[arg(long, default_value = "knowledge")]
    knowledge_dir: PathBuf,

    /// Chat-completion model for document answers and model-based sentiment
    #[arg(long, default_value = "gpt-4o-mini")]
    chat_model: String,

    /// Embedding model for document retrieval
    #[arg(long, default_value = "text-embedding-3-small")]
    embedding_model: String,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("chatvault_server=info".parse().unwrap_or_default())
        .add_directive("chatvault_core=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!("chatvault starting. addr={}", args.server_addr);

    if let Err(e) = run_server(args).await {
        error!("Server error: {:?}", e);
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_server(args: Args) -> Result<(), Error> {
    // 1) Connect to Postgres and apply migrations
    let db_url = args
        .db_url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "postgres://chatvault@localhost:5432/chatvault".to_string());
    let db = Database::new(&db_url).await?;
    db.migrate().await?;

    // 2) Cache backend: Redis when configured, no-op fallback otherwise
    let redis_url = args
        .redis_url
        .clone()
        .or_else(|| std::env::var("REDIS_URL").ok());
    let cache_backend = connect_backend(redis_url.as_deref()).await;
    let history_cache = HistoryCache::new(cache_backend);

    // 3) Model provider; without an API key sentiment stays lexicon-only
    let api_key = std::env::var("OPENAI_API_KEY").ok();
    let provider = Arc::new(ChatProvider::new(ProviderConfig {
        api_base: std::env::var("OPENAI_API_BASE").ok(),
        api_key: api_key.clone().unwrap_or_default(),
        chat_model: args.chat_model.clone(),
        embedding_model: args.embedding_model.clone(),
    }));
    let sentiment = Arc::new(match api_key {
        Some(_) => SentimentEngine::with_model(provider.clone()),
        None => SentimentEngine::lexicon_only(),
    });

    // 4) Services
    let repo = PostgresChatMessageRepository::new(db.pool().clone());
    let message_service = Arc::new(MessageService::new(repo, history_cache, sentiment));
    let rag_engine = Arc::new(RagEngine::new(
        provider,
        RagConfig::for_dir(args.knowledge_dir.clone()),
    ));
    let knowledge_service = Arc::new(KnowledgeService::new(rag_engine, args.knowledge_dir.clone())?);

    let ctx = Arc::new(ServerContext {
        db,
        message_service,
        knowledge_service,
    });

    // 5) Serve over HTTP with graceful shutdown on Ctrl-C
    let app = routes::router(ctx);
    let addr: SocketAddr = args.server_addr.parse()?;
    info!("HTTP server listening on http://{}", addr);

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
        }
        info!("Ctrl-C detected; shutting down HTTP server...");
        shutdown_handle.graceful_shutdown(None);
    });

    axum_server::Server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
