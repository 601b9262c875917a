use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use docsearch::config::loader::{
    load_age_ranges, load_documents, load_interests, load_registry, or_empty,
};
use docsearch::coordinator::fanout::{Coordinator, DEFAULT_WORKER_TIMEOUT};
use docsearch::coordinator::types::FanOutMode;
use docsearch::telemetry::client::{NoopTelemetry, RemoteTelemetry, TelemetrySender};
use docsearch::telemetry::store::TelemetryStore;
use docsearch::worker::protocol::DEFAULT_AGE;
use docsearch::worker::service::{WorkerConfig, WorkerService};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docsearch", version, about = "Demographic document search cluster")]
struct Cli {
    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Serve one document type
    Worker(WorkerArgs),
    /// Fan queries out to every worker type and merge the answers
    Coordinator(CoordinatorArgs),
    /// Run the centralized query log store
    Telemetry(TelemetryArgs),
}

#[derive(Args)]
struct WorkerArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PUERTO", default_value_t = 5001)]
    port: u16,
    #[arg(long, env = "ARCHIVO_DATOS", default_value = "esclavos/libros.json")]
    documents: PathBuf,
    #[arg(long, env = "RANGO_ETARIO", default_value = "config/rango_etario.json")]
    age_ranges: PathBuf,
    #[arg(long, env = "INTERESES", default_value = "config/intereses_por_categoria.json")]
    interests: PathBuf,
    /// Base URL of the telemetry store; queries are not logged without it
    #[arg(long, env = "TELEMETRY_URL")]
    telemetry_url: Option<String>,
    #[arg(long, env = "TELEMETRY_TIMEOUT_MS", default_value_t = 5000)]
    telemetry_timeout_ms: u64,
    /// Identifier written to every log entry; defaults to worker-<port>
    #[arg(long, env = "MACHINE_ID")]
    machine_id: Option<String>,
    #[arg(long, env = "DEFAULT_AGE", default_value_t = DEFAULT_AGE)]
    default_age: i64,
}

#[derive(Args)]
struct CoordinatorArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PUERTO", default_value_t = 5000)]
    port: u16,
    #[arg(long, env = "WORKERS_CONFIG", default_value = "config/esclavos_config.json")]
    workers: PathBuf,
    #[arg(long, env = "WORKER_TIMEOUT_MS", default_value_t = DEFAULT_WORKER_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,
    /// Call worker types concurrently instead of one after another
    #[arg(long, env = "PARALLEL_FANOUT")]
    parallel: bool,
}

#[derive(Args)]
struct TelemetryArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PUERTO", default_value_t = 9090)]
    port: u16,
    #[arg(long, env = "LOG_FILE", default_value = "logs.csv")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().role {
        Role::Worker(args) => run_worker(args).await,
        Role::Coordinator(args) => run_coordinator(args).await,
        Role::Telemetry(args) => run_telemetry(args).await,
    }
}

async fn run_worker(args: WorkerArgs) -> anyhow::Result<()> {
    let telemetry: Arc<dyn TelemetrySender> = match &args.telemetry_url {
        Some(url) => {
            tracing::info!("Reporting queries to {}", url);
            Arc::new(RemoteTelemetry::new(
                url,
                Duration::from_millis(args.telemetry_timeout_ms),
            ))
        }
        None => {
            tracing::warn!("No telemetry store configured, queries will not be logged");
            Arc::new(NoopTelemetry)
        }
    };

    let config = WorkerConfig {
        machine_id: args
            .machine_id
            .clone()
            .unwrap_or_else(|| format!("worker-{}", args.port)),
        documents: or_empty(load_documents(&args.documents), "documents"),
        age_ranges: or_empty(load_age_ranges(&args.age_ranges), "age ranges"),
        interests: or_empty(load_interests(&args.interests), "interest matrix"),
        default_age: Some(args.default_age),
    };

    let service = WorkerService::new(config, telemetry);
    tracing::info!("Serving as {}", service.machine_id());
    let app = docsearch::worker::handlers::router(service);

    serve(&args.host, args.port, app).await
}

async fn run_coordinator(args: CoordinatorArgs) -> anyhow::Result<()> {
    let registry = or_empty(load_registry(&args.workers), "worker registry");

    let mode = if args.parallel {
        FanOutMode::Parallel
    } else {
        FanOutMode::Sequential
    };
    let coordinator = Arc::new(Coordinator::new(
        registry,
        Duration::from_millis(args.timeout_ms),
        mode,
    ));
    for doc_type in coordinator.registry().types() {
        if let Some(endpoint) = coordinator.registry().get(doc_type) {
            tracing::info!("  - {} -> {}", doc_type, endpoint.base_url());
        }
    }
    let app = docsearch::coordinator::handlers::router(coordinator);

    serve(&args.host, args.port, app).await
}

async fn run_telemetry(args: TelemetryArgs) -> anyhow::Result<()> {
    let store = Arc::new(TelemetryStore::new(args.log_file));
    if let Err(e) = store.read_durable() {
        tracing::warn!(
            "Existing log {} is unreadable, new rows will still be appended: {}",
            store.log_path().display(),
            e
        );
    }
    let app = docsearch::telemetry::handlers::router(store);

    serve(&args.host, args.port, app).await
}

async fn serve(host: &str, port: u16, app: axum::Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("HTTP server listening on {}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app).await?;

    Ok(())
}
