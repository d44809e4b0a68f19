use appraisal_hub::config::AppConfig;
use appraisal_hub::error::AppError;
use appraisal_hub::telemetry;
use appraisal_hub::workflows::appraisal::{
    appraisal_router, question_library, AppraisalService, InMemoryAssignmentStore,
    InMemoryDirectory, InMemoryTemplateStore, StaffLevel,
};
use appraisal_hub::workflows::roster::StaffRosterImporter;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Staff Appraisal Hub",
    about = "Run the staff appraisal service or inspect its question libraries from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the question library for a staff level
    Catalog(CatalogArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Staff roster CSV seeding the dispatch candidate pools
    #[arg(long)]
    roster: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CatalogArgs {
    /// Staff level keying the library (staff, hod-manager, c-suite)
    #[arg(long, default_value = "staff", value_parser = parse_level)]
    level: StaffLevel,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Catalog(args) => {
            render_catalog(args.level);
            Ok(())
        }
    }
}

fn parse_level(raw: &str) -> Result<StaffLevel, String> {
    StaffLevel::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not a staff level (staff, hod-manager, c-suite)"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(roster) = args.roster.take() {
        config.roster = Some(roster);
    }

    telemetry::init(&config.telemetry)?;

    let directory = match &config.roster {
        Some(path) => {
            let directory = StaffRosterImporter::from_path(path)?;
            info!(staff = directory.staff_count(), roster = %path.display(), "staff roster loaded");
            directory
        }
        None => InMemoryDirectory::default(),
    };

    let service = Arc::new(AppraisalService::new(
        Arc::new(InMemoryTemplateStore::default()),
        Arc::new(InMemoryAssignmentStore::default()),
        Arc::new(directory),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(appraisal_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "staff appraisal service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn render_catalog(level: StaffLevel) {
    println!("Question library for {}", level.label());

    for category in question_library(level) {
        println!("\n{} ({})", category.label, category.id);
        for question in &category.questions {
            println!("- [{}] {} | {}", question.id, question.kind.label(), question.prompt);
            if let Some(description) = question.description {
                println!("    {description}");
            }
            for option in question.options {
                println!("    * {option}");
            }
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
