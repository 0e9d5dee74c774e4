use std::sync::Arc;

use anyhow::Context;
use evaluator::{LlmEvaluator, OllamaClient, OllamaScorer, RemoteEvaluator, SubmissionEvaluator};
use storage::Database;
use utoipa::OpenApi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use config::{Config, EvaluatorBackend};
use features::parameters::debounce::WeightWriteQueue;
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::hackathons::handlers::list_hackathons,
        features::hackathons::handlers::get_hackathon,
        features::hackathons::handlers::create_hackathon,
        features::hackathons::handlers::update_hackathon,
        features::hackathons::handlers::delete_hackathon,
        features::parameters::handlers::list_parameters,
        features::parameters::handlers::create_parameter,
        features::parameters::handlers::update_parameter,
        features::parameters::handlers::delete_parameter,
        features::parameters::handlers::toggle_parameter,
        features::parameters::handlers::adjust_weight,
        features::submissions::handlers::list_submissions,
        features::submissions::handlers::create_submission,
        features::submissions::handlers::submission_stats,
        features::submissions::handlers::select_top,
        features::submissions::handlers::update_statuses,
        features::submissions::handlers::get_submission,
        features::submissions::handlers::mark_reviewed,
        features::submissions::handlers::remove_review,
        features::submissions::handlers::set_manual_score,
        features::evaluation::handlers::evaluate_submissions,
        features::shortlist::handlers::get_shortlist,
        features::shortlist::handlers::finalize_shortlist,
        features::shortlist::handlers::save_order,
        features::shortlist::handlers::move_entry,
        features::shortlist::handlers::send_to_admin,
    ),
    components(
        schemas(
            storage::dto::hackathon::CreateHackathonRequest,
            storage::dto::hackathon::UpdateHackathonRequest,
            storage::dto::parameter::CreateParameterRequest,
            storage::dto::parameter::UpdateParameterRequest,
            storage::dto::parameter::AdjustWeightRequest,
            storage::dto::parameter::ParameterListResponse,
            storage::dto::parameter::WeightUpdateResponse,
            storage::dto::submission::CreateSubmissionRequest,
            storage::dto::submission::StatusUpdate,
            storage::dto::submission::SubmissionStats,
            storage::dto::submission::CountInput,
            storage::dto::submission::SelectTopRequest,
            storage::dto::submission::SelectTopResponse,
            storage::dto::submission::BulkStatusRequest,
            storage::dto::submission::BulkStatusResponse,
            storage::dto::submission::ManualScoreRequest,
            storage::dto::evaluation::EvaluationParameterInput,
            storage::dto::evaluation::EvaluateRequest,
            storage::dto::evaluation::EvaluationResultView,
            storage::dto::evaluation::EvaluateResponse,
            storage::dto::shortlist::ShortlistResponse,
            storage::dto::shortlist::FinalizeShortlistRequest,
            storage::dto::shortlist::FinalizeShortlistResponse,
            storage::dto::shortlist::SaveOrderRequest,
            storage::dto::shortlist::MoveEntryRequest,
            storage::dto::shortlist::SendToAdminRequest,
            storage::dto::shortlist::SendToAdminResponse,
            storage::dto::common::PaginationMeta,
            storage::services::weights::WeightChange,
            storage::services::submission_table::StatusFilter,
            storage::services::submission_table::SortKey,
            storage::services::shortlist_ranking::ShortlistEntry,
            storage::services::shortlist_ranking::RankAssignment,
            storage::models::Hackathon,
            storage::models::Parameter,
            storage::models::Submission,
            storage::models::SubmissionFile,
            storage::models::SubmissionStatus,
            storage::models::FileFormat,
            storage::models::CriterionScore,
        )
    ),
    tags(
        (name = "hackathons", description = "Hackathon management"),
        (name = "parameters", description = "Evaluation parameters and weight redistribution"),
        (name = "submissions", description = "Submission table, selection and review"),
        (name = "evaluation", description = "AI evaluation trigger"),
        (name = "shortlist", description = "Shortlist ranking and hand-off"),
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

async fn build_evaluator(config: &Config) -> anyhow::Result<Arc<dyn SubmissionEvaluator>> {
    match config.evaluator_backend {
        EvaluatorBackend::Ollama => {
            let client = OllamaClient::new(&config.ollama_url, &config.ollama_model)
                .context("Failed to create Ollama client")?;
            tracing::info!(
                "Using Ollama evaluator at {} (model: {})",
                config.ollama_url,
                client.model()
            );

            // Startup continues without Ollama; evaluations fail until it is up.
            match client.health_check().await {
                Ok(true) => tracing::info!("Ollama is reachable"),
                Ok(false) => tracing::warn!("Ollama answered the health check with an error status"),
                Err(e) => tracing::warn!("Ollama is not reachable: {}", e),
            }
            Ok(Arc::new(LlmEvaluator::new(OllamaScorer::new(client))))
        }
        EvaluatorBackend::Remote => {
            let url = config
                .evaluation_service_url
                .as_deref()
                .context("EVALUATION_SERVICE_URL is not set")?;
            tracing::info!("Using remote evaluation service at {}", url);
            let remote = RemoteEvaluator::new(url).context("Failed to create evaluation client")?;
            Ok(Arc::new(remote))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Hackalyze API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("No API_KEYS configured; every write endpoint will answer 401");
    }

    let weight_queue = WeightWriteQueue::new(Arc::new(db.clone()), config.weight_debounce);
    let state = AppState {
        db,
        evaluator: build_evaluator(&config).await?,
        weight_queue: weight_queue.clone(),
        api_keys,
    };

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Starting server at http://{}", bind_address);

    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, routes::create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Flushing pending weight writes");
    weight_queue.flush().await;

    Ok(())
}
