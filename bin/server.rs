// CPF Auth - Web Server
// REST boundary over the verification pipeline

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use cpf_auth::{Config, Pipeline, PipelineOutcome, SqliteLookup, TokenIssuer};

/// Shared application state
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

/// Request body for POST /api/auth
#[derive(Deserialize)]
struct AuthRequest {
    cpf: Option<String>,
}

/// Success body: the token plus the facts it asserts
#[derive(Serialize)]
struct AuthResponse {
    cpf: String,
    registered: bool,
    token: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Map a pipeline outcome to its HTTP shape. Internal causes are logged here
/// and never echoed to the caller.
fn outcome_response(outcome: PipelineOutcome) -> Response {
    match outcome {
        PipelineOutcome::Success {
            cpf,
            registered,
            token,
        } => (
            StatusCode::OK,
            Json(AuthResponse {
                cpf,
                registered,
                token,
            }),
        )
            .into_response(),
        PipelineOutcome::BadInput(message) => error_response(StatusCode::BAD_REQUEST, message),
        PipelineOutcome::InternalError(cause) => {
            eprintln!("Error processing auth request: {}", cause);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "OK" })))
}

/// POST /api/auth - Validate a CPF, look it up, issue a token
async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Response {
    // Malformed JSON is caller-correctable, same class as a missing field
    let request = match payload {
        Ok(Json(request)) => request,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "invalid json body"),
    };

    outcome_response(state.pipeline.process(request.cpf.as_deref()))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 CPF Auth - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env().expect("Failed to load configuration");

    let store = SqliteLookup::open(&config.db_path).expect("Failed to open customer store");
    println!("✓ Customer store opened: {:?}", config.db_path);

    let pipeline = Pipeline::new(Box::new(store), TokenIssuer::new(config.signing_key));

    // Create shared state
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth", post(authenticate))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://{}", config.addr);
    println!("   POST http://{}/api/auth  {{\"cpf\": \"...\"}}", config.addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
