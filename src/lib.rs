use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    serve::Serve,
    Json, Router,
};

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::error::Error;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use domain::{AuthAPIError, ShiftAPIError};
pub mod routes;
use crate::utils::{constants::ALLOWED_ORIGINS, tracing::*};
use routes::shifts::{
    clock_shift, create_shift, delete_shift, get_shift, list_shifts, my_shifts,
    shift_stats, update_shift,
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ShiftAPIError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ShiftAPIError::AuthenticationError(AuthAPIError::UnexpectedError(_))
            | ShiftAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
            ShiftAPIError::AuthenticationError(AuthAPIError::MissingToken) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, "Missing token".to_string())
            }
            ShiftAPIError::AuthenticationError(AuthAPIError::InvalidToken) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            ShiftAPIError::NotFound(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ShiftAPIError::Forbidden(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::FORBIDDEN, message.clone())
            }
            ShiftAPIError::ConcurrentModification => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, self.to_string())
            }
            ShiftAPIError::ValidationError(e) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, e.as_ref().clone())
            }
            ShiftAPIError::InvalidTimeFormat(_)
            | ShiftAPIError::InvalidShiftDuration(_)
            | ShiftAPIError::ShiftConflict
            | ShiftAPIError::AlreadyClockedIn
            | ShiftAPIError::NotClockedIn
            | ShiftAPIError::AlreadyClockedOut
            | ShiftAPIError::CannotDeleteCompleted
            | ShiftAPIError::InvalidStatusTransition(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        };
        let body = Json(ErrorResponse {
            error: self.kind().to_string(),
            message,
        });
        (status, body).into_response()
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let allowed_origins = ALLOWED_ORIGINS
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_credentials(true)
            .allow_origin(allowed_origins);

        let router = Router::new()
            .route("/shifts", post(create_shift).get(list_shifts))
            .route("/shifts/my", get(my_shifts))
            .route("/shifts/stats", get(shift_stats))
            .route(
                "/shifts/:id",
                get(get_shift).put(update_shift).delete(delete_shift),
            )
            .route("/shifts/:id/clock", put(clock_shift))
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}
