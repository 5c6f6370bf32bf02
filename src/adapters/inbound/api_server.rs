//! Geolocation HTTP API
//!
//! Exposes the lookup facade over HTTP and maps lookup errors to
//! status codes (400 invalid input, 404 not found, 500 anything else).

use crate::application::LocationFacade;
use crate::domain::error::{ErrorKind, LookupError};
use crate::infrastructure::ShutdownController;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Query string of the lookup endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpQuery {
    /// Address to locate; the host's public IP is used when absent
    #[serde(default)]
    pub ip: Option<String>,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExceptionBody {
    pub message: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub facade: Arc<LocationFacade>,
}

/// Error rendered as an HTTP response.
pub enum ApiError {
    /// The query string could not be parsed
    BadQuery(String),
    Lookup(LookupError),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self::Lookup(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadQuery(message) => {
                tracing::error!("request contains malformed query: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Lookup(err) => {
                let status = match err.kind() {
                    ErrorKind::InvalidInput => {
                        tracing::error!("request contains invalid IP: {}", err);
                        StatusCode::BAD_REQUEST
                    }
                    ErrorKind::NotFound => {
                        tracing::error!("unable to find location for IP address: {}", err);
                        StatusCode::NOT_FOUND
                    }
                    ErrorKind::Failure => {
                        tracing::error!(
                            "an unexpected error happened while processing request: {}",
                            err
                        );
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
        };

        (status, Json(ExceptionBody { message })).into_response()
    }
}

/// Build the API router.
pub fn router(facade: Arc<LocationFacade>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/geolocation/ips/city", get(city_handler))
        .route("/geolocation/ips/country", get(country_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(ApiState { facade })
}

/// HTTP server for geolocation lookups.
pub struct ApiServer {
    listen_addr: String,
    facade: Arc<LocationFacade>,
}

impl ApiServer {
    pub fn new(listen_addr: String, facade: Arc<LocationFacade>) -> Self {
        Self {
            listen_addr,
            facade,
        }
    }

    /// Run the API server until `shutdown` fires.
    pub async fn run(&self, shutdown: ShutdownController) -> anyhow::Result<()> {
        let app = router(self.facade.clone());

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("geolocation API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("geolocation API stopped");
        Ok(())
    }
}

// Handler functions

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn city_handler(
    State(state): State<ApiState>,
    query: Result<Query<IpQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let location = state.facade.get_city_location(query.ip.as_deref()).await?;
    Ok(Json(location))
}

async fn country_handler(
    State(state): State<ApiState>,
    query: Result<Query<IpQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let location = state
        .facade
        .get_country_location(query.ip.as_deref())
        .await?;
    Ok(Json(location))
}
