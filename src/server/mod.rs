//! HTTP API server
//!
//! A thin axum layer over [`ScheduleService`]: it deserializes requests,
//! calls the engine, and maps engine failures onto status codes.

pub mod api;

use std::net::SocketAddr;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::crawler::{HttpTransport, Transport};
use crate::schedule::ScheduleService;

pub use api::{create_router, ApiError, ErrorResponse, HealthResponse};

// ============================================================================
// App State
// ============================================================================

/// Shared application state
pub struct AppState<T: Transport = HttpTransport> {
    /// Schedule engine
    pub service: ScheduleService<T>,

    /// Server start time
    pub start_time: Instant,
}

impl<T: Transport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            start_time: self.start_time,
        }
    }
}

impl<T: Transport> AppState<T> {
    pub fn new(service: ScheduleService<T>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// API Server
// ============================================================================

/// Schedule API server
pub struct ApiServer<T: Transport + 'static = HttpTransport> {
    config: ServerConfig,
    state: AppState<T>,
}

impl<T: Transport + 'static> ApiServer<T> {
    pub fn new(config: ServerConfig, service: ScheduleService<T>) -> Self {
        Self {
            config,
            state: AppState::new(service),
        }
    }

    /// Get the application state
    pub fn state(&self) -> AppState<T> {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        // Add CORS layer if enabled
        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        // Add tracing layer if enabled
        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.config.bind_address
    }

    /// Serve until `shutdown_signal` resolves
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!(%addr, "Starting schedule API server");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Schedule API server shutdown complete");
        Ok(())
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Error, Debug, Clone)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind: {0}")]
    Bind(String),

    /// Server error
    #[error("Server error: {0}")]
    Serve(String),
}
