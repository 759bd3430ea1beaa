//! HTTP server startup.

use anyhow::Result;
use tracing::info;

use crate::api::{ApiState, create_router};
use crate::auth::{AuthGate, TokenAllowList};
use crate::config::ServiceConfig;
use crate::operations::UserService;

/// Build the application state for `config` with a fresh, empty store.
pub fn build_state(config: &ServiceConfig) -> ApiState {
    let gate = AuthGate::new(TokenAllowList::builtin());
    ApiState::new(UserService::new(gate), config.unavailable_delay())
}

/// Serve the user API on `config.bind` until Ctrl-C.
pub async fn start_http(config: ServiceConfig) -> Result<()> {
    let router = create_router(build_state(&config));
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;

    info!("User registry listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("User registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_state_uses_configured_delay() {
        let config = ServiceConfig {
            unavailable_delay_ms: 15,
            ..Default::default()
        };
        let state = build_state(&config);
        assert_eq!(state.unavailable_delay.as_millis(), 15);
        assert_eq!(state.service.user_count().await, 0);
    }
}
