use super::command_handlers::BrokerState;
use super::models::HealthResponse;
use axum::{Json, extract::State};
use std::sync::Arc;

/// Report broker connectivity
pub async fn health(State(state): State<Arc<BrokerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        mqtt: state
            .publisher
            .connection_state()
            .health_label()
            .to_string(),
        broker: state.publisher.broker_url().to_string(),
    })
}
