use super::error_response::ErrorResponse;
use super::models::{PublishResponse, ZoneResponse, first_query_value};
use crate::application::use_cases::{ControlZoneUseCase, PublishCommandUseCase, ZoneLightRequest};
use crate::domain::broker::CommandPublisher;
use crate::domain::lighting::{Command, ControllerId};
use axum::{
    Json,
    body::Bytes,
    extract::{RawQuery, State},
    http::{StatusCode, Uri},
};
use std::sync::Arc;
use tracing::{error, warn};

const ZONES_PREFIX: &str = "/api/zones/";

/// State shared by the broker-mode routes.
pub struct BrokerState {
    pub publisher: Arc<dyn CommandPublisher>,
    publish_command: PublishCommandUseCase,
    control_zone: ControlZoneUseCase,
}

impl BrokerState {
    pub fn new(publisher: Arc<dyn CommandPublisher>) -> Self {
        Self {
            publish_command: PublishCommandUseCase::new(publisher.clone()),
            control_zone: ControlZoneUseCase::new(publisher.clone()),
            publisher,
        }
    }
}

/// Publish a raw WLED command to `wled/<controller>/api`
pub async fn publish_wled_command(
    State(state): State<Arc<BrokerState>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<PublishResponse>, ErrorResponse> {
    let command = Command::from_json_slice(&body).map_err(|e| {
        warn!(error = %e, "JSON parse error");
        ErrorResponse::new(StatusCode::BAD_REQUEST, "Invalid JSON").with_message(e.to_string())
    })?;
    let controller =
        ControllerId::or_default(first_query_value(query.as_deref(), "controller").as_deref());

    let published = state
        .publish_command
        .execute(&controller, command)
        .await
        .map_err(|e| {
            error!(%controller, error = %e, "MQTT publish error");
            ErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to publish MQTT message",
            )
            .with_message(e.to_string())
        })?;

    Ok(Json(PublishResponse {
        success: true,
        topic: published.topic.to_string(),
        command: published.command,
    }))
}

/// Turn a zone's light on or off
///
/// The zone id is the raw path segment. Percent-escapes are not decoded.
pub async fn control_zone_light(
    State(state): State<Arc<BrokerState>>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<ZoneResponse>, ErrorResponse> {
    let zone_id = raw_zone_segment(uri.path()).to_string();
    let request = ZoneLightRequest::from_json_slice(&body).map_err(|e| {
        warn!(zone = %zone_id, error = %e, "Invalid zone request");
        ErrorResponse::new(StatusCode::BAD_REQUEST, "Invalid request").with_message(e.to_string())
    })?;

    let dispatch = state
        .control_zone
        .execute(&zone_id, request)
        .await
        .map_err(|e| {
            error!(zone = %zone_id, error = %e, "Zone dispatch failed");
            ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to control zone")
                .with_message(e.to_string())
        })?;

    Ok(Json(ZoneResponse {
        success: true,
        zone: dispatch.zone,
        controller: dispatch.controller.to_string(),
        action: dispatch.action,
    }))
}

fn raw_zone_segment(path: &str) -> &str {
    path.strip_prefix(ZONES_PREFIX)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_zone_segment_keeps_escapes() {
        assert_eq!(raw_zone_segment("/api/zones/east/light"), "east");
        assert_eq!(raw_zone_segment("/api/zones/east%20wing/light"), "east%20wing");
        assert_eq!(raw_zone_segment("/api/zones/caf%C3%A9/light"), "caf%C3%A9");
        assert_eq!(raw_zone_segment("/other"), "");
    }
}
