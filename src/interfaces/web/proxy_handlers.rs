use super::error_response::ErrorResponse;
use super::models::first_query_value;
use crate::application::use_cases::ForwardStateUseCase;
use crate::domain::proxy::DeviceForwarder;
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, warn};

/// State shared by the proxy-mode routes.
pub struct ProxyState {
    forward_state: ForwardStateUseCase,
}

impl ProxyState {
    pub fn new(forwarder: Arc<dyn DeviceForwarder>) -> Self {
        Self {
            forward_state: ForwardStateUseCase::new(forwarder),
        }
    }
}

/// Forward the body to `<host>/json/state` and relay the device's answer untouched
pub async fn forward_wled_state(
    State(state): State<Arc<ProxyState>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ErrorResponse> {
    let Some(host) = first_query_value(query.as_deref(), "host").filter(|host| !host.is_empty())
    else {
        return Err(ErrorResponse::new(
            StatusCode::BAD_REQUEST,
            "Missing host parameter",
        ));
    };

    match state.forward_state.execute(&host, body.to_vec()).await {
        Ok(forwarded) => {
            let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((
                status,
                [(header::CONTENT_TYPE, "application/json")],
                forwarded.body,
            )
                .into_response())
        }
        Err(e) if e.is_client_error() => {
            warn!(%host, error = %e, "Rejected proxy host");
            Err(
                ErrorResponse::new(StatusCode::BAD_REQUEST, "Invalid host parameter")
                    .with_message(e.to_string()),
            )
        }
        Err(e) => {
            error!(%host, error = %e, "Proxy error");
            Err(
                ErrorResponse::new(StatusCode::BAD_GATEWAY, "Failed to reach WLED controller")
                    .with_message(e.to_string()),
            )
        }
    }
}
