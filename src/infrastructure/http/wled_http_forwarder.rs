use crate::domain::errors::DispatchError;
use crate::domain::proxy::{DeviceForwarder, ForwardedResponse, ProxyTarget};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::time::Instant;
use tracing::{debug, warn};

/// WLED の JSON API へリクエストをそのまま転送する
///
/// ボディは長さが確定しているので `Content-Length` は reqwest が付与する。
/// タイムアウトは設定しない。応答の遅いデバイスは OS のソケットタイムアウトに任せる。
/// リダイレクトは追わず、3xx もそのまま呼び出し元へ返す。
#[derive(Debug, Clone)]
pub struct WledHttpForwarder {
    client: reqwest::Client,
}

impl WledHttpForwarder {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DeviceForwarder for WledHttpForwarder {
    async fn forward(
        &self,
        target: &ProxyTarget,
        body: Vec<u8>,
    ) -> Result<ForwardedResponse, DispatchError> {
        let url = target.url();
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "Failed to reach WLED controller");
                DispatchError::Unreachable(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DispatchError::Unreachable(e.to_string()))?;

        debug!(
            %url,
            status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Forwarded request to WLED controller"
        );

        Ok(ForwardedResponse {
            status,
            body: body.to_vec(),
        })
    }
}
