use crate::domain::errors::DispatchError;
use crate::domain::proxy::{DeviceForwarder, ForwardedResponse, ProxyTarget};
use std::sync::Arc;
use tracing::info;

/// デバイスの `/json/state` へボディを転送する
pub struct ForwardStateUseCase {
    forwarder: Arc<dyn DeviceForwarder>,
}

impl ForwardStateUseCase {
    pub fn new(forwarder: Arc<dyn DeviceForwarder>) -> Self {
        Self { forwarder }
    }

    pub async fn execute(
        &self,
        host: &str,
        body: Vec<u8>,
    ) -> Result<ForwardedResponse, DispatchError> {
        let target = ProxyTarget::parse(host)?;
        info!(url = %target.url(), bytes = body.len(), "Forwarding to WLED controller");

        let response = self.forwarder.forward(&target, body).await?;
        info!(url = %target.url(), status = response.status, "WLED controller responded");
        Ok(response)
    }
}
