use crate::config::BridgeConfig;
use crate::interfaces::web::server::create_server;

/// ブリッジを起動するユースケース
pub struct RunApplicationUseCase {
    config: BridgeConfig,
}

impl RunApplicationUseCase {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        // Delegate to the web server module
        create_server(&self.config).await
    }
}
