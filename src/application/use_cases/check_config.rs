use crate::config::{BridgeConfig, ConfigError, DispatchMode};
use std::net::SocketAddr;
use std::path::PathBuf;

/// ブローカー設定の要約 (パスワードは含めない)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSummary {
    pub url: String,
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub authenticated: bool,
}

/// 解決済みの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    pub bind_addr: SocketAddr,
    pub mode: DispatchMode,
    pub broker: Option<BrokerSummary>,
    pub index_path: PathBuf,
    pub index_present: bool,
}

/// 起動せずに設定を検証して表示するユースケース
pub struct CheckConfigUseCase {
    config: BridgeConfig,
}

impl CheckConfigUseCase {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ConfigReport, ConfigError> {
        let report = self.resolve()?;

        println!("🔍 WLED Bridge Configuration");
        println!("============================");
        println!("   Listen:      http://{}", report.bind_addr);
        println!("   Mode:        {:?}", report.mode);
        match &report.broker {
            Some(broker) => {
                println!("   Broker:      {}", broker.url);
                println!("   Endpoint:    {}:{}", broker.host, broker.port);
                println!("   TLS:         {}", if broker.tls { "yes" } else { "no" });
                println!(
                    "   Credentials: {}",
                    if broker.authenticated { "set" } else { "none" }
                );
            }
            None => println!("   Broker:      (not used in proxy mode)"),
        }
        println!(
            "   Control panel: {} ({})",
            report.index_path.display(),
            if report.index_present { "found" } else { "missing" }
        );

        Ok(report)
    }

    fn resolve(&self) -> Result<ConfigReport, ConfigError> {
        let broker = match self.config.mode {
            DispatchMode::Mqtt => {
                let settings = self.config.broker_settings()?;
                Some(BrokerSummary {
                    authenticated: settings.has_credentials(),
                    url: settings.url,
                    host: settings.host,
                    port: settings.port,
                    tls: settings.tls,
                })
            }
            DispatchMode::Proxy => None,
        };
        let index_path = self.config.index_path();

        Ok(ConfigReport {
            bind_addr: self.config.socket_addr()?,
            mode: self.config.mode,
            broker,
            index_present: index_path.is_file(),
            index_path,
        })
    }
}
