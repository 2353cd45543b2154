//! ブリッジの設定
//!
//! CLI と環境変数から組み立てられ、起動時に一度だけ検証される。

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_BROKER_URL: &str = "mqtt://test.mosquitto.org:1883";
pub const DEFAULT_STATIC_DIR: &str = "web";

const MQTT_PORT: u16 = 1883;
const MQTTS_PORT: u16 = 8883;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid broker URL '{url}': {reason}")]
    InvalidBrokerUrl { url: String, reason: String },

    #[error("Unsupported broker scheme '{0}' (expected mqtt, tcp, mqtts or ssl)")]
    UnsupportedScheme(String),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),
}

/// どちらの経路でコマンドを届けるか
///
/// 両方を同時に動かすことはなく、起動時にどちらか一方を選ぶ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DispatchMode {
    /// MQTT ブローカーへ発行する
    #[default]
    Mqtt,
    /// デバイスの `/json/state` へ直接 POST する
    Proxy,
}

/// ブリッジ全体の設定
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub bind_host: String,
    pub port: u16,
    pub mode: DispatchMode,
    pub broker_url: String,
    pub mqtt_username: String,
    pub mqtt_password: String,
    pub static_dir: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            mode: DispatchMode::default(),
            broker_url: DEFAULT_BROKER_URL.to_string(),
            mqtt_username: String::new(),
            mqtt_password: String::new(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl BridgeConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse()
            .map_err(|_| ConfigError::InvalidBindAddress(addr.clone()))
    }

    pub fn broker_settings(&self) -> Result<BrokerSettings, ConfigError> {
        BrokerSettings::from_url(&self.broker_url, &self.mqtt_username, &self.mqtt_password)
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

/// ブローカー接続の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    /// 設定された URL (ヘルスチェックでそのまま返す)
    pub url: String,
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub keep_alive: Duration,
    pub reconnect_delay: Duration,
    pub connect_timeout: Duration,
    /// QoS 1 の PUBACK を待つ上限
    pub ack_timeout: Duration,
}

impl BrokerSettings {
    pub const KEEP_ALIVE: Duration = Duration::from_secs(60);
    pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const ACK_TIMEOUT: Duration = Duration::from_secs(10);

    /// `mqtt://host:port` 形式の URL から設定を作る
    ///
    /// 明示的なユーザー名が空のときだけ URL 内の認証情報を使う。
    pub fn from_url(url: &str, username: &str, password: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBrokerUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
        let (tls, default_port) = match parsed.scheme() {
            "mqtt" | "tcp" => (false, MQTT_PORT),
            "mqtts" | "ssl" => (true, MQTTS_PORT),
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?
            .to_string();

        let (username, password) = if username.is_empty() && !parsed.username().is_empty() {
            (
                parsed.username().to_string(),
                parsed.password().unwrap_or_default().to_string(),
            )
        } else {
            (username.to_string(), password.to_string())
        };

        Ok(Self {
            url: url.to_string(),
            host,
            port: parsed.port().unwrap_or(default_port),
            tls,
            client_id: format!("wled-bridge-{}", Uuid::new_v4().simple()),
            username,
            password,
            keep_alive: Self::KEEP_ALIVE,
            reconnect_delay: Self::RECONNECT_DELAY,
            connect_timeout: Self::CONNECT_TIMEOUT,
            ack_timeout: Self::ACK_TIMEOUT,
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_broker_url() {
        let settings = BridgeConfig::default().broker_settings().unwrap();
        assert_eq!(settings.url, DEFAULT_BROKER_URL);
        assert_eq!(settings.host, "test.mosquitto.org");
        assert_eq!(settings.port, 1883);
        assert!(!settings.tls);
        assert!(!settings.has_credentials());
        assert!(settings.client_id.starts_with("wled-bridge-"));
        assert_eq!(settings.reconnect_delay, Duration::from_secs(5));
        assert_eq!(settings.connect_timeout, Duration::from_secs(30));
        assert_eq!(settings.ack_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_scheme_default_ports() {
        let plain = BrokerSettings::from_url("tcp://broker.local", "", "").unwrap();
        assert_eq!(plain.port, 1883);
        assert!(!plain.tls);

        let tls = BrokerSettings::from_url("mqtts://broker.local", "", "").unwrap();
        assert_eq!(tls.port, 8883);
        assert!(tls.tls);

        let custom = BrokerSettings::from_url("ssl://broker.local:9883", "", "").unwrap();
        assert_eq!(custom.port, 9883);
    }

    #[test]
    fn test_credentials() {
        let explicit = BrokerSettings::from_url("mqtt://u:p@broker", "bridge", "secret").unwrap();
        assert_eq!(explicit.username, "bridge");
        assert_eq!(explicit.password, "secret");

        let embedded = BrokerSettings::from_url("mqtt://u:p@broker", "", "").unwrap();
        assert_eq!(embedded.username, "u");
        assert_eq!(embedded.password, "p");
        assert!(embedded.has_credentials());
    }

    #[test]
    fn test_invalid_broker_urls() {
        assert_eq!(
            BrokerSettings::from_url("ws://broker:8080", "", ""),
            Err(ConfigError::UnsupportedScheme("ws".to_string()))
        );
        assert!(matches!(
            BrokerSettings::from_url("not a url", "", ""),
            Err(ConfigError::InvalidBrokerUrl { .. })
        ));
        assert!(matches!(
            BrokerSettings::from_url("mqtt://", "", ""),
            Err(ConfigError::InvalidBrokerUrl { .. })
        ));
    }

    #[test]
    fn test_socket_addr() {
        let config = BridgeConfig {
            bind_host: "127.0.0.1".to_string(),
            port: 9000,
            ..BridgeConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().port(), 9000);

        let bad = BridgeConfig {
            bind_host: "not-an-ip".to_string(),
            ..BridgeConfig::default()
        };
        assert!(bad.socket_addr().is_err());
        assert_eq!(
            BridgeConfig::default().index_path(),
            PathBuf::from("web/index.html")
        );
    }
}
