//! メッセージブローカーとの接続に関するドメイン定義

use super::errors::DispatchError;
use super::lighting::Topic;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ブローカー接続の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Disconnected,
    Error,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// ヘルスチェック用の表記。接続済み以外はすべて `disconnected`
    pub fn health_label(&self) -> &'static str {
        if self.is_connected() {
            "connected"
        } else {
            "disconnected"
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Error => "error",
        };
        f.write_str(label)
    }
}

/// コマンドをブローカーへ発行する抽象
///
/// プロセス内で1つだけ生成され、`Arc<dyn CommandPublisher>` としてルーターへ注入される。
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    /// QoS 1 でペイロードを発行する
    async fn publish(&self, topic: &Topic, payload: Vec<u8>) -> Result<(), DispatchError>;

    /// 現在の接続状態のスナップショット
    fn connection_state(&self) -> ConnectionState;

    /// 接続先ブローカーの URL
    fn broker_url(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_label() {
        assert_eq!(ConnectionState::Connected.health_label(), "connected");
        for state in [
            ConnectionState::Connecting,
            ConnectionState::Disconnected,
            ConnectionState::Error,
        ] {
            assert_eq!(state.health_label(), "disconnected");
        }
    }
}
