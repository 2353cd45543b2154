use super::broker::ConnectionState;
use thiserror::Error;

/// コマンドの送出に失敗したときのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("MQTT client is not connected (state: {0})")]
    BrokerUnavailable(ConnectionState),

    #[error("MQTT publish failed: {0}")]
    PublishFailed(String),

    #[error("Failed to encode command: {0}")]
    Encoding(String),

    #[error("Invalid host '{0}'")]
    InvalidHost(String),

    #[error("{0}")]
    Unreachable(String),
}

impl DispatchError {
    /// 呼び出し側の入力に起因するエラーか
    pub fn is_client_error(&self) -> bool {
        matches!(self, DispatchError::InvalidHost(_))
    }
}
