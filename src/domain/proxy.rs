//! デバイスの HTTP API への直接転送

use super::errors::DispatchError;
use async_trait::async_trait;
use url::Url;

/// WLED の状態更新エンドポイント
pub const STATE_PATH: &str = "/json/state";

const DEFAULT_PORT: u16 = 80;

/// 転送先 (ホスト・ポート・パス)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ProxyTarget {
    /// 呼び出し側が指定したホスト文字列に `/json/state` を付けて解決する
    ///
    /// スキームが無ければ `http://` を補う。ポートの既定値はスキームに関係なく 80。
    pub fn parse(host: &str) -> Result<Self, DispatchError> {
        let raw = format!("{host}{STATE_PATH}");
        let raw = if raw.contains("://") {
            raw
        } else {
            format!("http://{raw}")
        };

        let url = Url::parse(&raw).map_err(|_| DispatchError::InvalidHost(host.to_string()))?;
        let hostname = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DispatchError::InvalidHost(host.to_string()))?;

        Ok(Self {
            host: hostname.to_string(),
            port: url.port().unwrap_or(DEFAULT_PORT),
            path: url.path().to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

/// デバイスから返ってきた応答。加工せずに呼び出し元へ返す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait DeviceForwarder: Send + Sync {
    async fn forward(
        &self,
        target: &ProxyTarget,
        body: Vec<u8>,
    ) -> Result<ForwardedResponse, DispatchError>;
}
