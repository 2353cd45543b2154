use crate::domain::lighting::Command;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    pub topic: String,
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneResponse {
    pub success: bool,
    pub zone: String,
    pub controller: String,
    /// 省略時のみ出力しない。`null` は `null` のまま返す
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mqtt: String,
    pub broker: String,
}

/// クエリ文字列から指定したキーの最初の値を取り出す
///
/// 同じキーが複数あっても拒否せず、先頭のものを採用する。
pub fn first_query_value(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}
