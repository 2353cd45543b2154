//! WLED へ送るコマンドとトピックの値オブジェクト

use super::color::Rgb;
use crate::domain::errors::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const TOPIC_NAMESPACE: &str = "wled";

/// ステータス報告を受け取るワイルドカードトピック
pub const STATUS_TOPIC_FILTER: &str = "wled/+/status";

/// 呼び出し側がコントローラーを指定しなかった場合の既定値
pub const DEFAULT_CONTROLLER_ID: &str = "controller-01";

/// コントローラー識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(String);

impl ControllerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 空文字列や未指定の場合は既定のコントローラーを使う
    pub fn or_default(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() => Self::new(id),
            _ => Self::new(DEFAULT_CONTROLLER_ID),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ブローカー上の宛先 `wled/<controller>/api`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn for_controller(controller: &ControllerId) -> Self {
        Self(format!("{TOPIC_NAMESPACE}/{controller}/api"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// デバイスへの指示
///
/// 中身はブリッジ側で解釈しない。直接コマンドは受け取った JSON をそのまま、
/// ゾーンコマンドは [`SegmentCommand`] から組み立てたものを保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(Value);

impl Command {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// ブローカーへ送るコンパクトな JSON に変換
    pub fn to_payload(&self) -> Result<Vec<u8>, DispatchError> {
        serde_json::to_vec(&self.0).map_err(|e| DispatchError::Encoding(e.to_string()))
    }
}

impl TryFrom<SegmentCommand> for Command {
    type Error = DispatchError;

    fn try_from(command: SegmentCommand) -> Result<Self, Self::Error> {
        serde_json::to_value(command)
            .map(Self)
            .map_err(|e| DispatchError::Encoding(e.to_string()))
    }
}

/// セグメント単位の状態指定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentState {
    pub id: u32,
    pub on: bool,
    /// 呼び出し側が指定した値をそのまま渡すため数値型に限定しない
    pub bri: Value,
    pub col: Vec<Rgb>,
}

/// `{"seg": [...]}` 形式の WLED コマンド
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCommand {
    pub seg: Vec<SegmentState>,
}

impl SegmentCommand {
    pub fn single(segment: SegmentState) -> Self {
        Self { seg: vec![segment] }
    }
}
