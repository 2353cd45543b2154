//! テスト用のダブル

use crate::domain::broker::{CommandPublisher, ConnectionState};
use crate::domain::errors::DispatchError;
use crate::domain::lighting::Topic;
use crate::domain::proxy::{DeviceForwarder, ForwardedResponse, ProxyTarget};
use async_trait::async_trait;
use std::sync::Mutex;

pub const TEST_BROKER_URL: &str = "mqtt://broker.test:1883";

/// 発行されたメッセージを記録するだけのパブリッシャー
pub struct RecordingPublisher {
    state: ConnectionState,
    failure: Option<DispatchError>,
    published: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingPublisher {
    pub fn connected() -> Self {
        Self {
            state: ConnectionState::Connected,
            failure: None,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn with_state(state: ConnectionState) -> Self {
        Self {
            state,
            ..Self::connected()
        }
    }

    pub fn failing(error: DispatchError) -> Self {
        Self {
            failure: Some(error),
            ..Self::connected()
        }
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }

    /// 発行された (トピック, JSON) の組
    pub fn published_json(&self) -> Vec<(String, serde_json::Value)> {
        self.published()
            .into_iter()
            .map(|(topic, payload)| (topic, serde_json::from_slice(&payload).unwrap()))
            .collect()
    }
}

#[async_trait]
impl CommandPublisher for RecordingPublisher {
    async fn publish(&self, topic: &Topic, payload: Vec<u8>) -> Result<(), DispatchError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.as_str().to_string(), payload));
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        self.state
    }

    fn broker_url(&self) -> &str {
        TEST_BROKER_URL
    }
}

/// 転送要求を記録し、固定の応答を返すフォワーダー
pub struct RecordingForwarder {
    response: Result<ForwardedResponse, DispatchError>,
    calls: Mutex<Vec<(ProxyTarget, Vec<u8>)>>,
}

impl RecordingForwarder {
    pub fn responding(status: u16, body: &[u8]) -> Self {
        Self {
            response: Ok(ForwardedResponse {
                status,
                body: body.to_vec(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: DispatchError) -> Self {
        Self {
            response: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(ProxyTarget, Vec<u8>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceForwarder for RecordingForwarder {
    async fn forward(
        &self,
        target: &ProxyTarget,
        body: Vec<u8>,
    ) -> Result<ForwardedResponse, DispatchError> {
        self.calls.lock().unwrap().push((target.clone(), body));
        self.response.clone()
    }
}
