use crate::domain::broker::CommandPublisher;
use crate::domain::errors::DispatchError;
use crate::domain::lighting::{
    Command, ControllerId, Rgb, SegmentCommand, SegmentState, Topic, ZoneResolver, hex_to_rgb,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub const ACTIVATE_ACTION: &str = "activate";
pub const DEFAULT_BRIGHTNESS: u8 = 128;
pub const DEFAULT_COLOR: &str = "#00FF00";

#[derive(Error, Debug)]
pub enum ZoneRequestError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Request body must not be null")]
    NullBody,
}

/// ゾーン点灯リクエスト
///
/// フィールドの型は検証しない。偽とみなされる値 (`null`, `false`, `0`, `""`) は
/// 既定値に置き換え、それ以外はそのままコマンドに載せる。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneLightRequest {
    pub action: Option<Value>,
    pub color: Option<Value>,
    pub brightness: Option<Value>,
    /// 受け付けるだけで現状は使っていない
    pub duration: Option<Value>,
}

impl ZoneLightRequest {
    /// リクエストボディを解釈する
    ///
    /// 失敗するのは JSON として読めない場合と `null` の場合だけ。
    /// オブジェクト以外の値はすべてのフィールドが省略されたものとして扱う。
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ZoneRequestError> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Null => Err(ZoneRequestError::NullBody),
            Value::Object(fields) => Ok(Self {
                action: fields.get("action").cloned(),
                color: fields.get("color").cloned(),
                brightness: fields.get("brightness").cloned(),
                duration: fields.get("duration").cloned(),
            }),
            _ => Ok(Self::default()),
        }
    }

    pub fn is_activation(&self) -> bool {
        self.action.as_ref().and_then(Value::as_str) == Some(ACTIVATE_ACTION)
    }

    pub fn brightness_or_default(&self) -> Value {
        self.brightness
            .as_ref()
            .filter(|bri| is_truthy(bri))
            .cloned()
            .unwrap_or_else(|| Value::from(DEFAULT_BRIGHTNESS))
    }

    /// 文字列以外の色指定は黒になる
    pub fn color_or_default(&self) -> Rgb {
        match self.color.as_ref().filter(|color| is_truthy(color)) {
            None => hex_to_rgb(DEFAULT_COLOR),
            Some(Value::String(hex)) => hex_to_rgb(hex),
            Some(_) => Rgb::BLACK,
        }
    }

    fn segment_state(&self, segment_index: u32) -> SegmentState {
        SegmentState {
            id: segment_index,
            on: self.is_activation(),
            bri: self.brightness_or_default(),
            col: vec![self.color_or_default()],
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// ゾーン制御の結果
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDispatch {
    pub zone: String,
    pub controller: ControllerId,
    /// リクエストの `action` をそのまま返す
    pub action: Option<Value>,
}

/// ゾーンをコントローラーに解決し、セグメントコマンドを発行する
pub struct ControlZoneUseCase {
    publisher: Arc<dyn CommandPublisher>,
    resolver: ZoneResolver,
}

impl ControlZoneUseCase {
    pub fn new(publisher: Arc<dyn CommandPublisher>) -> Self {
        Self {
            publisher,
            resolver: ZoneResolver::new(),
        }
    }

    pub async fn execute(
        &self,
        zone_id: &str,
        request: ZoneLightRequest,
    ) -> Result<ZoneDispatch, DispatchError> {
        let target = self.resolver.resolve(zone_id);
        let topic = Topic::for_controller(&target.controller);
        let command = Command::try_from(SegmentCommand::single(
            request.segment_state(target.segment_index),
        ))?;

        if let Some(duration) = &request.duration {
            debug!(zone = zone_id, %duration, "Ignoring zone duration");
        }
        info!(
            zone = zone_id,
            %topic,
            command = %command.as_value(),
            "Dispatching zone command"
        );

        self.publisher.publish(&topic, command.to_payload()?).await?;

        Ok(ZoneDispatch {
            zone: zone_id.to_string(),
            controller: target.controller,
            action: request.action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::broker::ConnectionState;
    use crate::test_support::RecordingPublisher;
    use serde_json::json;

    fn request(body: Value) -> ZoneLightRequest {
        ZoneLightRequest::from_json_slice(body.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_defaults_for_missing_or_falsy_fields() {
        let empty = request(json!({}));
        assert!(!empty.is_activation());
        assert_eq!(empty.brightness_or_default(), json!(128));
        assert_eq!(empty.color_or_default(), Rgb(0, 255, 0));

        let falsy = request(json!({"brightness": 0, "color": "", "action": null}));
        assert_eq!(falsy.brightness_or_default(), json!(128));
        assert_eq!(falsy.color_or_default(), Rgb(0, 255, 0));
        assert_eq!(falsy.action, Some(Value::Null));

        let nulls = request(json!({"brightness": null, "color": null}));
        assert_eq!(nulls.brightness_or_default(), json!(128));
        assert_eq!(nulls.color_or_default(), Rgb(0, 255, 0));

        let false_flags = request(json!({"brightness": false, "color": false}));
        assert_eq!(false_flags.brightness_or_default(), json!(128));
        assert_eq!(false_flags.color_or_default(), Rgb(0, 255, 0));
    }

    #[test]
    fn test_truthy_values_pass_through_untyped() {
        assert_eq!(request(json!({"brightness": 300})).brightness_or_default(), json!(300));
        assert_eq!(request(json!({"brightness": "200"})).brightness_or_default(), json!("200"));
        assert_eq!(request(json!({"brightness": 200.0})).brightness_or_default(), json!(200.0));
        assert_eq!(request(json!({"color": 123})).color_or_default(), Rgb::BLACK);
        assert_eq!(request(json!({"color": [1, 2, 3]})).color_or_default(), Rgb::BLACK);

        let flagged = request(json!({"action": true}));
        assert!(!flagged.is_activation());
        assert_eq!(flagged.action, Some(json!(true)));
    }

    #[test]
    fn test_non_object_bodies_use_defaults() {
        for body in ["5", "\"activate\"", "[1,2]", "true"] {
            let parsed = ZoneLightRequest::from_json_slice(body.as_bytes()).unwrap();
            assert_eq!(parsed, ZoneLightRequest::default(), "body: {body}");
        }
    }

    #[test]
    fn test_rejects_only_unparsable_or_null_bodies() {
        assert!(matches!(
            ZoneLightRequest::from_json_slice(b"null"),
            Err(ZoneRequestError::NullBody)
        ));
        assert!(matches!(
            ZoneLightRequest::from_json_slice(b""),
            Err(ZoneRequestError::Json(_))
        ));
        assert!(matches!(
            ZoneLightRequest::from_json_slice(b"{\"action\":"),
            Err(ZoneRequestError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_activate_zone() {
        let publisher = Arc::new(RecordingPublisher::connected());
        let use_case = ControlZoneUseCase::new(publisher.clone());

        let dispatch = use_case
            .execute(
                "east",
                request(json!({"action": "activate", "color": "#FF0000", "brightness": 200})),
            )
            .await
            .unwrap();

        assert_eq!(dispatch.controller.as_str(), "controller-east");
        assert_eq!(dispatch.action, Some(json!("activate")));
        assert_eq!(
            publisher.published_json(),
            vec![(
                "wled/controller-east/api".to_string(),
                json!({"seg": [{"id": 0, "on": true, "bri": 200, "col": [[255, 0, 0]]}]})
            )]
        );
    }

    #[tokio::test]
    async fn test_deactivate_uses_defaults() {
        let publisher = Arc::new(RecordingPublisher::connected());
        let use_case = ControlZoneUseCase::new(publisher.clone());

        use_case
            .execute("east", request(json!({"action": "deactivate", "duration": 5000})))
            .await
            .unwrap();

        assert_eq!(
            publisher.published_json()[0].1,
            json!({"seg": [{"id": 0, "on": false, "bri": 128, "col": [[0, 255, 0]]}]})
        );
    }

    #[tokio::test]
    async fn test_out_of_range_brightness_is_published_as_given() {
        let publisher = Arc::new(RecordingPublisher::connected());
        let use_case = ControlZoneUseCase::new(publisher.clone());

        use_case
            .execute("east", request(json!({"action": "activate", "brightness": 300})))
            .await
            .unwrap();

        assert_eq!(publisher.published_json()[0].1["seg"][0]["bri"], json!(300));
    }

    #[tokio::test]
    async fn test_malformed_color_becomes_black() {
        let publisher = Arc::new(RecordingPublisher::connected());
        let use_case = ControlZoneUseCase::new(publisher.clone());

        use_case
            .execute("porch", request(json!({"action": "activate", "color": "purple"})))
            .await
            .unwrap();

        assert_eq!(
            publisher.published_json()[0].1["seg"][0]["col"],
            json!([[0, 0, 0]])
        );
    }

    #[tokio::test]
    async fn test_disconnected_broker_fails() {
        let publisher = Arc::new(RecordingPublisher::failing(
            DispatchError::BrokerUnavailable(ConnectionState::Disconnected),
        ));
        let use_case = ControlZoneUseCase::new(publisher);

        let result = use_case.execute("east", ZoneLightRequest::default()).await;
        assert!(matches!(result, Err(DispatchError::BrokerUnavailable(_))));
    }
}
