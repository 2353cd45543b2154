use crate::domain::broker::CommandPublisher;
use crate::domain::errors::DispatchError;
use crate::domain::lighting::{Command, ControllerId, Topic};
use std::sync::Arc;
use tracing::info;

/// 発行済みコマンド
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedCommand {
    pub topic: Topic,
    pub command: Command,
}

/// 受け取ったコマンドを加工せずにコントローラーのトピックへ発行する
pub struct PublishCommandUseCase {
    publisher: Arc<dyn CommandPublisher>,
}

impl PublishCommandUseCase {
    pub fn new(publisher: Arc<dyn CommandPublisher>) -> Self {
        Self { publisher }
    }

    pub async fn execute(
        &self,
        controller: &ControllerId,
        command: Command,
    ) -> Result<PublishedCommand, DispatchError> {
        let topic = Topic::for_controller(controller);
        let payload = command.to_payload()?;

        info!(%topic, command = %command.as_value(), "Publishing command");
        self.publisher.publish(&topic, payload).await?;
        info!(%topic, "Command sent successfully");

        Ok(PublishedCommand { topic, command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingPublisher;
    use serde_json::json;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_publishes_verbatim_to_controller_topic() {
        let publisher = Arc::new(RecordingPublisher::connected());
        let use_case = PublishCommandUseCase::new(publisher.clone());
        let command = Command::from_value(json!({"seg": [{"id": 0, "on": true}]}));

        let published = use_case
            .execute(&ControllerId::new("controller-07"), command.clone())
            .await
            .unwrap();

        assert_eq!(published.topic.as_str(), "wled/controller-07/api");
        assert_eq!(published.command, command);
        assert_eq!(
            publisher.published(),
            vec![(
                "wled/controller-07/api".to_string(),
                br#"{"seg":[{"id":0,"on":true}]}"#.to_vec()
            )]
        );
        assert!(logs_contain("Command sent successfully"));
    }

    #[tokio::test]
    async fn test_propagates_publish_failure() {
        let publisher = Arc::new(RecordingPublisher::failing(DispatchError::PublishFailed(
            "request channel closed".into(),
        )));
        let use_case = PublishCommandUseCase::new(publisher);

        let result = use_case
            .execute(&ControllerId::new("c"), Command::from_value(json!({})))
            .await;

        assert_eq!(
            result,
            Err(DispatchError::PublishFailed("request channel closed".into()))
        );
    }
}
