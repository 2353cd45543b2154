use super::ack_tracker::AckTracker;
use crate::config::BrokerSettings;
use crate::domain::broker::{CommandPublisher, ConnectionState};
use crate::domain::errors::DispatchError;
use crate::domain::lighting::{STATUS_TOPIC_FILTER, Topic};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, Incoming, MqttOptions, QoS, Request, Transport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const REQUEST_CHANNEL_CAPACITY: usize = 64;

/// rumqttc を使ったブローカー接続
///
/// 接続状態はイベントループのタスクだけが更新し、リクエストハンドラーは
/// `watch` チャネル越しにスナップショットを読むだけにする。
/// 発行は PUBACK を受け取った時点で完了とする。
pub struct MqttBrokerConnection {
    client: AsyncClient,
    state: watch::Receiver<ConnectionState>,
    acks: Arc<Mutex<AckTracker>>,
    ack_timeout: Duration,
    broker_url: String,
}

impl MqttBrokerConnection {
    /// クライアントを作成し、イベントループを tokio ランタイム上で起動する
    pub fn connect(settings: &BrokerSettings) -> Self {
        let (client, eventloop) = AsyncClient::new(mqtt_options(settings), REQUEST_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let acks = Arc::new(Mutex::new(AckTracker::new()));

        info!(
            broker = %settings.url,
            client_id = %settings.client_id,
            "Connecting to MQTT broker"
        );

        tokio::spawn(run_event_loop(
            client.clone(),
            eventloop,
            state_tx,
            acks.clone(),
            settings.reconnect_delay,
            settings.connect_timeout,
        ));

        Self {
            client,
            state: state_rx,
            acks,
            ack_timeout: settings.ack_timeout,
            broker_url: settings.url.clone(),
        }
    }
}

#[async_trait]
impl CommandPublisher for MqttBrokerConnection {
    async fn publish(&self, topic: &Topic, payload: Vec<u8>) -> Result<(), DispatchError> {
        let state = self.connection_state();
        if !state.is_connected() {
            warn!(%topic, %state, "Refusing to publish while broker is not connected");
            return Err(DispatchError::BrokerUnavailable(state));
        }

        // チャネルへの投入と待機列への登録の間に送信イベントが割り込まないようにする
        let ack = {
            let mut acks = lock(&self.acks);
            self.client
                .try_publish(topic.as_str(), QoS::AtLeastOnce, false, payload)
                .map_err(|e| DispatchError::PublishFailed(e.to_string()))?;
            acks.register()
        };

        match tokio::time::timeout(self.ack_timeout, ack).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(DispatchError::PublishFailed(
                "broker connection closed".to_string(),
            )),
            Err(_) => {
                warn!(%topic, timeout_ms = self.ack_timeout.as_millis() as u64, "PUBACK not received");
                Err(DispatchError::PublishFailed(format!(
                    "no PUBACK within {}ms",
                    self.ack_timeout.as_millis()
                )))
            }
        }
    }

    fn connection_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn broker_url(&self) -> &str {
        &self.broker_url
    }
}

fn lock(acks: &Mutex<AckTracker>) -> MutexGuard<'_, AckTracker> {
    acks.lock().unwrap_or_else(PoisonError::into_inner)
}

fn mqtt_options(settings: &BrokerSettings) -> MqttOptions {
    let mut options = MqttOptions::new(&settings.client_id, &settings.host, settings.port);
    options
        .set_clean_session(true)
        .set_keep_alive(settings.keep_alive);

    if settings.has_credentials() {
        options.set_credentials(&settings.username, &settings.password);
    }
    if settings.tls {
        options.set_transport(Transport::tls_with_default_config());
    }

    options
}

fn set_state(state: &watch::Sender<ConnectionState>, next: ConnectionState) {
    let previous = state.send_replace(next);
    if previous != next {
        debug!(%previous, %next, "MQTT connection state changed");
    }
}

/// 失敗時の状態。一度も繋がっていなければ `Error`、切断なら `Disconnected`
fn failure_state(ever_connected: bool) -> ConnectionState {
    if ever_connected {
        ConnectionState::Disconnected
    } else {
        ConnectionState::Error
    }
}

/// 接続断で届かなかった発行をすべて失敗させる
///
/// rumqttc は未確認の発行を次のセッションで再送するため `pending` に戻すが、
/// 呼び出し元には既に失敗を返すので再送はさせない。
fn abandon_unacked(eventloop: &mut EventLoop, acks: &Mutex<AckTracker>, reason: &str) {
    let mut acks = lock(acks);

    // 残った送信イベントを次のセッションで新しい発行と取り違えないよう捨てる
    eventloop.state.events.clear();
    eventloop.state.collision = None;
    eventloop
        .pending
        .retain(|request| !matches!(request, Request::Publish(_)));

    let abandoned = acks.fail_all(reason);
    if abandoned > 0 {
        warn!(count = abandoned, "Dropped unacknowledged publishes after connection loss");
    }
}

async fn run_event_loop(
    client: AsyncClient,
    mut eventloop: EventLoop,
    state: watch::Sender<ConnectionState>,
    acks: Arc<Mutex<AckTracker>>,
    reconnect_delay: Duration,
    connect_timeout: Duration,
) {
    let mut ever_connected = false;

    loop {
        if state.is_closed() {
            debug!("Broker connection handle dropped, stopping MQTT event loop");
            break;
        }

        // 接続確立までは試行ごとに上限時間を設ける
        let polled = if state.borrow().is_connected() {
            eventloop.poll().await
        } else {
            match tokio::time::timeout(connect_timeout, eventloop.poll()).await {
                Ok(polled) => polled,
                Err(_) => {
                    warn!(
                        timeout_secs = connect_timeout.as_secs(),
                        "MQTT connection attempt timed out"
                    );
                    set_state(&state, failure_state(ever_connected));
                    tokio::time::sleep(reconnect_delay).await;
                    continue;
                }
            }
        };

        if let Ok(event) = &polled {
            lock(&acks).observe(event);
        }

        match polled {
            Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                ever_connected = true;

                // clean session のため再接続のたびに購読し直す
                if let Err(e) = client.try_subscribe(STATUS_TOPIC_FILTER, QoS::AtMostOnce) {
                    warn!(error = %e, topic = STATUS_TOPIC_FILTER, "Failed to subscribe");
                }

                set_state(&state, ConnectionState::Connected);
                info!("Connected to MQTT broker");
            }
            Ok(Event::Incoming(Incoming::SubAck(_))) => {
                info!(topic = STATUS_TOPIC_FILTER, "Subscribed to WLED status topics");
            }
            Ok(Event::Incoming(Incoming::Publish(message))) => {
                info!(
                    topic = %message.topic,
                    payload = %String::from_utf8_lossy(&message.payload),
                    "Received status message"
                );
            }
            Ok(Event::Incoming(Incoming::Disconnect)) => {
                warn!("Broker sent disconnect");
                set_state(&state, ConnectionState::Disconnected);
            }
            Ok(_) => {}
            Err(e) => {
                error!(
                    error = %e,
                    retry_in_secs = reconnect_delay.as_secs(),
                    "MQTT connection error"
                );
                set_state(&state, failure_state(ever_connected));
                abandon_unacked(&mut eventloop, &acks, &e.to_string());
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
