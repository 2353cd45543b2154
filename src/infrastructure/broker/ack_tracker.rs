//! QoS 1 発行と PUBACK の対応付け
//!
//! rumqttc はパケット ID をイベントループ内で採番するため、呼び出し側は
//! 自分の発行に付いた ID を直接知ることができない。リクエストチャネルは FIFO なので、
//! `Outgoing::Publish` が届いた順に待機列の先頭から ID を割り当てていく。

use crate::domain::errors::DispatchError;
use rumqttc::{Event, Incoming, Outgoing};
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

pub type AckResult = Result<(), DispatchError>;

#[derive(Debug, Default)]
pub struct AckTracker {
    /// チャネルに積まれたが、まだ書き出されていない発行
    unsent: VecDeque<oneshot::Sender<AckResult>>,
    /// 書き出し済みで PUBACK 待ちの発行
    in_flight: HashMap<u16, oneshot::Sender<AckResult>>,
}

impl AckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// リクエストチャネルへ発行を積んだ直後に呼ぶ
    ///
    /// 積む操作とこの呼び出しは同じロックの内側で行うこと。
    pub fn register(&mut self) -> oneshot::Receiver<AckResult> {
        let (sender, receiver) = oneshot::channel();
        self.unsent.push_back(sender);
        receiver
    }

    pub fn observe(&mut self, event: &Event) {
        match event {
            Event::Outgoing(Outgoing::Publish(pkid)) => self.on_sent(*pkid),
            Event::Incoming(Incoming::PubAck(ack)) => self.on_acked(ack.pkid),
            _ => {}
        }
    }

    fn on_sent(&mut self, pkid: u16) {
        if let Some(waiter) = self.unsent.pop_front() {
            self.in_flight.insert(pkid, waiter);
        }
    }

    fn on_acked(&mut self, pkid: u16) {
        if let Some(waiter) = self.in_flight.remove(&pkid) {
            // 待ち手がタイムアウト済みなら受信側は閉じている
            let _ = waiter.send(Ok(()));
        }
    }

    /// 待っている発行をすべて失敗させ、その件数を返す
    pub fn fail_all(&mut self, reason: &str) -> usize {
        let waiters: Vec<_> = self
            .unsent
            .drain(..)
            .chain(self.in_flight.drain().map(|(_, waiter)| waiter))
            .collect();
        let count = waiters.len();
        for waiter in waiters {
            let _ = waiter.send(Err(DispatchError::PublishFailed(reason.to_string())));
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.unsent.len() + self.in_flight.len()
    }
}
