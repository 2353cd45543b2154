//! インフラストラクチャ層
//!
//! MQTT ブローカーと WLED デバイスの HTTP API への実際の接続を担う

pub mod broker;
pub mod http;
