//! # WLED Bridge
//!
//! HTTP で受け取った WLED コマンドを、MQTT ブローカー経由でコントローラーへ発行するか、
//! デバイスの JSON API (`/json/state`) へ直接転送するブリッジ
//!
//! このクレートは Domain-Driven Design (DDD) 原則に基づいて設計されており、
//! 以下の層に分かれています：
//!
//! - **Domain Layer**: コマンド・トピック・ゾーンの規則と送出用のトレイト
//! - **Application Layer**: ユースケース
//! - **Infrastructure Layer**: MQTT クライアントと HTTP クライアント
//! - **Interface Layer**: HTTP API とコントロールパネルの配信

pub mod application;
pub mod config;
pub mod debug;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

#[cfg(test)]
pub(crate) mod test_support;

// 公開API
pub use config::{BridgeConfig, DispatchMode};
pub use domain::errors::DispatchError;
