//! Web インターフェース
//!
//! WLED コマンドを受け付ける HTTP API と、コントロールパネルの配信を提供します。
//! 起動時に選ばれた送出方式 (MQTT またはデバイスへの直接転送) に応じてルートが変わります。

mod command_handlers;
mod cors;
mod error_response;
mod handlers;
mod models;
mod proxy_handlers;
mod static_assets;

pub mod server;

// 内部使用のため、必要な型のみを再エクスポート
pub(crate) use command_handlers::{BrokerState, control_zone_light, publish_wled_command};
pub(crate) use cors::apply_cors;
pub(crate) use handlers::health;
pub(crate) use proxy_handlers::{ProxyState, forward_wled_state};
pub use static_assets::StaticAssets;
