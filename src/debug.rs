//! ログ機能
//!
//! `tracing` によるコンソール・ファイルへのログ出力を初期化する

use std::fs;
use std::path::PathBuf;
use tracing::{Level, debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "wled-bridge.log";

/// コンソール出力の形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// ログ設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// ログレベル (`RUST_LOG` が設定されていればそちらを優先)
    pub log_level: Level,
    /// コンソールの出力形式
    pub format: LogFormat,
    /// 指定された場合は日次ローテーションのファイルへ JSON で出力
    pub log_directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            format: LogFormat::Pretty,
            log_directory: None,
        }
    }
}

impl LogConfig {
    /// 開発環境用の設定
    pub fn development() -> Self {
        Self {
            log_level: Level::DEBUG,
            ..Self::default()
        }
    }
}

/// `RUST_LOG` が無い場合のフィルター
fn default_filter(level: Level) -> String {
    format!("wled_bridge={level},tower_http=info,rumqttc=warn")
}

fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)))
}

/// ログシステムを初期化
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = build_filter(config.log_level);

    match (&config.log_directory, config.format) {
        (Some(directory), _) => {
            fs::create_dir_all(directory)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, LOG_FILE_NAME);

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(file_appender)
                .json()
                .try_init()?;
        }
        (None, LogFormat::Json) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .json()
                .try_init()?;
        }
        (None, LogFormat::Pretty) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(true)
                .try_init()?;
        }
    }

    info!("Logging initialized");
    debug!("Log config: {:?}", config);

    Ok(())
}
