use super::error_response::{method_not_allowed, plain_text};
use axum::{
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// コントロールパネル (`index.html`) をディスクから配信する
///
/// リクエストごとに読み込むので、起動後にファイルを差し替えても反映される。
#[derive(Debug, Clone)]
pub struct StaticAssets {
    index_path: PathBuf,
}

impl StaticAssets {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// API 以外のリクエストに対する応答
    pub async fn serve(&self, method: &Method) -> Response {
        if method != Method::GET {
            return method_not_allowed().await;
        }

        match tokio::fs::read(&self.index_path).await {
            Ok(content) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html")],
                content,
            )
                .into_response(),
            Err(e) => {
                debug!(path = %self.index_path.display(), error = %e, "Control panel not found");
                plain_text(StatusCode::NOT_FOUND, "404 Not Found")
            }
        }
    }
}
