//! # ConversionContext
//!
//! 1回の変換リクエストに閉じたコンテキスト。グローバル状態は持たない。

use chrono::{DateTime, Utc};

use super::uploaded_file::UploadedFile;

/// 変換コンテキスト
#[derive(Debug, Clone)]
pub struct ConversionContext {
    /// リクエストID（ログの相関用）
    pub request_id: String,
    pub started_at: DateTime<Utc>,
    /// アップロードされたファイル（未アップロードなら `None`）
    pub upload: Option<UploadedFile>,
}

impl ConversionContext {
    /// 新しいコンテキストを作成
    pub fn new(upload: Option<UploadedFile>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            upload,
        }
    }

    /// 開始からの経過ミリ秒
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}
