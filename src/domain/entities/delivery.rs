//! # Delivery Entities
//!
//! 変換結果をユーザーに届けるための表示内容（ステータス、ダウンロード、プレビュー）

use std::fmt;

use super::preview_figure::PreviewFigure;
use super::shapefile_archive::ShapefileArchive;

/// 画面タイトル
pub const APP_TITLE: &str = "KML to Shapefile Converter";

/// ダウンロードボタンのラベル
pub const DOWNLOAD_LABEL: &str = "Download Zipped Shapefile";

/// ダウンロードファイル名
pub const DOWNLOAD_FILE_NAME: &str = "shapefile.zip";

/// ダウンロードのMIMEタイプ
pub const DOWNLOAD_MIME: &str = "application/zip";

/// ステータスメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text)
            | StatusMessage::Success(text)
            | StatusMessage::Warning(text)
            | StatusMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Info(text) => write!(f, "ℹ {}", text),
            StatusMessage::Success(text) => write!(f, "✓ {}", text),
            StatusMessage::Warning(text) => write!(f, "⚠ {}", text),
            StatusMessage::Error(text) => write!(f, "✗ {}", text),
        }
    }
}

/// ダウンロード可能な成果物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub label: String,
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl DownloadArtifact {
    /// ZIPアーカイブからダウンロード成果物を作成
    pub fn from_archive(archive: ShapefileArchive) -> Self {
        Self {
            label: DOWNLOAD_LABEL.to_string(),
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            mime: DOWNLOAD_MIME.to_string(),
            data: archive.into_bytes(),
        }
    }
}

/// 1回の対話（アップロード → 変換 → ダウンロード）の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionReport {
    pub messages: Vec<StatusMessage>,
    pub preview: Option<PreviewFigure>,
    pub download: Option<DownloadArtifact>,
    /// 読み込んだフィーチャ数
    pub features_read: usize,
    /// ポリゴンとして残ったフィーチャ数
    pub features_kept: usize,
}

impl InteractionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: StatusMessage) {
        self.messages.push(message);
    }

    /// エラーメッセージを含むか
    pub fn has_error(&self) -> bool {
        self.messages.iter().any(StatusMessage::is_error)
    }

    pub fn title(&self) -> &'static str {
        APP_TITLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_display() {
        assert_eq!(
            StatusMessage::Success("done".to_string()).to_string(),
            "✓ done"
        );
        assert_eq!(StatusMessage::Warning("empty".to_string()).to_string(), "⚠ empty");
        assert_eq!(StatusMessage::Error("bad".to_string()).text(), "bad");
    }

    #[test]
    fn test_download_from_archive() {
        let archive = ShapefileArchive::new(vec![1, 2, 3], vec![]);
        let download = DownloadArtifact::from_archive(archive);

        assert_eq!(download.file_name, "shapefile.zip");
        assert_eq!(download.mime, "application/zip");
        assert_eq!(download.label, "Download Zipped Shapefile");
        assert_eq!(download.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_report_has_error() {
        let mut report = InteractionReport::new();
        report.push(StatusMessage::Warning("no features".to_string()));
        assert!(!report.has_error());

        report.push(StatusMessage::Error("boom".to_string()));
        assert!(report.has_error());
    }
}
