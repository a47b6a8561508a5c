//! # Conversion Errors
//!
//! 変換パイプラインの各ステージで発生するエラー

use thiserror::Error;

/// 変換エラー
///
/// Ingest / Preview / Export の各ステージで発生したエラーを表す。
/// どのバリアントも元の原因メッセージを保持し、ユーザーにそのまま提示される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// KMLとして読み込めない（不正なXML、`<kml>` ルートなし等）
    #[error("failed to read KML: {0}")]
    Parse(String),

    /// ベースマップタイルの取得に失敗
    #[error("failed to fetch basemap tiles: {0}")]
    Network(String),

    /// プレビュー画像の描画に失敗（タイルのデコード、未対応のCRS等）
    #[error("failed to render preview: {0}")]
    Preview(String),

    /// Shapefileの書き出しまたはZIP化に失敗
    #[error("failed to export shapefile: {0}")]
    Export(String),
}

impl ConversionError {
    /// エラー種別の短い名前を返す
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::Parse(_) => "ParseError",
            ConversionError::Network(_) => "NetworkError",
            ConversionError::Preview(_) => "PreviewError",
            ConversionError::Export(_) => "ExportError",
        }
    }

    /// プレビュー段階で発生したエラーかどうか
    pub fn is_preview_failure(&self) -> bool {
        matches!(
            self,
            ConversionError::Network(_) | ConversionError::Preview(_)
        )
    }
}

/// エラーチェーン全体（原因を含む）を1行の文字列にする
pub fn error_chain_to_string(e: &anyhow::Error) -> String {
    let mut messages = Vec::new();
    for cause in e.chain() {
        messages.push(cause.to_string());
    }
    messages.join(" | ")
}
