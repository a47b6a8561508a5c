//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **IngestKmlUseCase**: アップロードの一時ファイル化と読み込み
//! - **RenderPreviewUseCase**: ベースマップ付きプレビューの描画
//! - **ExportShapefileUseCase**: Shapefileの書き出しとZIP化
//! - **ConvertUploadUseCase**: 1回の変換全体（結果の組み立てまで）

pub mod convert_upload;
pub mod export_shapefile;
pub mod ingest_kml;
pub mod render_preview;
