//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **UploadedFile**: アップロードされたKMLファイル
//! - **GeometryCollection / PolygonLayer**: ジオメトリの集合とポリゴンのみのレイヤー
//! - **PreviewFigure**: ベースマップ付きプレビュー画像
//! - **ShapefileArchive**: ShapefileバンドルのZIPアーカイブ
//! - **InteractionReport**: ユーザーに返す表示内容
//! - **ConversionContext**: リクエスト単位のコンテキスト

pub mod conversion_context;
pub mod delivery;
pub mod geometry_collection;
pub mod preview_figure;
pub mod shapefile_archive;
pub mod uploaded_file;
