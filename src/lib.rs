//! # kml2shp
//!
//! KMLファイルのポリゴンをESRI Shapefileに変換し、ZIPにまとめて渡すツール
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: ジオメトリ、CRS、Web Mercatorの計算（外部I/Oなし）
//! - **Application層**: 読み込み → フィルタ → プレビュー → 書き出しのユースケース
//! - **Adapter層**: KML / Shapefile / ZIP / タイルサーバー / 画像描画との統合
//! - **Driver層**: CLI、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時に外部サービス依存コードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
