//! # Domain Layer
//!
//! このモジュールは変換処理の核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - フレームワークに依存しない
//! - ファイル形式やタイルサーバーについて何も知らない（traitのみ）
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（GeometryCollection, PolygonLayerなど）
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（ビジネスルール）
//! - **error**: 変換エラー

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
