//! # Domain Services
//!
//! エンティティに属さないビジネスルール
//!
//! - **polygon_filter**: ポリゴン系フィーチャの抽出
//! - **web_mercator**: プレビュー用の投影とタイル計画

pub mod polygon_filter;
pub mod web_mercator;
