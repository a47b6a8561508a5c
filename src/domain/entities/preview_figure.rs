//! # PreviewFigure Value Object
//!
//! ベースマップ上にポリゴンを重ねたプレビュー画像

/// プレビュー画像
///
/// 対話中の表示のためだけに存在し、永続化されない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFigure {
    /// PNGエンコード済みの画像
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// 使用したタイルのズームレベル
    pub zoom: u8,
    /// 合成したタイル数
    pub tile_count: usize,
}

impl PreviewFigure {
    /// プレビューのファイル名
    pub const FILE_NAME: &'static str = "preview.png";
}
