//! # UploadedFile Entity
//!
//! アップロードされたファイル（1回の変換リクエストだけが所有する）

/// 受け付けるアップロードの拡張子
pub const ACCEPTED_EXTENSION: &str = "kml";

/// アップロードファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    /// 新しいアップロードファイルを作成
    ///
    /// # Arguments
    ///
    /// * `file_name` - 元のファイル名
    /// * `bytes` - ファイル内容
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 宣言された拡張子が `kml` かどうか（大文字小文字は区別しない）
    pub fn has_accepted_extension(&self) -> bool {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(ACCEPTED_EXTENSION))
            .unwrap_or(false)
    }
}
