//! # Shapefile Bundle / Archive
//!
//! Shapefileバンドルの命名規則と、それをZIP化したアーカイブ

/// 出力レイヤーのベース名
pub const LAYER_BASE_NAME: &str = "converted_shapefile";

/// バンドルを構成するファイルの拡張子（ジオメトリ、属性、インデックス、投影法）
pub const COMPONENT_EXTENSIONS: [&str; 4] = ["shp", "dbf", "shx", "prj"];

/// バンドルの構成ファイル名を返す
///
/// ```
/// use kml2shp::domain::entities::shapefile_archive::component_file_names;
///
/// let names = component_file_names("converted_shapefile");
/// assert_eq!(names[0], "converted_shapefile.shp");
/// assert_eq!(names.len(), 4);
/// ```
pub fn component_file_names(base_name: &str) -> Vec<String> {
    COMPONENT_EXTENSIONS
        .iter()
        .map(|ext| format!("{}.{}", base_name, ext))
        .collect()
}

/// メモリ上のZIPアーカイブ
///
/// 変換成功ごとに1度だけ作られ、呼び出し元に返された時点で所有権が移る
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapefileArchive {
    bytes: Vec<u8>,
    entries: Vec<String>,
}

impl ShapefileArchive {
    pub fn new(bytes: Vec<u8>, entries: Vec<String>) -> Self {
        Self { bytes, entries }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// アーカイブ内のエントリ名（ディレクトリを含まないファイル名）
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 全構成ファイルが揃っているか
    pub fn is_complete(&self, base_name: &str) -> bool {
        component_file_names(base_name)
            .iter()
            .all(|name| self.entries.contains(name))
    }
}
