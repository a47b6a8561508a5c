//! # Geometry Collection Entity
//!
//! KMLから読み込んだジオメトリの集合と、ポリゴンのみに絞り込んだレイヤー

use std::fmt;

use geo_types::{Geometry, MultiPolygon, Polygon};

/// WGS84 (EPSG:4326) の ESRI WKT 表現（`.prj` ファイルの内容）
pub const WGS84_ESRI_WKT: &str = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]";

/// 座標参照系
///
/// パイプライン全体で不変。KMLは常にWGS84なので通常は `Crs::wgs84()`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// EPSGコードからCRSを作成
    pub fn epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::epsg(4326)
    }

    /// EPSGコード
    pub fn code(&self) -> u32 {
        self.epsg
    }

    /// 経緯度（WGS84）かどうか
    pub fn is_wgs84(&self) -> bool {
        self.epsg == 4326
    }

    /// `.prj` に書き出す ESRI WKT を返す
    ///
    /// 未対応のCRSの場合は `None`
    pub fn esri_wkt(&self) -> Option<&'static str> {
        match self.epsg {
            4326 => Some(WGS84_ESRI_WKT),
            _ => None,
        }
    }

    /// `.prj` の WKT からCRSを判別する
    ///
    /// ```
    /// use kml2shp::domain::entities::geometry_collection::{Crs, WGS84_ESRI_WKT};
    ///
    /// assert_eq!(Crs::from_esri_wkt(WGS84_ESRI_WKT), Some(Crs::wgs84()));
    /// assert_eq!(Crs::from_esri_wkt("PROJCS[\"unknown\"]"), None);
    /// ```
    pub fn from_esri_wkt(wkt: &str) -> Option<Self> {
        let wkt = wkt.trim_start();
        if wkt.starts_with("GEOGCS[\"GCS_WGS_1984\"") || wkt.starts_with("GEOGCS[\"WGS 84\"") {
            Some(Self::wgs84())
        } else {
            None
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// フィーチャ
///
/// `id` は入力中の出現順（1始まり）。`name` / `description` はPlacemarkの属性。
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: usize,
    pub geometry: Geometry<f64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Feature {
    pub fn new(id: usize, geometry: Geometry<f64>) -> Self {
        Self {
            id,
            geometry,
            name: None,
            description: None,
        }
    }

    /// 名前と説明を設定する
    pub fn with_attributes(mut self, name: Option<String>, description: Option<String>) -> Self {
        self.name = name;
        self.description = description;
        self
    }

    /// ジオメトリ種別名（ログ出力用）
    pub fn kind_name(&self) -> &'static str {
        match &self.geometry {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
            Geometry::Rect(_) => "Rect",
            Geometry::Triangle(_) => "Triangle",
        }
    }
}

/// ジオメトリコレクション
///
/// 全フィーチャが1つのCRSを共有する
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection {
    features: Vec<Feature>,
    crs: Crs,
}

impl GeometryCollection {
    pub fn new(features: Vec<Feature>, crs: Crs) -> Self {
        Self { features, crs }
    }

    /// ジオメトリの列から、出現順にIDを振ってコレクションを作成
    pub fn from_geometries(geometries: Vec<Geometry<f64>>, crs: Crs) -> Self {
        let features = geometries
            .into_iter()
            .enumerate()
            .map(|(index, geometry)| Feature::new(index + 1, geometry))
            .collect();
        Self::new(features, crs)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// ポリゴン系ジオメトリ
///
/// フィルタ後に許されるジオメトリ種別の閉じた集合
#[derive(Debug, Clone, PartialEq)]
pub enum Polygonal {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Polygonal {
    /// 任意のジオメトリからポリゴン系だけを取り出す
    pub fn from_geometry(geometry: Geometry<f64>) -> Option<Self> {
        match geometry {
            Geometry::Polygon(polygon) => Some(Polygonal::Polygon(polygon)),
            Geometry::MultiPolygon(multi) => Some(Polygonal::MultiPolygon(multi)),
            _ => None,
        }
    }

    /// 構成ポリゴンへの参照
    pub fn polygons(&self) -> Vec<&Polygon<f64>> {
        match self {
            Polygonal::Polygon(polygon) => vec![polygon],
            Polygonal::MultiPolygon(multi) => multi.0.iter().collect(),
        }
    }

    /// 全リング（外周・内周）の全頂点を `(x, y)` で列挙
    pub fn vertices(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.polygons().into_iter().flat_map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors().iter())
                .flat_map(|ring| ring.0.iter().map(|c| (c.x, c.y)))
        })
    }

    pub fn into_geometry(self) -> Geometry<f64> {
        match self {
            Polygonal::Polygon(polygon) => Geometry::Polygon(polygon),
            Polygonal::MultiPolygon(multi) => Geometry::MultiPolygon(multi),
        }
    }
}

/// ポリゴンフィーチャ
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub id: usize,
    pub shape: Polygonal,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PolygonFeature {
    pub fn new(id: usize, shape: Polygonal) -> Self {
        Self {
            id,
            shape,
            name: None,
            description: None,
        }
    }

    /// 元のフィーチャから属性を引き継いでポリゴンフィーチャを作る
    ///
    /// ポリゴン系でなければ `None`
    pub fn from_feature(feature: Feature) -> Option<Self> {
        let shape = Polygonal::from_geometry(feature.geometry)?;
        Some(Self {
            id: feature.id,
            shape,
            name: feature.name,
            description: feature.description,
        })
    }
}

/// ポリゴンレイヤー
///
/// ポリゴン / マルチポリゴンのみを含むことが型で保証されたコレクション
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLayer {
    features: Vec<PolygonFeature>,
    crs: Crs,
}

impl PolygonLayer {
    pub fn new(features: Vec<PolygonFeature>, crs: Crs) -> Self {
        Self { features, crs }
    }

    pub fn features(&self) -> &[PolygonFeature] {
        &self.features
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// 全頂点のバウンディングボックス `(min_x, min_y, max_x, max_y)`
    ///
    /// 頂点が1つもない場合は `None`
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.features
            .iter()
            .flat_map(|feature| feature.shape.vertices())
            .fold(None, |acc, (x, y)| match acc {
                None => Some((x, y, x, y)),
                Some((min_x, min_y, max_x, max_y)) => {
                    Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)))
                }
            })
    }
}
