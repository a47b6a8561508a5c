//! # Web Mercator Viewport
//!
//! 経緯度からWeb Mercatorのピクセル座標への変換と、
//! プレビュー画像に必要なタイルの計画を行う

use std::f64::consts::PI;

/// タイル1枚の一辺（ピクセル）
pub const TILE_SIZE: u32 = 256;

/// Web Mercator の有効緯度範囲
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// 一般的なタイルサーバーが提供する最大ズーム
pub const MAX_ZOOM: u8 = 19;

/// バウンディングボックスの周囲に残す余白の割合
const FIT_PADDING: f64 = 0.1;

/// XYZタイル座標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X (east-west), 0 at west
    pub x: u32,
    /// Y (north-south), 0 at north
    pub y: u32,
    pub zoom: u8,
}

/// 画像上の配置付きタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    pub coord: TileCoord,
    /// 画像左上からのオフセット（ピクセル、負になり得る）
    pub offset_x: i64,
    pub offset_y: i64,
}

/// 指定ズームでのワールドピクセル座標に変換する
///
/// 緯度はWeb Mercatorの有効範囲にクランプされる
#[inline]
pub fn to_world_pixel(lon: f64, lat: f64, zoom: u8) -> (f64, f64) {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let world = world_size(zoom);

    let x = (lon + 180.0) / 360.0 * world;
    let lat_rad = lat * PI / 180.0;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * world;

    (x, y)
}

/// 経緯度を含むタイルを返す
pub fn tile_for(lon: f64, lat: f64, zoom: u8) -> TileCoord {
    let (x, y) = to_world_pixel(lon, lat, zoom);
    let max_index = (1u64 << zoom) - 1;
    let clamp = |v: f64| ((v / TILE_SIZE as f64).floor().max(0.0) as u64).min(max_index) as u32;

    TileCoord {
        x: clamp(x),
        y: clamp(y),
        zoom,
    }
}

#[inline]
fn world_size(zoom: u8) -> f64 {
    TILE_SIZE as f64 * 2.0_f64.powi(zoom as i32)
}

/// プレビュー画像の表示範囲
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: u8,
    /// 画像左上のワールドピクセル座標
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// バウンディングボックスが画像に収まる最大のズームで表示範囲を決める
    ///
    /// # Arguments
    ///
    /// * `bounds` - `(min_lon, min_lat, max_lon, max_lat)`
    /// * `width` / `height` - 画像サイズ（ピクセル）
    /// * `max_zoom` - 使用する最大ズーム
    pub fn fit(bounds: (f64, f64, f64, f64), width: u32, height: u32, max_zoom: u8) -> Self {
        let (min_lon, min_lat, max_lon, max_lat) = bounds;
        let usable_w = width as f64 * (1.0 - FIT_PADDING);
        let usable_h = height as f64 * (1.0 - FIT_PADDING);

        let zoom = (0..=max_zoom.min(MAX_ZOOM))
            .rev()
            .find(|&zoom| {
                let (x0, y1) = to_world_pixel(min_lon, min_lat, zoom);
                let (x1, y0) = to_world_pixel(max_lon, max_lat, zoom);
                (x1 - x0) <= usable_w && (y1 - y0) <= usable_h
            })
            .unwrap_or(0);

        let (x0, y1) = to_world_pixel(min_lon, min_lat, zoom);
        let (x1, y0) = to_world_pixel(max_lon, max_lat, zoom);
        let center_x = (x0 + x1) / 2.0;
        let center_y = (y0 + y1) / 2.0;

        Self {
            zoom,
            origin_x: (center_x - width as f64 / 2.0).floor(),
            origin_y: (center_y - height as f64 / 2.0).floor(),
            width,
            height,
        }
    }

    /// 経緯度を画像上のピクセル座標に変換する
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = to_world_pixel(lon, lat, self.zoom);
        (x - self.origin_x, y - self.origin_y)
    }

    /// 画像を覆うのに必要なタイルを列挙する
    ///
    /// X方向は日付変更線で折り返し、Y方向の範囲外は除外する
    pub fn tiles(&self) -> Vec<PlacedTile> {
        let size = TILE_SIZE as f64;
        let n = 1i64 << self.zoom;

        let first_x = (self.origin_x / size).floor() as i64;
        let last_x = ((self.origin_x + self.width as f64 - 1.0) / size).floor() as i64;
        let first_y = (self.origin_y / size).floor() as i64;
        let last_y = ((self.origin_y + self.height as f64 - 1.0) / size).floor() as i64;

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            if ty < 0 || ty >= n {
                continue;
            }
            for tx in first_x..=last_x {
                tiles.push(PlacedTile {
                    coord: TileCoord {
                        x: tx.rem_euclid(n) as u32,
                        y: ty as u32,
                        zoom: self.zoom,
                    },
                    offset_x: (tx as f64 * size - self.origin_x).round() as i64,
                    offset_y: (ty as f64 * size - self.origin_y).round() as i64,
                });
            }
        }
        tiles
    }
}
