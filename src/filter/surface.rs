//! 外部の地図ライブラリとの接点
//!
//! 地図本体（タイル・パン・ズーム操作）は外部の責務。コア側が必要とするのは
//! 現在のズームの取得と、描画レイヤーへの全消去・追加だけ。

use crate::store::{EntryId, Marker};

/// 現在のズームを返す地図
pub trait MapSurface {
    fn zoom(&self) -> f64;
}

/// マーカーを保持する描画レイヤー
pub trait RenderLayer {
    fn clear_layers(&mut self);
    fn add_layer(&mut self, id: EntryId, marker: &Marker);
}

/// ズーム範囲つきのメモリ上の地図
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl MapView {
    pub fn new(initial_zoom: f64, min_zoom: f64, max_zoom: f64) -> Self {
        let mut view = Self {
            zoom: min_zoom,
            min_zoom,
            max_zoom,
        };
        view.set_zoom(initial_zoom);
        view
    }

    /// 範囲外は端に丸める。実際に適用されたズームを返す
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.zoom
    }
}

impl MapSurface for MapView {
    fn zoom(&self) -> f64 {
        self.zoom
    }
}

/// 追加されたマーカーを順に記録するだけのレイヤー
#[derive(Debug, Clone, Default)]
pub struct MemoryLayer {
    markers: Vec<(EntryId, Marker)>,
}

impl MemoryLayer {
    pub fn markers(&self) -> &[(EntryId, Marker)] {
        &self.markers
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.markers.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl RenderLayer for MemoryLayer {
    fn clear_layers(&mut self) {
        self.markers.clear();
    }

    fn add_layer(&mut self, id: EntryId, marker: &Marker) {
        self.markers.push((id, marker.clone()));
    }
}
