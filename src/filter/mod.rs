//! 表示フィルタ
//!
//! 検索文字列・カテゴリ選択・地図のズームから表示対象を決め、
//! 描画レイヤーをその集合に一致させる。差分は取らず、毎回全消去してから
//! ストア順に追加し直す（何度呼んでも同じ結果になる）。

mod surface;

pub use surface::{MapSurface, MapView, MemoryLayer, RenderLayer};

use crate::store::{EntryId, LoadSummary, RecordStore, Representation};
use campus_trees_common::{CategoryFilter, RawRecord};

/// 参照ズームでの切替閾値（これ以下はドット表示）
pub const DEFAULT_ZOOM_THRESHOLD: f64 = 18.0;

/// ユーザー入力で変わる絞り込み条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_text: String,
    selected_category: CategoryFilter,
}

impl FilterState {
    /// 小文字化済みの検索文字列
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected_category(&self) -> CategoryFilter {
        self.selected_category
    }
}

pub struct ViewFilter<M, L> {
    store: RecordStore,
    state: FilterState,
    zoom_threshold: f64,
    map: M,
    layer: L,
    visible: Vec<(EntryId, Representation)>,
}

impl<M: MapSurface, L: RenderLayer> ViewFilter<M, L> {
    pub fn new(store: RecordStore, map: M, layer: L) -> Self {
        Self {
            store,
            state: FilterState::default(),
            zoom_threshold: DEFAULT_ZOOM_THRESHOLD,
            map,
            layer,
            visible: Vec::new(),
        }
    }

    pub fn with_zoom_threshold(mut self, zoom_threshold: f64) -> Self {
        self.zoom_threshold = zoom_threshold;
        self
    }

    /// レコードを読み込み、最後に1回だけ再計算する
    pub fn load<I>(&mut self, records: I) -> LoadSummary
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let summary = self.store.append(records);
        self.refresh();
        summary
    }

    /// ズームに応じた表現（閾値ちょうどはドット側）
    pub fn representation_for(&self, zoom: f64) -> Representation {
        if zoom <= self.zoom_threshold {
            Representation::Simplified
        } else {
            Representation::Detailed
        }
    }

    /// 表示対象を再計算してレイヤーに反映する
    pub fn refresh(&mut self) {
        self.layer.clear_layers();
        self.visible.clear();

        let representation = self.representation_for(self.map.zoom());
        let needle = self.state.search_text.as_str();
        let selected = self.state.selected_category;

        for (id, entry) in self.store.entries().iter().enumerate() {
            if entry.matches_text(needle) && selected.matches(entry.category()) {
                self.layer.add_layer(id, entry.marker(representation));
                self.visible.push((id, representation));
            }
        }

        tracing::trace!(
            visible = self.visible.len(),
            total = self.store.len(),
            search = needle,
            category = %selected,
            ?representation,
            "表示を更新"
        );
    }

    /// 検索文字列を設定して再計算（小文字化して保持）
    pub fn set_search_text(&mut self, text: &str) {
        self.state.search_text = text.to_lowercase();
        self.refresh();
    }

    /// カテゴリ選択を設定して再計算
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.state.selected_category = category;
        self.refresh();
    }

    /// 地図のズーム変更通知
    pub fn zoom_changed(&mut self) {
        self.refresh();
    }

    /// 直前の再計算で表示された (ID, 表現) の一覧
    pub fn visible(&self) -> &[(EntryId, Representation)] {
        &self.visible
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn zoom_threshold(&self) -> f64 {
        self.zoom_threshold
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// 地図を操作した後は zoom_changed() を呼ぶこと
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_trees_common::TreeCategory;

    fn raw(name: &str, botanical: &str) -> RawRecord {
        RawRecord {
            latitude: Some("13.0460".to_string()),
            longitude: Some("80.2535".to_string()),
            tree_name: Some(name.to_string()),
            botanical_name: Some(botanical.to_string()),
            ..Default::default()
        }
    }

    fn loaded_filter(zoom: f64) -> ViewFilter<MapView, MemoryLayer> {
        let mut filter = ViewFilter::new(
            RecordStore::default(),
            MapView::new(zoom, 18.0, 23.0),
            MemoryLayer::default(),
        );
        filter.load(vec![
            raw("Neem", "Azadirachta indica"),
            raw("Royal Palm", "Roystonea regia"),
            raw("Coconut", "Cocos nucifera"),
            raw("Mango", "Mangifera indica"),
            raw("Heritage Tamarind", "Tamarindus indica"),
        ]);
        filter
    }

    #[test]
    fn test_load_triggers_refresh() {
        let filter = loaded_filter(18.0);
        assert_eq!(filter.layer().len(), 5);
        assert_eq!(filter.visible().len(), 5);
    }

    #[test]
    fn test_empty_search_matches_all() {
        let mut filter = loaded_filter(18.0);
        filter.set_search_text("");
        filter.set_category(CategoryFilter::All);
        assert_eq!(filter.layer().ids(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_search_name_or_botanical() {
        let mut filter = loaded_filter(18.0);

        filter.set_search_text("INDICA");
        assert_eq!(filter.state().search_text(), "indica");
        assert_eq!(filter.layer().ids(), vec![0, 3, 4]);

        filter.set_search_text("palm");
        assert_eq!(filter.layer().ids(), vec![1]);

        filter.set_search_text("banyan");
        assert!(filter.layer().is_empty());
    }

    #[test]
    fn test_search_is_not_trimmed() {
        let mut filter = loaded_filter(18.0);
        filter.set_search_text(" neem");
        assert!(filter.layer().is_empty());
    }

    #[test]
    fn test_category_filter_exclusive() {
        let mut filter = loaded_filter(18.0);
        filter.set_category(CategoryFilter::Only(TreeCategory::Palm));

        assert_eq!(filter.layer().ids(), vec![1]);
        for (id, _) in filter.visible() {
            let entry = filter.store().get(*id).unwrap();
            assert_eq!(entry.category(), TreeCategory::Palm);
        }
    }

    #[test]
    fn test_text_and_category_combined() {
        let mut filter = loaded_filter(18.0);
        filter.set_category(CategoryFilter::Only(TreeCategory::Tamarind));
        filter.set_search_text("indica");
        assert_eq!(filter.layer().ids(), vec![4]);

        filter.set_search_text("mango");
        assert!(filter.layer().is_empty());
    }

    #[test]
    fn test_zoom_boundary() {
        let mut filter = loaded_filter(18.0);
        assert!(filter
            .visible()
            .iter()
            .all(|(_, r)| *r == Representation::Simplified));

        filter.map_mut().set_zoom(19.0);
        filter.zoom_changed();
        assert!(filter
            .visible()
            .iter()
            .all(|(_, r)| *r == Representation::Detailed));
        let (_, marker) = &filter.layer().markers()[0];
        assert!(matches!(marker.style, crate::store::MarkerStyle::Icon(_)));
    }

    #[test]
    fn test_configured_threshold() {
        let mut filter = ViewFilter::new(
            RecordStore::default(),
            MapView::new(20.0, 18.0, 23.0),
            MemoryLayer::default(),
        )
        .with_zoom_threshold(20.0);
        filter.load(vec![raw("Neem", "")]);

        assert_eq!(filter.representation_for(20.0), Representation::Simplified);
        assert_eq!(filter.representation_for(20.5), Representation::Detailed);
        assert_eq!(filter.visible(), &[(0, Representation::Simplified)]);
    }

    #[test]
    fn test_refresh_idempotent() {
        let mut filter = loaded_filter(19.0);
        filter.set_search_text("a");

        filter.refresh();
        let first = filter.layer().markers().to_vec();
        filter.refresh();
        assert_eq!(filter.layer().markers(), first.as_slice());
    }

    #[test]
    fn test_only_one_representation_per_entry() {
        let mut filter = loaded_filter(18.0);
        filter.map_mut().set_zoom(21.0);
        filter.zoom_changed();
        filter.map_mut().set_zoom(18.0);
        filter.zoom_changed();

        let mut ids = filter.layer().ids();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), filter.layer().len());
    }
}
