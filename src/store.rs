//! 樹木レコードストア
//!
//! ロード時に1度だけ分類・マーカー生成を行い、以降は読み取り専用。
//! 各エントリは詳細マーカー（アイコン）と縮小マーカー（ドット）を持ち、
//! 両者は同じ座標・同じポップアップを共有する。

use campus_trees_common::{classify, DotStyle, IconSpec, PopupContent, RawRecord, TreeCategory};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// ストア内の位置（挿入順）
pub type EntryId = usize;

/// マーカーの見た目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkerStyle {
    Icon(IconSpec),
    Dot(DotStyle),
}

/// 地図に追加できる描画単位
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub popup: Arc<PopupContent>,
    pub style: MarkerStyle,
}

/// どちらの表現を使うか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Detailed,
    Simplified,
}

#[derive(Debug, Clone)]
pub struct TreeEntry {
    category: TreeCategory,
    search_name: String,
    search_botanical_name: String,
    detailed: Marker,
    simplified: Marker,
}

impl TreeEntry {
    /// 生レコードからエントリを作る。座標が不正なら None
    pub fn from_record(record: &RawRecord, default_image: &str) -> Option<Self> {
        let lat = parse_coordinate(record.latitude.as_deref())?;
        let lon = parse_coordinate(record.longitude.as_deref())?;

        let category = classify(record.name());
        let popup = Arc::new(PopupContent::from_record(record, default_image));

        let detailed = Marker {
            lat,
            lon,
            popup: Arc::clone(&popup),
            style: MarkerStyle::Icon(IconSpec::for_category(category)),
        };
        let simplified = Marker {
            lat,
            lon,
            popup,
            style: MarkerStyle::Dot(DotStyle::default()),
        };

        Some(Self {
            category,
            search_name: record.name().to_lowercase(),
            search_botanical_name: record.botanical().to_lowercase(),
            detailed,
            simplified,
        })
    }

    pub fn category(&self) -> TreeCategory {
        self.category
    }

    pub fn search_name(&self) -> &str {
        &self.search_name
    }

    pub fn search_botanical_name(&self) -> &str {
        &self.search_botanical_name
    }

    pub fn popup(&self) -> &PopupContent {
        &self.detailed.popup
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.detailed.lat, self.detailed.lon)
    }

    /// 名前または学名に小文字の検索語が含まれるか（空文字は常に一致）
    pub fn matches_text(&self, needle: &str) -> bool {
        self.search_name.contains(needle) || self.search_botanical_name.contains(needle)
    }

    pub fn marker(&self, representation: Representation) -> &Marker {
        match representation {
            Representation::Detailed => &self.detailed,
            Representation::Simplified => &self.simplified,
        }
    }
}

/// 座標文字列を解析（先頭の数値部分だけを読む。数値で始まらない・非有限は None）
///
/// `"13.0450°"` や `"80.2520E"` は単位・方位を無視して 13.045 / 80.252 になる。
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let value: f64 = leading_number(raw?.trim())?.parse().ok()?;
    value.is_finite().then_some(value)
}

/// 符号・整数部・小数部・指数部からなる最長の先頭部分
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // 指数部は数字が続く場合だけ含める
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// ロード結果の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// 追記専用のエントリ列
#[derive(Debug, Clone)]
pub struct RecordStore {
    entries: Vec<TreeEntry>,
    default_image: String,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(campus_trees_common::DEFAULT_TREE_IMAGE)
    }
}

impl RecordStore {
    pub fn new(default_image: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            default_image: default_image.into(),
        }
    }

    /// 生レコードを入力順に追加する。座標不正の行は黙って捨てる
    pub fn append<I>(&mut self, records: I) -> LoadSummary
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut summary = LoadSummary::default();

        for (row, record) in records.into_iter().enumerate() {
            match TreeEntry::from_record(&record, &self.default_image) {
                Some(entry) => {
                    self.entries.push(entry);
                    summary.loaded += 1;
                }
                None => {
                    tracing::debug!(
                        row,
                        latitude = ?record.latitude,
                        longitude = ?record.longitude,
                        "座標が不正な行をスキップ"
                    );
                    summary.skipped += 1;
                }
            }
        }

        tracing::info!(
            loaded = summary.loaded,
            skipped = summary.skipped,
            total = self.entries.len(),
            "樹木データを読み込み"
        );
        summary
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&TreeEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// カテゴリ別件数（ALL順、0件も含む）
    pub fn category_counts(&self) -> BTreeMap<TreeCategory, usize> {
        let mut counts: BTreeMap<TreeCategory, usize> =
            TreeCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        for entry in &self.entries {
            *counts.entry(entry.category).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: &str, lon: &str, name: &str) -> RawRecord {
        RawRecord {
            latitude: Some(lat.to_string()),
            longitude: Some(lon.to_string()),
            tree_name: Some(name.to_string()),
            botanical_name: Some("Azadirachta indica".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(Some("13.05")), Some(13.05));
        assert_eq!(parse_coordinate(Some(" 80.25 ")), Some(80.25));
        assert_eq!(parse_coordinate(Some("abc")), None);
        assert_eq!(parse_coordinate(Some("")), None);
        assert_eq!(parse_coordinate(Some("NaN")), None);
        assert_eq!(parse_coordinate(Some("inf")), None);
        assert_eq!(parse_coordinate(None), None);
    }

    #[test]
    fn test_parse_coordinate_numeric_prefix() {
        assert_eq!(parse_coordinate(Some("13.0450°")), Some(13.045));
        assert_eq!(parse_coordinate(Some("13.0450N")), Some(13.045));
        assert_eq!(parse_coordinate(Some("80.2520E")), Some(80.252));
        assert_eq!(parse_coordinate(Some("13.05.1")), Some(13.05));
        assert_eq!(parse_coordinate(Some("-.5 deg")), Some(-0.5));
        assert_eq!(parse_coordinate(Some("80.")), Some(80.0));
        assert_eq!(parse_coordinate(Some("1.3e1x")), Some(13.0));
        assert_eq!(parse_coordinate(Some("13e")), Some(13.0));
        assert_eq!(parse_coordinate(Some("N13.05")), None);
        assert_eq!(parse_coordinate(Some("-")), None);
        assert_eq!(parse_coordinate(Some(".")), None);
        assert_eq!(parse_coordinate(Some("Infinity")), None);
        assert_eq!(parse_coordinate(Some("1e999")), None);
    }

    #[test]
    fn test_suffixed_coordinates_are_loaded() {
        let mut store = RecordStore::default();
        let summary = store.append(vec![record("13.0450°", "80.2520E", "Neem")]);

        assert_eq!(summary, LoadSummary { loaded: 1, skipped: 0 });
        assert_eq!(store.entries()[0].coordinates(), (13.045, 80.252));
    }

    #[test]
    fn test_valid_row_produces_one_entry() {
        let mut store = RecordStore::default();
        let summary = store.append(vec![record("13.05", "80.25", "Neem")]);

        assert_eq!(summary, LoadSummary { loaded: 1, skipped: 0 });
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].category(), TreeCategory::Neem);
        assert_eq!(store.entries()[0].coordinates(), (13.05, 80.25));
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let mut store = RecordStore::default();
        let missing = RawRecord {
            longitude: Some("80.25".to_string()),
            ..Default::default()
        };
        let summary = store.append(vec![
            record("abc", "80.25", "Neem"),
            record("", "80.25", "Neem"),
            missing,
        ]);

        assert_eq!(summary, LoadSummary { loaded: 0, skipped: 3 });
        assert!(store.is_empty());
    }

    #[test]
    fn test_insertion_order_and_duplicates_kept() {
        let mut store = RecordStore::default();
        store.append(vec![
            record("13.0450", "80.2520", "Mango"),
            record("13.0451", "80.2521", "Palm"),
            record("13.0450", "80.2520", "Mango"),
        ]);

        let names: Vec<_> = store.entries().iter().map(|e| e.search_name()).collect();
        assert_eq!(names, vec!["mango", "palm", "mango"]);
    }

    #[test]
    fn test_representations_share_popup_and_coordinates() {
        let mut store = RecordStore::default();
        store.append(vec![record("13.0460", "80.2530", "Heritage Banyan")]);
        let entry = &store.entries()[0];

        let detailed = entry.marker(Representation::Detailed);
        let simplified = entry.marker(Representation::Simplified);
        assert!(Arc::ptr_eq(&detailed.popup, &simplified.popup));
        assert_eq!((detailed.lat, detailed.lon), (simplified.lat, simplified.lon));
        assert!(matches!(detailed.style, MarkerStyle::Icon(icon) if icon.url == "heritage.png"));
        assert!(matches!(simplified.style, MarkerStyle::Dot(_)));
    }

    #[test]
    fn test_missing_names_are_empty_and_other() {
        let mut store = RecordStore::default();
        store.append(vec![RawRecord {
            latitude: Some("13.05".to_string()),
            longitude: Some("80.25".to_string()),
            ..Default::default()
        }]);
        let entry = &store.entries()[0];
        assert_eq!(entry.category(), TreeCategory::Other);
        assert_eq!(entry.search_name(), "");
        assert_eq!(entry.popup().image, "default_tree.png");
    }

    #[test]
    fn test_matches_text() {
        let mut store = RecordStore::default();
        store.append(vec![record("13.05", "80.25", "Neem Tree")]);
        let entry = &store.entries()[0];

        assert!(entry.matches_text(""));
        assert!(entry.matches_text("neem"));
        assert!(entry.matches_text("azadirachta"));
        // 大文字は呼び出し側で小文字化される前提
        assert!(!entry.matches_text("Neem"));
        assert!(!entry.matches_text("mango"));
    }

    #[test]
    fn test_category_counts() {
        let mut store = RecordStore::new("placeholder.png");
        store.append(vec![
            record("13.05", "80.25", "Neem"),
            record("13.05", "80.25", "Neem"),
            record("13.05", "80.25", "Coconut"),
        ]);
        let counts = store.category_counts();
        assert_eq!(counts[&TreeCategory::Neem], 2);
        assert_eq!(counts[&TreeCategory::Coconut], 1);
        assert_eq!(counts[&TreeCategory::Palm], 0);
        assert_eq!(counts.len(), TreeCategory::ALL.len());
    }
}
