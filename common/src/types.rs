//! 樹木データの型定義
//!
//! 地図フロントエンドとCLIで共有される型:
//! - RawRecord: インベントリ表の1行（未検証）
//! - TreeCategory / CategoryFilter: 表示カテゴリとその選択状態
//! - PopupContent: マーカーに結び付けるポップアップの中身

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 画像列が空のときに使う既定画像
pub const DEFAULT_TREE_IMAGE: &str = "default_tree.png";

/// 樹木の表示カテゴリ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeCategory {
    Coconut,
    Palm,
    Neem,
    Fruit,
    Avenue,
    Flower,
    Tamarind,
    Heritage,
    #[default]
    Other,
}

impl TreeCategory {
    /// 全カテゴリ（分類ルールの評価順）
    pub const ALL: [TreeCategory; 9] = [
        TreeCategory::Coconut,
        TreeCategory::Palm,
        TreeCategory::Neem,
        TreeCategory::Fruit,
        TreeCategory::Avenue,
        TreeCategory::Flower,
        TreeCategory::Tamarind,
        TreeCategory::Heritage,
        TreeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeCategory::Coconut => "coconut",
            TreeCategory::Palm => "palm",
            TreeCategory::Neem => "neem",
            TreeCategory::Fruit => "fruit",
            TreeCategory::Avenue => "avenue",
            TreeCategory::Flower => "flower",
            TreeCategory::Tamarind => "tamarind",
            TreeCategory::Heritage => "heritage",
            TreeCategory::Other => "other",
        }
    }
}

impl fmt::Display for TreeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TreeCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        TreeCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// カテゴリ選択（"all" または単一カテゴリ）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TreeCategory),
}

impl CategoryFilter {
    pub fn matches(&self, category: TreeCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.pad("all"),
            CategoryFilter::Only(category) => f.pad(category.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl From<TreeCategory> for CategoryFilter {
    fn from(category: TreeCategory) -> Self {
        CategoryFilter::Only(category)
    }
}

/// インベントリ表の1行
///
/// 列はすべて任意。座標の検証はロード時に行う。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(rename = "Latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<String>,
    #[serde(rename = "TreeName")]
    pub tree_name: Option<String>,
    #[serde(rename = "BotanicalName")]
    pub botanical_name: Option<String>,
    #[serde(rename = "Image")]
    pub image: Option<String>,
    #[serde(rename = "Link")]
    pub link: Option<String>,
}

impl RawRecord {
    /// 表示名（欠損時は空文字）
    pub fn name(&self) -> &str {
        self.tree_name.as_deref().unwrap_or_default()
    }

    /// 学名（欠損時は空文字）
    pub fn botanical(&self) -> &str {
        self.botanical_name.as_deref().unwrap_or_default()
    }
}

/// ポップアップの表示内容
///
/// 詳細マーカーとドットの両方が同じ値を共有する。HTML化は地図側の責務。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupContent {
    pub name: String,
    pub botanical_name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl PopupContent {
    pub fn from_record(record: &RawRecord, default_image: &str) -> Self {
        // 欠損または空文字のときだけ既定値（空白のみの値はそのまま）
        let image = match record.image.as_deref() {
            Some(img) if !img.is_empty() => img.to_string(),
            _ => default_image.to_string(),
        };
        let link = record
            .link
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Self {
            name: record.name().to_string(),
            botanical_name: record.botanical().to_string(),
            image,
            link,
        }
    }
}
