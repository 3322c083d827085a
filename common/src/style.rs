//! マーカーの見た目定義
//!
//! 詳細表示用のカテゴリ別アイコンと、縮小表示用のドットスタイル。

use crate::types::TreeCategory;
use serde::{Deserialize, Serialize};

/// アイコンマーカーの定義（ピクセル単位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSpec {
    pub url: &'static str,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl IconSpec {
    const fn standard(url: &'static str) -> Self {
        Self {
            url,
            size: [32, 32],
            anchor: [16, 32],
            popup_anchor: [0, -32],
        }
    }

    /// カテゴリに対応するアイコン
    pub fn for_category(category: TreeCategory) -> Self {
        match category {
            TreeCategory::Coconut => Self::standard("coconut.png"),
            TreeCategory::Palm => Self::standard("palm.png"),
            TreeCategory::Neem => Self::standard("neem.png"),
            TreeCategory::Fruit => Self::standard("fruit.png"),
            TreeCategory::Avenue => Self::standard("tall.png"),
            TreeCategory::Flower => Self::standard("flower.png"),
            TreeCategory::Tamarind => Self::standard("tamarind.png"),
            // 記念樹は大きいピン
            TreeCategory::Heritage => Self {
                url: "heritage.png",
                size: [42, 65],
                anchor: [21, 65],
                popup_anchor: [0, -65],
            },
            TreeCategory::Other => Self::standard("treee.png"),
        }
    }
}

/// ドットマーカーのスタイル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotStyle {
    pub radius: u32,
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f32,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            radius: 3,
            color: "#0a7d00".into(),
            fill_color: "#4caf50".into(),
            fill_opacity: 0.9,
        }
    }
}
