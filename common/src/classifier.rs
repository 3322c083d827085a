//! 樹木名からの表示カテゴリ判定
//!
//! 小文字化した名前に対して部分一致ルールを上から順に評価し、
//! 最初に一致したルールのカテゴリを返す。ルールは排他的ではないため
//! 並び順が判定結果を決める（例: "heritage tamarind" は tamarind）。

use crate::types::TreeCategory;

/// (キーワード群, カテゴリ) の評価順リスト
const RULES: &[(&[&str], TreeCategory)] = &[
    (&["coconut", "thennai"], TreeCategory::Coconut),
    (&["palm"], TreeCategory::Palm),
    (&["neem"], TreeCategory::Neem),
    (&["mango", "jack", "guava", "cow tamarind", "cashew"], TreeCategory::Fruit),
    (&["ashoka", "polyalthia", "christmas"], TreeCategory::Avenue),
    (&["gulmohar", "jacaranda", "peepal"], TreeCategory::Flower),
    (&["tamarind"], TreeCategory::Tamarind),
    (&["heritage"], TreeCategory::Heritage),
];

/// 樹木名を分類する（空文字・未知の名前は Other）
pub fn classify(raw_name: &str) -> TreeCategory {
    let name = raw_name.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(TreeCategory::Other)
}
