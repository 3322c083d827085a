pub mod geojson;

use crate::error::Result;
use crate::filter::{MapSurface, RenderLayer, ViewFilter};
use crate::store::{EntryId, Representation};
use campus_trees_common::{PopupContent, TreeCategory};
use serde::Serialize;
use std::path::Path;

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
    GeoJson,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "geojson" | "geo" => Ok(ExportFormat::GeoJson),
            _ => Err(format!("Unknown format: {}. Use text, json, or geojson", s)),
        }
    }
}

/// 表示中の1本
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleTree<'a> {
    pub id: EntryId,
    pub category: TreeCategory,
    pub representation: Representation,
    pub lat: f64,
    pub lon: f64,
    pub popup: &'a PopupContent,
}

/// 直前の再計算で表示された樹木をストア順に集める
pub fn visible_trees<M, L>(filter: &ViewFilter<M, L>) -> Vec<VisibleTree<'_>>
where
    M: MapSurface,
    L: RenderLayer,
{
    filter
        .visible()
        .iter()
        .filter_map(|&(id, representation)| {
            let entry = filter.store().get(id)?;
            let (lat, lon) = entry.coordinates();
            Some(VisibleTree {
                id,
                category: entry.category(),
                representation,
                lat,
                lon,
                popup: entry.popup(),
            })
        })
        .collect()
}

pub fn render(trees: &[VisibleTree<'_>], format: ExportFormat) -> Result<String> {
    let rendered = match format {
        ExportFormat::Text => render_text(trees),
        ExportFormat::Json => serde_json::to_string_pretty(trees)?,
        ExportFormat::GeoJson => serde_json::to_string_pretty(&geojson::feature_collection(trees))?,
    };
    Ok(rendered)
}

fn render_text(trees: &[VisibleTree<'_>]) -> String {
    let mut out = String::new();
    for tree in trees {
        let style = match tree.representation {
            Representation::Detailed => "icon",
            Representation::Simplified => "dot",
        };
        out.push_str(&format!(
            "{:>4}  {:<9} {:<4} {:.6},{:.6}  {}",
            tree.id, tree.category, style, tree.lat, tree.lon, tree.popup.name
        ));
        if !tree.popup.botanical_name.is_empty() {
            out.push_str(&format!(" ({})", tree.popup.botanical_name));
        }
        out.push('\n');
    }
    out
}

/// 描画結果をファイルに書き出す
pub fn export_visible(trees: &[VisibleTree<'_>], format: ExportFormat, output: &Path) -> Result<()> {
    let content = render(trees, format)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, content)?;

    tracing::info!(count = trees.len(), path = %output.display(), "表示中の樹木を出力");
    Ok(())
}
