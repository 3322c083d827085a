//! インベントリ表の読み込み
//!
//! CSV（ヘッダー行必須）とExcelブック（先頭シート）に対応。
//! 列名は Latitude / Longitude / TreeName / BotanicalName / Image / Link。
//! 未知の列は無視し、座標の検証は RecordStore 側で行う。

use crate::error::{Result, TreeMapError};
use calamine::{open_workbook_auto, Reader};
use campus_trees_common::RawRecord;
use std::path::Path;

/// 入力ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    Csv,
    Spreadsheet,
}

impl InventoryFormat {
    /// 拡張子から判定（拡張子なしはCSV扱い）
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "" | "csv" | "txt" => Ok(InventoryFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(InventoryFormat::Spreadsheet),
            _ => Err(TreeMapError::UnsupportedFormat(ext)),
        }
    }
}

/// 拡張子に応じてインベントリを読み込む
pub fn read_inventory(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(TreeMapError::FileNotFound(path.display().to_string()));
    }

    match InventoryFormat::from_path(path)? {
        InventoryFormat::Csv => read_csv(path),
        InventoryFormat::Spreadsheet => read_spreadsheet(path),
    }
}

pub fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)?;
    read_csv_str(&content)
}

/// CSV文字列から読み込み
pub fn read_csv_str(content: &str) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Excelブックの先頭シートを読み込み
pub fn read_spreadsheet(path: &Path) -> Result<Vec<RawRecord>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| TreeMapError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TreeMapError::Spreadsheet("シートがありません".into()))?
        .map_err(|e| TreeMapError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let records = rows
        .map(|row| {
            let fields: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            record_from_fields(&headers, &fields)
        })
        .collect();

    Ok(records)
}

/// ヘッダー名と値の組からレコードを組み立てる
fn record_from_fields(headers: &[String], fields: &[String]) -> RawRecord {
    let mut record = RawRecord::default();

    for (header, value) in headers.iter().zip(fields) {
        if value.is_empty() {
            continue;
        }
        let slot = match header.as_str() {
            "Latitude" => &mut record.latitude,
            "Longitude" => &mut record.longitude,
            "TreeName" => &mut record.tree_name,
            "BotanicalName" => &mut record.botanical_name,
            "Image" => &mut record.image,
            "Link" => &mut record.link,
            _ => continue,
        };
        *slot = Some(value.clone());
    }

    record
}
