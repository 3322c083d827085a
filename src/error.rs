use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeMapError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応の入力形式: {0} (csv/xlsx)")]
    UnsupportedFormat(String),

    #[error("CSV解析エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] campus_trees_common::Error),
}

pub type Result<T> = std::result::Result<T, TreeMapError>;
