use crate::export::ExportFormat;
use campus_trees_common::CategoryFilter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "campus-trees")]
#[command(about = "キャンパス樹木インベントリの分類・絞り込みツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 条件に一致する樹木を表示
    Show {
        /// インベントリ（CSV/XLSX）
        #[arg(required = true)]
        input: PathBuf,

        /// 樹木名・学名の部分一致
        #[arg(short, long, default_value = "")]
        search: String,

        /// カテゴリ (all/coconut/palm/neem/fruit/avenue/flower/tamarind/heritage/other)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// ズームレベル（省略時は設定の初期値）
        #[arg(short, long)]
        zoom: Option<f64>,

        /// 出力形式 (text/json/geojson)
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// カテゴリ別の本数を集計
    Stats {
        /// インベントリ（CSV/XLSX）
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 標準入力から検索語を受け取り、絞り込みを逐次更新
    ///
    /// `:zoom N` と `:category X` は即時反映、それ以外の行は検索語としてデバウンスされる。
    Watch {
        /// インベントリ（CSV/XLSX）
        #[arg(required = true)]
        input: PathBuf,

        /// 開始ズームレベル
        #[arg(short, long)]
        zoom: Option<f64>,
    },

    /// 設定を表示/編集
    Config {
        /// ドット表示に切り替えるズーム閾値
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 検索入力のデバウンス時間（ミリ秒）
        #[arg(long)]
        set_debounce_ms: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// watch モードの1行分の入力
#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Zoom(f64),
    Category(CategoryFilter),
    Search(String),
}

impl WatchCommand {
    /// `:` で始まる行はコマンド、それ以外は検索語（空白も含めそのまま）
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(WatchCommand::Search(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("zoom"), Some(value)) => value
                .parse()
                .map(WatchCommand::Zoom)
                .map_err(|_| format!("ズームが数値ではありません: {}", value)),
            (Some("category"), Some(value)) => value
                .parse()
                .map(WatchCommand::Category)
                .map_err(|e| e.to_string()),
            _ => Err(format!("不明なコマンド: {}", line)),
        }
    }
}
