//! キャンパス樹木マップのマーカー分類・表示フィルタエンジン

pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod store;

pub use campus_trees_common as common;
