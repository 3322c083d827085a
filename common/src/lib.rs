//! Campus Trees Common Library
//!
//! CLIと地図フロントエンドで共有される型と分類ロジック

pub mod types;
pub mod classifier;
pub mod style;
pub mod error;

pub use types::{CategoryFilter, PopupContent, RawRecord, TreeCategory, DEFAULT_TREE_IMAGE};
pub use classifier::classify;
pub use style::{DotStyle, IconSpec};
pub use error::{Error, Result};
