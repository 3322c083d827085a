use crate::error::{Result, TreeMapError};
use campus_trees_common::DEFAULT_TREE_IMAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// このズーム以下ではドット表示
    pub zoom_threshold: f64,
    /// 検索入力のデバウンス時間
    pub debounce_ms: u64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub initial_zoom: f64,
    /// 画像列が空の行に使う画像
    pub default_image: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zoom_threshold: 18.0,
            debounce_ms: 300,
            min_zoom: 18.0,
            max_zoom: 23.0,
            initial_zoom: 18.0,
            default_image: DEFAULT_TREE_IMAGE.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TreeMapError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("campus-trees").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        let zooms = [self.zoom_threshold, self.min_zoom, self.max_zoom, self.initial_zoom];
        if zooms.iter().any(|z| !z.is_finite()) {
            return Err(TreeMapError::Config("ズーム値は有限の数値で指定してください".into()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(TreeMapError::Config(format!(
                "min_zoom ({}) が max_zoom ({}) より大きい",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
