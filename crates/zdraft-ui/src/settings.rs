//! 用户配置
//!
//! JSON 文件，所有字段都有默认值：
//!
//! ```json
//! {
//!   "default_scale": 1.0,
//!   "align_to_path": true,
//!   "label": { "prefix": "P-", "start": 1, "text_height": 2.5, "gap": 1.0 },
//!   "aliases": { "AR": "ARRAYPATH" }
//! }
//! ```

use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use zdraft_core::label::LabelOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    /// 阵列缩放比例的默认值
    pub default_scale: f64,
    /// 阵列时是否默认对齐路径方向
    pub align_to_path: bool,
    pub label: LabelOptions,
    /// 用户别名 -> 完整命令
    pub aliases: BTreeMap<String, String>,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            align_to_path: false,
            label: LabelOptions::default(),
            aliases: BTreeMap::new(),
        }
    }
}

impl DraftSettings {
    pub fn from_json(json: &str) -> Result<Self, CommandError> {
        let settings: DraftSettings =
            serde_json::from_str(json).map_err(|e| CommandError::Config(e.to_string()))?;
        if !(settings.default_scale.is_finite() && settings.default_scale > 0.0) {
            return Err(CommandError::Config(format!(
                "default_scale must be positive, got {}",
                settings.default_scale
            )));
        }
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, CommandError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// 文件不存在时使用默认配置
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CommandError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                tracing::warn!("Settings file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings = DraftSettings::from_json(r#"{ "align_to_path": true, "label": { "prefix": "N" } }"#).unwrap();
        assert!(settings.align_to_path);
        assert_eq!(settings.default_scale, 1.0);
        assert_eq!(settings.label.prefix, "N");
        assert_eq!(settings.label.start, 1);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(DraftSettings::from_json("{"), Err(CommandError::Config(_))));
        assert!(matches!(
            DraftSettings::from_json(r#"{ "default_scale": 0 }"#),
            Err(CommandError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("zdraft_no_such_settings.json");
        let settings = DraftSettings::load_or_default(Some(&path)).unwrap();
        assert_eq!(settings, DraftSettings::default());
    }
}
