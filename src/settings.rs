//! 导出配置文件读写
//!
//! 配置以 JSON 保存；文件不存在时返回默认配置，字段缺省时逐项取默认值。

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::exporter::ExportConfig;

pub fn load_config(path: &Path) -> Result<ExportConfig, AppError> {
    if !path.exists() {
        log::debug!("配置文件不存在，使用默认配置: {}", path.display());
        return Ok(ExportConfig::default());
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str::<ExportConfig>(&content)
        .map_err(|e| AppError::Settings(format!("解析配置文件失败: {}", e)))
}

pub fn save_config(path: &Path, config: &ExportConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Settings(format!("创建配置目录失败: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Settings(format!("序列化配置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = unique_temp_dir("exporter_settings_missing");
        let config = load_config(&dir.join("config.json")).expect("defaults expected");
        assert_eq!(config, ExportConfig::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = unique_temp_dir("exporter_settings_roundtrip");
        let path = dir.join("nested").join("config.json");
        let config = ExportConfig {
            max_output_pixels: 42,
            preferred_formats: vec!["jpg".to_string()],
            default_antialias: false,
            ..ExportConfig::default()
        };

        save_config(&path, &config).expect("save config failed");
        let loaded = load_config(&path).expect("load config failed");

        assert_eq!(loaded, config);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_a_settings_error() {
        let dir = unique_temp_dir("exporter_settings_malformed");
        fs::create_dir_all(&dir).expect("create temp dir failed");
        let path = dir.join("config.json");
        fs::write(&path, "{ not json").expect("write config failed");

        let result = load_config(&path);

        assert!(matches!(result, Err(AppError::Settings(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
