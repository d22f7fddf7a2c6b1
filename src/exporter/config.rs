//! # 配置模块
//!
//! ## 设计思路
//!
//! 将会话级的“可调策略”集中到 `ExportConfig`，保证运行时行为可观测、可调整、可测试。
//! 导出参数（宽高、背景等）属于单次会话状态，不放在这里。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - 所有字段 `#[serde(default)]`，配置文件只需写出要覆盖的项。
//! - `validate_output_size` 在分配缓冲前按像素数与内存估算做上限检查。

use serde::{Deserialize, Serialize};

use super::ExportError;

/// 导出配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 输出像素上限（`width * height`）。
    pub max_output_pixels: u64,
    /// 输出缓冲预计内存上限（按 RGBA 估算，字节）。
    pub max_output_bytes: u64,
    /// 文件类型过滤列表中优先排在前面的扩展名（按顺序）。
    pub preferred_formats: Vec<String>,
    /// 新会话的抗锯齿默认值。
    pub default_antialias: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_output_pixels: 100_000_000,
            max_output_bytes: 400 * 1024 * 1024,
            preferred_formats: vec!["png".to_string(), "tif".to_string(), "jpg".to_string()],
            default_antialias: true,
        }
    }
}

impl ExportConfig {
    /// 校验输出尺寸是否超过像素与内存上限。
    pub(crate) fn validate_output_size(&self, width: u32, height: u32) -> Result<(), ExportError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ExportError::ResourceLimit("输出像素数溢出".to_string()))?;

        if pixels > self.max_output_pixels {
            return Err(ExportError::ResourceLimit(format!(
                "输出像素过大：{} 像素（限制：{} 像素）",
                pixels, self.max_output_pixels
            )));
        }

        let estimated = pixels
            .checked_mul(4)
            .ok_or_else(|| ExportError::ResourceLimit("输出内存估算溢出".to_string()))?;

        if estimated > self.max_output_bytes {
            return Err(ExportError::ResourceLimit(format!(
                "输出预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                self.max_output_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}
