//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError`，供命令行入口、场景加载与配置读写统一返回。
//! 导出链路自身的错误（`ExportError`）通过 `From` 转换，无需手动 map。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - `ExportError` 与 `std::io::Error` 使用 `#[from]`。

use crate::exporter::ExportError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 导出链路错误（尺寸 / 渲染 / 剪贴板 / 上限）
    #[error("{0}")]
    Export(#[from] ExportError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 场景描述无效
    #[error("场景错误: {0}")]
    Scene(String),

    /// 配置文件读写失败
    #[error("配置错误: {0}")]
    Settings(String),
}
