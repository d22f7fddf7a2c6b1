//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载导出链路中的所有错误来源，调用侧可按分支匹配。
//!
//! - 尺寸为 0 在分配缓冲与渲染之前同步报错
//! - 渲染器错误原样透传（`#[error(transparent)]`），不改写信息
//! - 编码/写盘失败不是错误，由文件投递返回 `false`

/// 渲染器在 `render` 期间抛出的错误。
///
/// 由外部渲染器构造，导出链路只负责透传。
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RenderError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 导出链路统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("无法导出尺寸为 0 的图片（请求尺寸为 {width}x{height}）")]
    InvalidDimension { width: u32, height: u32 },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("参数无效：{0}")]
    InvalidParameter(String),
}

impl From<ExportError> for String {
    fn from(error: ExportError) -> Self {
        error.to_string()
    }
}
