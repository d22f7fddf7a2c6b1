//! # 图片导出模块（exporter）
//!
//! ## 设计思路
//!
//! 把一个二维场景栅格化为固定尺寸的像素缓冲，再投递到文件、剪贴板或调用方。
//! 场景绘制本身交给外部渲染器，这里只负责四件容易做错的事：
//! 宽高联动、背景合成、分辨率缩放传递、明度反转。
//!
//! - `source`：矩形、颜色、背景画刷、像素缓冲
//! - `params`：导出参数与宽高联动（显式“更新进行中”标志）
//! - `background`：背景缓冲（“无画刷”强制透明）
//! - `scale`：分辨率缩放系数
//! - `render`：渲染器 trait、绘制上下文、导出模式 RAII 守卫
//! - `filter`：明度反转
//! - `delivery`：去处、编码器、剪贴板
//! - `formats`：可写格式过滤项
//! - `config/error`：配置与错误
//! - `handler`：会话编排
//!
//! ## 新同事快速上手
//!
//! ```text
//! ImageExporter::new（读取自然尺寸、背景画刷、名义宽度）
//!    ↓ set_width / set_height（params.rs 联动）
//! export(destination)
//!    ├─ 尺寸校验（0 尺寸 / 上限）
//!    ├─ background.rs（初始缓冲）
//!    ├─ scale.rs（缩放系数）
//!    ├─ render.rs（ExportModeGuard 内调用渲染器）
//!    ├─ filter.rs（可选明度反转）
//!    └─ delivery.rs（Bytes / Clipboard / File）
//! ```

mod background;
mod config;
mod delivery;
mod error;
mod filter;
mod formats;
mod handler;
mod params;
mod render;
mod scale;
mod source;

pub use background::{build_background, effective_background};
pub use config::ExportConfig;
pub use delivery::{ClipboardSink, Destination, ExportOutput, ImageCodec, ImageFileCodec, SystemClipboard};
pub use error::{ExportError, RenderError};
pub use filter::{invert_pixel, invert_value};
pub use formats::supported_image_formats;
pub use handler::ImageExporter;
pub use params::{DimensionSynchronizer, ExportParameters};
pub use render::{ExportMode, ExportModeGuard, PaintContext, SceneRenderer, render_into, source_over};
pub use scale::{ScaleFactor, compute_scale};
pub use source::{BackgroundBrush, BrushStyle, PixelBuffer, Rect, Rgba};
