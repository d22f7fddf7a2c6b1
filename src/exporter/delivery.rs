//! # 投递模块
//!
//! ## 设计思路
//!
//! 成品缓冲每次只交给一个去处：剪贴板、直接返回给调用方、或编码写入文件。
//! 编码器与剪贴板都是可替换的外部协作方（trait），默认实现分别基于
//! `image` 与 `arboard`。
//!
//! ## 实现思路
//!
//! - 文件写入失败不算错误：`encode_to_file` 记录 warn 并返回 `false`，
//!   以区分“导出链路正常、写盘失败”与链路内部失败。
//! - 编码前按格式转换像素类型：JPEG 去掉 alpha，Farbfeld 用 16 位，
//!   OpenEXR / HDR 用 32 位浮点。
//! - 剪贴板写入只尝试一次，失败以 `ExportError::Clipboard` 返回。

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use super::ExportError;
use super::source::PixelBuffer;

/// 导出去处。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// 未指定去处：交给界面层弹出选择。
    Prompt,
    /// 直接返回像素缓冲。
    Bytes,
    /// 写入系统剪贴板。
    Clipboard,
    /// 编码写入文件。
    File(PathBuf),
}

/// 导出结果，与 `Destination` 一一对应。
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    /// 需要界面层选择去处，附带可写格式过滤项。
    DestinationRequested { filters: Vec<String> },
    Buffer(PixelBuffer),
    Copied,
    /// 编码器报告的写入结果。
    Saved(bool),
}

/// 外部编码器。
pub trait ImageCodec {
    /// 编码并写入 `path`，返回是否成功。
    fn encode_to_file(&self, buffer: &PixelBuffer, path: &Path) -> bool;
}

/// 外部剪贴板。
pub trait ClipboardSink {
    fn set_image(&mut self, buffer: &PixelBuffer) -> Result<(), ExportError>;
}

/// 基于 `image` crate 的默认编码器，格式由扩展名决定。
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileCodec;

impl ImageFileCodec {
    fn encode(buffer: &PixelBuffer, path: &Path) -> Result<(), String> {
        let format = ImageFormat::from_path(path).map_err(|e| format!("无法识别输出格式：{}", e))?;
        if !format.writing_enabled() {
            return Err(format!("不支持写出该格式：{:?}", format));
        }

        convert_for_format(DynamicImage::ImageRgba8(buffer.as_image().clone()), format)
            .save_with_format(path, format)
            .map_err(|e| format!("保存图片失败：{}", e))
    }
}

/// 转换为编码器接受的像素类型。
fn convert_for_format(image: DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        ImageFormat::Farbfeld => DynamicImage::ImageRgba16(image.to_rgba16()),
        ImageFormat::OpenExr => DynamicImage::ImageRgba32F(image.to_rgba32f()),
        ImageFormat::Hdr => DynamicImage::ImageRgb32F(image.to_rgb32f()),
        _ => image,
    }
}

impl ImageCodec for ImageFileCodec {
    fn encode_to_file(&self, buffer: &PixelBuffer, path: &Path) -> bool {
        match Self::encode(buffer, path) {
            Ok(()) => {
                log::info!(
                    "💾 图片已保存 - {}x{} -> {}",
                    buffer.width(),
                    buffer.height(),
                    path.display()
                );
                true
            }
            Err(message) => {
                log::warn!("❌ 写入文件失败：{}（路径：{}）", message, path.display());
                false
            }
        }
    }
}

/// 基于 `arboard` 的系统剪贴板。每次写入新建连接。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_image(&mut self, buffer: &PixelBuffer) -> Result<(), ExportError> {
        log::debug!("📋 准备复制到剪贴板 - {}x{}", buffer.width(), buffer.height());

        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ExportError::Clipboard(format!("无法访问剪贴板：{}", e)))?;

        let image_data = arboard::ImageData {
            width: buffer.width() as usize,
            height: buffer.height() as usize,
            bytes: Cow::Borrowed(buffer.as_raw()),
        };

        clipboard
            .set_image(image_data)
            .map_err(|e| ExportError::Clipboard(format!("复制失败：{}", e)))?;

        log::info!("✅ 已复制到剪贴板");
        Ok(())
    }
}
