//! # 内置矢量场景
//!
//! ## 设计思路
//!
//! 提供一个最小可用的 `SceneRenderer` 实现，供命令行与测试驱动导出链路：
//! - 填充矩形（抗锯齿时按像素覆盖率混合）
//! - 线段（线宽为设备像素，导出模式下乘以缩放系数）
//! - 内嵌位图（Base64 / Data URL 或本地路径），缩放到映射后的矩形
//!
//! ## 实现思路
//!
//! - 源矩形到目标矩形是逐轴线性映射，宽高比不同时非等比拉伸。
//! - 位图缩放优先 `fast_image_resize`，失败回退 `image::imageops`。
//! - 场景描述使用 JSON，`type` 字段区分图元。

use std::fs;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose};
use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{ImageBuffer, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::exporter::{ExportMode, PaintContext, Rect, RenderError, Rgba, SceneRenderer};

/// 场景坐标中的点。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// 内嵌位图来源。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterSource {
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径。
    Path(PathBuf),
}

/// 场景图元。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneItem {
    Rect {
        rect: Rect,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        /// 设备像素线宽，0 视为 1 像素。
        #[serde(default)]
        width: f64,
        color: Rgba,
    },
    Image {
        rect: Rect,
        source: RasterSource,
    },
}

/// 由图元列表组成的场景。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub bounds: Rect,
    #[serde(default)]
    pub items: Vec<SceneItem>,
    #[serde(skip)]
    export_mode: Option<ExportMode>,
}

impl Scene {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            export_mode: None,
        }
    }

    pub fn with_item(mut self, item: SceneItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content).map_err(|e| AppError::Scene(format!("解析场景失败: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 当前导出模式（未处于导出模式时为 `None`）。
    pub fn export_mode(&self) -> Option<&ExportMode> {
        self.export_mode.as_ref()
    }

    fn device_scale(&self) -> f64 {
        self.export_mode.map(|m| m.scale.get()).unwrap_or(1.0)
    }
}

/// 源矩形 → 目标矩形的逐轴线性映射。
#[derive(Debug, Clone, Copy)]
struct Mapping {
    source: Rect,
    target: Rect,
    sx: f64,
    sy: f64,
}

impl Mapping {
    fn new(target: Rect, source: Rect) -> Option<Self> {
        if !source.has_area() {
            return None;
        }
        Some(Self {
            source,
            target,
            sx: target.width / source.width,
            sy: target.height / source.height,
        })
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.target.x + (x - self.source.x) * self.sx,
            self.target.y + (y - self.source.y) * self.sy,
        )
    }

    fn rect(&self, rect: &Rect) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.point(rect.x, rect.y);
        let (x1, y1) = self.point(rect.right(), rect.bottom());
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl SceneRenderer for Scene {
    fn source_rect(&self) -> Rect {
        self.bounds
    }

    fn enter_export_mode(&mut self, mode: &ExportMode, _context: &PaintContext<'_>) {
        self.export_mode = Some(*mode);
    }

    fn exit_export_mode(&mut self) {
        self.export_mode = None;
    }

    fn render(
        &mut self,
        context: &mut PaintContext<'_>,
        target: Rect,
        source: Rect,
    ) -> Result<(), RenderError> {
        let mapping = Mapping::new(target, source)
            .ok_or_else(|| RenderError::new(format!("源矩形无有效面积：{}x{}", source.width, source.height)))?;
        let device_scale = self.device_scale();

        for item in &self.items {
            match item {
                SceneItem::Rect { rect, color } => fill_rect(context, mapping.rect(rect), *color),
                SceneItem::Line {
                    from,
                    to,
                    width,
                    color,
                } => {
                    let cosmetic = if *width > 0.0 { *width } else { 1.0 };
                    stroke_line(
                        context,
                        mapping.point(from.x, from.y),
                        mapping.point(to.x, to.y),
                        cosmetic * device_scale,
                        *color,
                    );
                }
                SceneItem::Image { rect, source } => {
                    let raster = decode_raster(source)?;
                    draw_raster(context, mapping.rect(rect), &raster)?;
                }
            }
        }

        Ok(())
    }
}

fn fill_rect(context: &mut PaintContext<'_>, (x0, y0, x1, y1): (f64, f64, f64, f64), color: Rgba) {
    let antialias = context.antialias();
    let (col_start, col_end) = pixel_span(x0, x1, context.width());
    let (row_start, row_end) = pixel_span(y0, y1, context.height());

    for py in row_start..row_end {
        for px in col_start..col_end {
            let coverage = if antialias {
                overlap(x0, x1, px as f64) * overlap(y0, y1, py as f64)
            } else {
                let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
                if cx >= x0 && cx < x1 && cy >= y0 && cy < y1 { 1.0 } else { 0.0 }
            };
            if coverage > 0.0 {
                context.blend_pixel(px, py, color, coverage);
            }
        }
    }
}

fn stroke_line(context: &mut PaintContext<'_>, (ax, ay): (f64, f64), (bx, by): (f64, f64), width: f64, color: Rgba) {
    let antialias = context.antialias();
    let half = width / 2.0;
    let pad = half + 1.0;
    let (col_start, col_end) = pixel_span(ax.min(bx) - pad, ax.max(bx) + pad, context.width());
    let (row_start, row_end) = pixel_span(ay.min(by) - pad, ay.max(by) + pad, context.height());

    for py in row_start..row_end {
        for px in col_start..col_end {
            let dist = distance_to_segment(px as f64 + 0.5, py as f64 + 0.5, ax, ay, bx, by);
            let coverage = if antialias {
                (half + 0.5 - dist).clamp(0.0, 1.0)
            } else if dist <= half {
                1.0
            } else {
                0.0
            };
            if coverage > 0.0 {
                context.blend_pixel(px, py, color, coverage);
            }
        }
    }
}

/// 位图在源图像中的裁剪区域（像素坐标，可含小数）。
#[derive(Debug, Clone, Copy, PartialEq)]
struct SourceCrop {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// 位图映射到画布后的可见部分。
#[derive(Debug, Clone, Copy, PartialEq)]
struct RasterPlacement {
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    crop: SourceCrop,
}

/// 先在 f64 中把映射矩形裁剪到画布，再换算为整数尺寸与源图裁剪区域。
///
/// 完全不可见时返回 `Ok(None)`；映射尺寸无法表示（非有限值）时报错。
fn place_raster(
    (x0, y0, x1, y1): (f64, f64, f64, f64),
    (canvas_width, canvas_height): (u32, u32),
    (raster_width, raster_height): (u32, u32),
) -> Result<Option<RasterPlacement>, RenderError> {
    let left = x0.round();
    let top = y0.round();
    let right = x1.round().max(left + 1.0);
    let bottom = y1.round().max(top + 1.0);
    let full_width = right - left;
    let full_height = bottom - top;
    if ![left, top, full_width, full_height].iter().all(|v| v.is_finite()) {
        return Err(RenderError::new(format!(
            "位图映射尺寸无法表示：({}, {}) - ({}, {})",
            x0, y0, x1, y1
        )));
    }

    let visible_left = left.max(0.0);
    let visible_top = top.max(0.0);
    let visible_right = right.min(canvas_width as f64);
    let visible_bottom = bottom.min(canvas_height as f64);
    if visible_right <= visible_left || visible_bottom <= visible_top {
        return Ok(None);
    }

    let scale_x = raster_width as f64 / full_width;
    let scale_y = raster_height as f64 / full_height;
    let crop_left = ((visible_left - left) * scale_x).clamp(0.0, raster_width as f64);
    let crop_top = ((visible_top - top) * scale_y).clamp(0.0, raster_height as f64);
    let crop = SourceCrop {
        left: crop_left,
        top: crop_top,
        width: ((visible_right - visible_left) * scale_x).min(raster_width as f64 - crop_left),
        height: ((visible_bottom - visible_top) * scale_y).min(raster_height as f64 - crop_top),
    };

    // 可见区域已裁剪到画布以内，转换不会溢出
    Ok(Some(RasterPlacement {
        left: visible_left as i64,
        top: visible_top as i64,
        width: (visible_right - visible_left) as u32,
        height: (visible_bottom - visible_top) as u32,
        crop,
    }))
}

fn draw_raster(
    context: &mut PaintContext<'_>,
    mapped: (f64, f64, f64, f64),
    raster: &RgbaImage,
) -> Result<(), RenderError> {
    if raster.width() == 0 || raster.height() == 0 {
        return Ok(());
    }
    let canvas = (context.width(), context.height());
    let Some(placement) = place_raster(mapped, canvas, raster.dimensions())? else {
        log::debug!("位图完全位于画布之外，跳过");
        return Ok(());
    };
    let filter = if context.antialias() {
        FilterType::Triangle
    } else {
        FilterType::Nearest
    };

    let full_crop = SourceCrop {
        left: 0.0,
        top: 0.0,
        width: raster.width() as f64,
        height: raster.height() as f64,
    };
    let scaled = if placement.crop == full_crop && raster.dimensions() == (placement.width, placement.height) {
        raster.clone()
    } else {
        match resize_with_fast_image_resize(raster, placement.crop, placement.width, placement.height, filter) {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
                resize_with_imageops(raster, placement.crop, placement.width, placement.height, filter)
            }
        }
    };

    for (x, y, pixel) in scaled.enumerate_pixels() {
        context.blend_pixel(
            placement.left + x as i64,
            placement.top + y as i64,
            Rgba::from_array(pixel.0),
            1.0,
        );
    }

    Ok(())
}

fn resize_with_fast_image_resize(
    image: &RgbaImage,
    crop: SourceCrop,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, RenderError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| RenderError::new(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let algorithm = match filter {
        FilterType::Nearest => fr::ResizeAlg::Nearest,
        _ => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
    };
    let options = fr::ResizeOptions::new()
        .resize_alg(algorithm)
        .crop(crop.left, crop.top, crop.width, crop.height);

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| RenderError::new(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| RenderError::new("fast_image_resize 输出缓冲长度异常"))
}

/// 回退路径：按整数像素裁剪后缩放，裁剪区域至少 1x1。
fn resize_with_imageops(
    image: &RgbaImage,
    crop: SourceCrop,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> RgbaImage {
    let (src_width, src_height) = image.dimensions();
    let x = (crop.left.floor() as u32).min(src_width.saturating_sub(1));
    let y = (crop.top.floor() as u32).min(src_height.saturating_sub(1));
    let width = (crop.width.ceil() as u32).clamp(1, src_width - x);
    let height = (crop.height.ceil() as u32).clamp(1, src_height - y);
    let cropped = image::imageops::crop_imm(image, x, y, width, height).to_image();
    image::imageops::resize(&cropped, target_width, target_height, filter)
}

/// 解码内嵌位图为 RGBA8。
fn decode_raster(source: &RasterSource) -> Result<RgbaImage, RenderError> {
    let bytes = match source {
        RasterSource::Base64(data) => parse_base64(data)?,
        RasterSource::Path(path) => fs::read(path).map_err(|e| {
            RenderError::with_source(format!("无法读取位图文件：{}", path.display()), e)
        })?,
    };

    image::load_from_memory(&bytes)
        .map(|decoded| decoded.to_rgba8())
        .map_err(|e| RenderError::with_source("位图解码失败", e))
}

fn parse_base64(data: &str) -> Result<Vec<u8>, RenderError> {
    let normalized = data.trim();
    let payload = if normalized.starts_with("data:image/") {
        let start = normalized
            .find(";base64,")
            .ok_or_else(|| RenderError::new("缺少 base64 标记"))?;
        &normalized[start + 8..]
    } else {
        normalized
    };

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| RenderError::with_source("Base64 解码失败", e))
}

/// `[a, b)` 覆盖到的像素下标区间，裁剪到 `[0, limit)`。
fn pixel_span(a: f64, b: f64, limit: u32) -> (i64, i64) {
    let start = a.floor().max(0.0) as i64;
    let end = (b.ceil() as i64).min(limit as i64);
    (start, end.max(start))
}

/// 区间 `[a, b)` 与像素 `[p, p + 1)` 的重叠长度。
fn overlap(a: f64, b: f64, p: f64) -> f64 {
    (b.min(p + 1.0) - a.max(p)).clamp(0.0, 1.0)
}

fn distance_to_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
