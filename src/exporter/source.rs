//! # 基础数据模型
//!
//! ## 设计思路
//!
//! 将“场景坐标”和“像素坐标”两类矩形、颜色、背景画刷以及像素缓冲统一放在这里，
//! 其余阶段只依赖这些类型，不依赖具体渲染器。
//!
//! - `Rect`：源矩形（场景单位）与目标矩形（像素单位）共用
//! - `Rgba`：对外统一使用 RGBA 通道顺序
//! - `BackgroundBrush`：宿主当前背景画刷，`NoBrush` 表示透明背景
//! - `PixelBuffer`：贯穿全部阶段的唯一可变产物（非预乘 RGBA8）

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::ExportError;

/// 轴对齐矩形。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 以原点 (0,0) 为左上角的像素矩形。
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// 宽高均为有限正数。
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// RGBA 颜色（每通道 0–255，非预乘）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// 解析 `#rrggbb` 或 `#rrggbbaa`（`#` 可省略）。
impl FromStr for Rgba {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(ExportError::InvalidParameter(format!(
                "颜色格式无效：{}（应为 #rrggbb 或 #rrggbbaa）",
                s
            )));
        }

        let channel = |index: usize| {
            u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16)
                .map_err(|e| ExportError::InvalidParameter(format!("颜色通道无效：{}（{}）", s, e)))
        };

        let a = if hex.len() == 8 { channel(3)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(1)?, channel(2)?, a))
    }
}

/// 画刷样式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushStyle {
    #[default]
    Solid,
    NoBrush,
}

/// 宿主视图的背景画刷，会话构造时读取一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundBrush {
    pub color: Rgba,
    #[serde(default)]
    pub style: BrushStyle,
}

impl BackgroundBrush {
    pub const fn solid(color: Rgba) -> Self {
        Self {
            color,
            style: BrushStyle::Solid,
        }
    }

    pub const fn none(color: Rgba) -> Self {
        Self {
            color,
            style: BrushStyle::NoBrush,
        }
    }

    pub fn is_no_brush(&self) -> bool {
        self.style == BrushStyle::NoBrush
    }
}

/// 导出像素缓冲。
///
/// 内部存储为非预乘 RGBA8，与 `image` 编码器和 `arboard` 剪贴板约定一致。
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// 以单一颜色填充的缓冲。
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba(color.to_array())),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    /// 越界返回 `None`。
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgba::from_array(p.0))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(p) = self.image.get_pixel_mut_checked(x, y) {
            p.0 = color.to_array();
        }
    }

    /// 行优先的 RGBA 字节（`width * height * 4`）。
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.image.pixels().map(|p| Rgba::from_array(p.0))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
