//! # 渲染调用模块
//!
//! ## 设计思路
//!
//! 场景本身的绘制交给外部渲染器（`SceneRenderer`），这里只负责调用协议：
//! 1. 进入导出模式（抗锯齿、背景色、绘制上下文、缩放系数）
//! 2. 设置绘制上下文的抗锯齿提示
//! 3. 调用 `render`，把源矩形内容映射到目标矩形（非等比拉伸，不留边）
//! 4. 退出导出模式（即使第 3 步出错也必须执行）
//!
//! ## 实现思路
//!
//! - 第 4 步由 `ExportModeGuard`（RAII）保证：构造时进入，`Drop` 时退出，
//!   `?` 提前返回和 panic 展开都会触发。
//! - `PaintContext` 绑定到像素缓冲，并提供直通 alpha 的 source-over 混合，
//!   供渲染器逐像素绘制。

use std::ops::{Deref, DerefMut};

use super::scale::ScaleFactor;
use super::source::{PixelBuffer, Rect, Rgba};
use super::RenderError;

/// 进入导出模式时传给渲染器的配置。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportMode {
    pub antialias: bool,
    pub background: Rgba,
    pub scale: ScaleFactor,
}

/// 外部渲染器：场景图及其绘制能力。
pub trait SceneRenderer {
    /// 场景的自然边界（场景单位）。导出链路不会修改它。
    fn source_rect(&self) -> Rect;

    /// 场景在宿主视图中的自然像素尺寸，用于初始宽高与名义宽度。
    fn target_rect(&self) -> Rect {
        self.source_rect()
    }

    /// 进入导出模式：设备相关特性（如线宽）按 `mode.scale` 缩放。
    fn enter_export_mode(&mut self, mode: &ExportMode, context: &PaintContext<'_>);

    /// 退出导出模式，恢复进入前的状态。
    fn exit_export_mode(&mut self);

    /// 将 `source` 内的场景内容绘制到 `context` 的 `target` 区域。
    fn render(
        &mut self,
        context: &mut PaintContext<'_>,
        target: Rect,
        source: Rect,
    ) -> Result<(), RenderError>;
}

/// 绑定到像素缓冲的绘制上下文。
pub struct PaintContext<'a> {
    buffer: &'a mut PixelBuffer,
    antialias: bool,
}

impl<'a> PaintContext<'a> {
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self {
            buffer,
            antialias: false,
        }
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn set_antialias(&mut self, antialias: bool) {
        self.antialias = antialias;
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &*self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut *self.buffer
    }

    /// 以 `coverage`（0–1）覆盖率把 `color` 混合到 (x, y)。越界忽略。
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba, coverage: f64) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if let Some(dst) = self.buffer.pixel(x, y) {
            self.buffer.set_pixel(x, y, source_over(dst, color, coverage));
        }
    }
}

/// 直通 alpha 的 source-over 合成。
pub fn source_over(dst: Rgba, src: Rgba, coverage: f64) -> Rgba {
    let sa = (src.a as f64 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.a as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba::TRANSPARENT;
    }

    let channel = |s: u8, d: u8| {
        let value = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba::new(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// 导出模式的 RAII 守卫。
///
/// 构造时进入导出模式，`Drop` 时退出。持有渲染器的可变借用，
/// 期间通过 `Deref` 访问渲染器。
pub struct ExportModeGuard<'r, R: SceneRenderer + ?Sized> {
    renderer: &'r mut R,
}

impl<'r, R: SceneRenderer + ?Sized> ExportModeGuard<'r, R> {
    pub fn enter(renderer: &'r mut R, mode: &ExportMode, context: &PaintContext<'_>) -> Self {
        log::debug!(
            "🎬 进入导出模式 - antialias={} background={} scale={}",
            mode.antialias,
            mode.background,
            mode.scale
        );
        renderer.enter_export_mode(mode, context);
        Self { renderer }
    }
}

impl<R: SceneRenderer + ?Sized> Deref for ExportModeGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.renderer
    }
}

impl<R: SceneRenderer + ?Sized> DerefMut for ExportModeGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.renderer
    }
}

impl<R: SceneRenderer + ?Sized> Drop for ExportModeGuard<'_, R> {
    fn drop(&mut self) {
        self.renderer.exit_export_mode();
        log::debug!("🎬 已退出导出模式");
    }
}

/// 在导出模式内把场景渲染进 `buffer`。
///
/// 渲染错误原样返回；无论成功与否都会退出导出模式。
pub fn render_into<R: SceneRenderer + ?Sized>(
    renderer: &mut R,
    buffer: &mut PixelBuffer,
    target: Rect,
    source: Rect,
    mode: ExportMode,
) -> Result<(), RenderError> {
    let mut context = PaintContext::new(buffer);
    let mut guard = ExportModeGuard::enter(renderer, &mode, &context);
    context.set_antialias(mode.antialias);
    guard.render(&mut context, target, source)
}
