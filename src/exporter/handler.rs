//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageExporter` 是一次导出会话：持有渲染器、会话参数、宽高联动器，
//! 以及可替换的编码器和剪贴板。处理链路固定为：
//! 1. 校验尺寸（0 尺寸、像素与内存上限），失败时不分配缓冲
//! 2. 生成背景缓冲
//! 3. 计算缩放系数
//! 4. 在导出模式内渲染
//! 5. 可选的明度反转
//! 6. 投递
//!
//! ## 实现思路
//!
//! - `export` 取 `&mut self`，同一会话不可能并发或重入导出。
//! - 名义宽度与“无画刷”标志在构造时确定。
//! - 记录 `background/render/filter/deliver/total` 阶段耗时，便于性能诊断。

use std::path::PathBuf;
use std::time::Instant;

use super::background::{build_background, effective_background};
use super::delivery::{ClipboardSink, Destination, ExportOutput, ImageCodec, ImageFileCodec, SystemClipboard};
use super::filter::invert_value;
use super::formats::supported_image_formats;
use super::params::{DimensionSynchronizer, ExportParameters};
use super::render::{ExportMode, SceneRenderer, render_into};
use super::scale::{ScaleFactor, compute_scale};
use super::source::{BackgroundBrush, PixelBuffer, Rect, Rgba};
use super::{ExportConfig, ExportError};

/// 图片导出会话。
pub struct ImageExporter<R: SceneRenderer> {
    renderer: R,
    config: ExportConfig,
    params: ExportParameters,
    sync: DimensionSynchronizer,
    no_brush: bool,
    nominal_width: f64,
    codec: Box<dyn ImageCodec>,
    clipboard: Box<dyn ClipboardSink>,
}

impl<R: SceneRenderer> ImageExporter<R> {
    /// 以默认配置创建会话。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use image_exporter::exporter::{BackgroundBrush, Destination, ImageExporter, Rgba};
    ///
    /// let mut exporter = ImageExporter::new(scene, BackgroundBrush::solid(Rgba::WHITE));
    /// exporter.set_width(800);
    /// let output = exporter.export(Destination::Bytes)?;
    /// # Ok::<(), image_exporter::exporter::ExportError>(())
    /// ```
    pub fn new(renderer: R, brush: BackgroundBrush) -> Self {
        Self::with_config(renderer, brush, ExportConfig::default())
    }

    /// 以指定配置创建会话。
    ///
    /// 初始宽高取渲染器的自然目标矩形（截断取整），该宽度同时作为名义宽度。
    pub fn with_config(renderer: R, brush: BackgroundBrush, config: ExportConfig) -> Self {
        let target = renderer.target_rect();
        let no_brush = brush.is_no_brush();
        let background = effective_background(brush.color, no_brush);
        let params = ExportParameters::new(
            target.width as u32,
            target.height as u32,
            config.default_antialias,
            background,
        );

        log::debug!(
            "🆕 新建导出会话 - 初始尺寸 {}x{} background={} no_brush={}",
            params.width(),
            params.height(),
            background,
            no_brush
        );

        Self {
            renderer,
            config,
            params,
            sync: DimensionSynchronizer::new(),
            no_brush,
            nominal_width: target.width,
            codec: Box::new(ImageFileCodec),
            clipboard: Box::new(SystemClipboard),
        }
    }

    /// 替换文件编码器。
    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// 替换剪贴板。
    pub fn with_clipboard(mut self, clipboard: impl ClipboardSink + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn parameters(&self) -> &ExportParameters {
        &self.params
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// 会话构造时记录的名义宽度。
    pub fn nominal_width(&self) -> f64 {
        self.nominal_width
    }

    pub fn is_no_brush(&self) -> bool {
        self.no_brush
    }

    pub fn source_rect(&self) -> Rect {
        self.renderer.source_rect()
    }

    /// 由当前宽高得到的目标矩形，原点 (0,0)。
    pub fn target_rect(&self) -> Rect {
        Rect::from_size(self.params.width(), self.params.height())
    }

    /// 按当前宽度计算的缩放系数。
    pub fn scale_factor(&self) -> ScaleFactor {
        compute_scale(self.params.width(), self.nominal_width)
    }

    /// 设置宽度并联动高度。
    pub fn set_width(&mut self, width: u32) {
        let renderer = &self.renderer;
        self.sync
            .on_width_changed(&mut self.params, width, &|| renderer.source_rect());
    }

    /// 设置高度并联动宽度。
    pub fn set_height(&mut self, height: u32) {
        let renderer = &self.renderer;
        self.sync
            .on_height_changed(&mut self.params, height, &|| renderer.source_rect());
    }

    pub fn set_antialias(&mut self, antialias: bool) {
        self.params.set_antialias(antialias);
    }

    /// 显式指定背景色；指定后不再视为“无画刷”。
    pub fn set_background(&mut self, background: Rgba) {
        self.params.set_background(background);
        self.no_brush = false;
    }

    pub fn set_invert_value(&mut self, invert_value: bool) {
        self.params.set_invert_value(invert_value);
    }

    /// 可写格式过滤项（首选格式在前）。
    pub fn supported_image_formats(&self) -> Vec<String> {
        supported_image_formats(&self.config.preferred_formats)
    }

    /// 导出主入口。
    ///
    /// - `Prompt`：不做任何处理，返回格式过滤项交给界面层
    /// - `Bytes`：返回像素缓冲
    /// - `Clipboard`：写入剪贴板
    /// - `File`：编码写盘，写盘失败返回 `Saved(false)`
    pub fn export(&mut self, destination: Destination) -> Result<ExportOutput, ExportError> {
        let destination = match destination {
            Destination::Prompt => {
                log::debug!("🗂️ 未指定导出去处，请求界面选择");
                return Ok(ExportOutput::DestinationRequested {
                    filters: self.supported_image_formats(),
                });
            }
            Destination::Bytes => Delivery::Bytes,
            Destination::Clipboard => Delivery::Clipboard,
            Destination::File(path) => Delivery::File(path),
        };

        let width = self.params.width();
        let height = self.params.height();
        if width == 0 || height == 0 {
            return Err(ExportError::InvalidDimension { width, height });
        }
        self.config.validate_output_size(width, height)?;

        let total_start = Instant::now();
        let target = Rect::from_size(width, height);
        let source = self.renderer.source_rect();

        let background_start = Instant::now();
        let mut buffer = build_background(width, height, self.params.background(), self.no_brush);
        let background_elapsed = background_start.elapsed();

        let mode = ExportMode {
            antialias: self.params.antialias(),
            background: effective_background(self.params.background(), self.no_brush),
            scale: compute_scale(width, self.nominal_width),
        };

        let render_start = Instant::now();
        render_into(&mut self.renderer, &mut buffer, target, source, mode)?;
        let render_elapsed = render_start.elapsed();

        let filter_start = Instant::now();
        if self.params.invert_value() {
            invert_value(&mut buffer);
        }
        let filter_elapsed = filter_start.elapsed();

        let deliver_start = Instant::now();
        let output = self.deliver(buffer, destination)?;
        let deliver_elapsed = deliver_start.elapsed();

        log::info!(
            "✅ 导出完成 - {}x{} scale={} background={}ms render={}ms filter={}ms deliver={}ms total={}ms",
            width,
            height,
            mode.scale,
            background_elapsed.as_millis(),
            render_elapsed.as_millis(),
            filter_elapsed.as_millis(),
            deliver_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(output)
    }

    fn deliver(&mut self, buffer: PixelBuffer, delivery: Delivery) -> Result<ExportOutput, ExportError> {
        match delivery {
            Delivery::Bytes => Ok(ExportOutput::Buffer(buffer)),
            Delivery::Clipboard => {
                self.clipboard.set_image(&buffer)?;
                Ok(ExportOutput::Copied)
            }
            Delivery::File(path) => Ok(ExportOutput::Saved(self.codec.encode_to_file(&buffer, &path))),
        }
    }
}

/// 需要真正渲染的去处（`Prompt` 已在入口处返回）。
enum Delivery {
    Bytes,
    Clipboard,
    File(PathBuf),
}
