//! # 导出参数与宽高联动
//!
//! ## 设计思路
//!
//! 宽高按源矩形的宽高比联动：用户改宽时重算高，改高时重算宽。
//! 两个处理器互相触发会形成逻辑递归（单线程下也会发生），
//! 因此每个方向各有一个显式的“更新进行中”标志：
//! 处理器在写入对侧维度前置位对侧标志，写完后清除；
//! 对侧处理器看到标志只记录新值，不再反向重算。
//!
//! ## 实现思路
//!
//! - 宽高比每次从当前源矩形现取，不缓存。
//! - 结果按 `round` 取整；源矩形没有有效面积时跳过联动。
//! - 同步器本身允许 0，是否可导出由导出入口判断。

use super::source::{Rect, Rgba};

/// 单次导出会话的参数。
#[derive(Debug, Clone, PartialEq)]
pub struct ExportParameters {
    width: u32,
    height: u32,
    antialias: bool,
    background: Rgba,
    invert_value: bool,
}

impl ExportParameters {
    pub fn new(width: u32, height: u32, antialias: bool, background: Rgba) -> Self {
        Self {
            width,
            height,
            antialias,
            background,
            invert_value: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn invert_value(&self) -> bool {
        self.invert_value
    }

    pub fn set_antialias(&mut self, antialias: bool) {
        self.antialias = antialias;
    }

    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }

    pub fn set_invert_value(&mut self, invert_value: bool) {
        self.invert_value = invert_value;
    }
}

/// 宽高联动器。
#[derive(Debug, Default)]
pub struct DimensionSynchronizer {
    width_update_in_progress: bool,
    height_update_in_progress: bool,
}

impl DimensionSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 宽度被编辑：记录新宽度，并按 `height / width` 重算高度。
    ///
    /// `source_rect` 在需要重算时才调用，返回当前源矩形。
    pub fn on_width_changed<F>(&mut self, params: &mut ExportParameters, width: u32, source_rect: &F)
    where
        F: Fn() -> Rect,
    {
        params.width = width;
        if self.width_update_in_progress {
            return;
        }

        let source = source_rect();
        let Some(ratio) = aspect_ratio(source.height, source.width) else {
            log::warn!("⚠️ 源矩形无有效面积（{}x{}），跳过高度联动", source.width, source.height);
            return;
        };

        let height = scaled_dimension(width, ratio);
        log::debug!("↕️ 宽度 {} -> 联动高度 {}", width, height);

        self.height_update_in_progress = true;
        self.on_height_changed(params, height, source_rect);
        self.height_update_in_progress = false;
    }

    /// 高度被编辑：记录新高度，并按 `width / height` 重算宽度。
    pub fn on_height_changed<F>(&mut self, params: &mut ExportParameters, height: u32, source_rect: &F)
    where
        F: Fn() -> Rect,
    {
        params.height = height;
        if self.height_update_in_progress {
            return;
        }

        let source = source_rect();
        let Some(ratio) = aspect_ratio(source.width, source.height) else {
            log::warn!("⚠️ 源矩形无有效面积（{}x{}），跳过宽度联动", source.width, source.height);
            return;
        };

        let width = scaled_dimension(height, ratio);
        log::debug!("↔️ 高度 {} -> 联动宽度 {}", height, width);

        self.width_update_in_progress = true;
        self.on_width_changed(params, width, source_rect);
        self.width_update_in_progress = false;
    }
}

fn aspect_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    let ratio = numerator / denominator;
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

/// `round(edited * ratio)`，超出 `u32` 范围时饱和。
fn scaled_dimension(edited: u32, ratio: f64) -> u32 {
    (edited as f64 * ratio).round() as u32
}
