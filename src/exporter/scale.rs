//! # 分辨率缩放
//!
//! 缩放系数 = 请求宽度 / 会话构造时记录的名义宽度。
//! 名义宽度整个会话只取一次，用户反复改宽也不重算。

use std::fmt;

/// 传给渲染器导出模式的分辨率缩放系数（正数）。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// 计算缩放系数。
///
/// 名义宽度不是有限正数时（空场景）退化为 1.0。
pub fn compute_scale(requested_width: u32, nominal_width: f64) -> ScaleFactor {
    if !(nominal_width.is_finite() && nominal_width > 0.0) {
        log::warn!("⚠️ 名义宽度无效（{}），缩放系数按 1.0 处理", nominal_width);
        return ScaleFactor::IDENTITY;
    }

    let scale = requested_width as f64 / nominal_width;
    if scale > 0.0 {
        ScaleFactor(scale)
    } else {
        ScaleFactor::IDENTITY
    }
}
