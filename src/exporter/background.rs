//! # 背景合成
//!
//! 生成以背景色填充的初始缓冲。`no_brush` 由会话构造时的画刷样式决定，
//! 置位时无论颜色本身的 alpha 是多少，都强制 alpha = 0。

use super::source::{PixelBuffer, Rgba};

/// 背景实际生效的颜色。
pub fn effective_background(color: Rgba, no_brush: bool) -> Rgba {
    if no_brush { color.with_alpha(0) } else { color }
}

/// 构建 `width x height` 的背景缓冲。
pub fn build_background(width: u32, height: u32, color: Rgba, no_brush: bool) -> PixelBuffer {
    PixelBuffer::filled(width, height, effective_background(color, no_brush))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_pixel_with_color() {
        let color = Rgba::new(10, 20, 30, 200);
        let buffer = build_background(4, 3, color, false);

        assert_eq!((buffer.width(), buffer.height()), (4, 3));
        assert!(buffer.pixels().all(|p| p == color));
    }

    #[test]
    fn no_brush_forces_zero_alpha() {
        let buffer = build_background(5, 2, Rgba::new(10, 20, 30, 255), true);

        assert!(buffer.pixels().all(|p| p == Rgba::new(10, 20, 30, 0)));
    }

    #[test]
    fn translucent_color_is_kept_without_no_brush_flag() {
        let buffer = build_background(1, 1, Rgba::new(1, 2, 3, 0), false);
        assert_eq!(buffer.pixel(0, 0), Some(Rgba::new(1, 2, 3, 0)));

        let buffer = build_background(1, 1, Rgba::new(1, 2, 3, 77), false);
        assert_eq!(buffer.pixel(0, 0), Some(Rgba::new(1, 2, 3, 77)));
    }
}
