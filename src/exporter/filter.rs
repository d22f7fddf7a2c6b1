//! # 明度反转滤镜
//!
//! ## 设计思路
//!
//! 对每个像素取 `mn = min(R,G,B)`、`mx = max(R,G,B)`、`d = (255 - mx) - mn`，
//! 再把 `d` 加到三个颜色通道上，alpha 不动。
//! 三个通道平移同一个量，最大通道（HSV 的 V）被反转，色相与饱和度大体保持。
//! 这是近似算法，不做颜色空间转换。
//!
//! ## 实现思路
//!
//! 全部按 8 位无符号回绕运算。对合法输入，每个通道的最终结果
//! `c + 255 - mx - mn` 恒落在 0–255 内，回绕只出现在中间量 `d` 上，
//! 因此结果与按整数精确计算（或截断）一致，且滤镜是对合的。

use super::source::PixelBuffer;

/// 原地反转缓冲中每个像素的明度。
pub fn invert_value(buffer: &mut PixelBuffer) {
    for pixel in buffer.as_raw_mut().chunks_exact_mut(4) {
        invert_pixel(pixel);
    }
}

/// 反转单个 RGBA 像素（只改前三个通道）。
pub fn invert_pixel(pixel: &mut [u8]) {
    let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
    let mn = r.min(g).min(b);
    let mx = r.max(g).max(b);
    let d = (255 - mx).wrapping_sub(mn);

    pixel[0] = r.wrapping_add(d);
    pixel[1] = g.wrapping_add(d);
    pixel[2] = b.wrapping_add(d);
}
