//! # 文件类型过滤列表
//!
//! 可写出的图片格式来自 `image` crate 启用的编码器，按扩展名生成 `*.ext` 过滤项。
//! 首选格式按给定顺序挪到列表最前，其余保持原顺序。

use image::ImageFormat;
use once_cell::sync::Lazy;

/// 所有可写格式的过滤项（进程内只计算一次）。
static WRITABLE_FILTERS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut filters: Vec<String> = Vec::new();
    for format in ImageFormat::all().filter(|f| f.writing_enabled()) {
        for ext in format.extensions_str() {
            let filter = format!("*.{}", ext);
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
    }
    filters
});

/// 可写格式过滤项，`preferred` 中存在的项按顺序排到最前。
pub fn supported_image_formats<S: AsRef<str>>(preferred: &[S]) -> Vec<String> {
    prioritize(WRITABLE_FILTERS.clone(), preferred)
}

fn prioritize<S: AsRef<str>>(mut filters: Vec<String>, preferred: &[S]) -> Vec<String> {
    for ext in preferred.iter().rev() {
        let wanted = format!("*.{}", ext.as_ref().trim_start_matches("*.").to_ascii_lowercase());
        if let Some(index) = filters.iter().position(|f| *f == wanted) {
            let filter = filters.remove(index);
            filters.insert(0, filter);
        }
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_formats_lead_in_order() {
        let filters = supported_image_formats(&["png", "tif", "jpg"]);

        assert_eq!(&filters[..3], &["*.png", "*.tif", "*.jpg"]);
        assert!(filters.iter().filter(|f| *f == "*.png").count() == 1);
    }

    #[test]
    fn unknown_preferred_formats_are_ignored() {
        let filters = prioritize(
            vec!["*.bmp".to_string(), "*.png".to_string()],
            &["xyz", "PNG"],
        );
        assert_eq!(filters, vec!["*.png", "*.bmp"]);
    }

    #[test]
    fn empty_preference_keeps_encoder_order() {
        let filters = supported_image_formats::<&str>(&[]);
        assert_eq!(filters, *WRITABLE_FILTERS);
    }
}
