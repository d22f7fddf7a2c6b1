//! # 图片导出工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与结果输出。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::io;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use image_exporter::error::AppError;
use image_exporter::exporter::{BackgroundBrush, BrushStyle, Destination, ExportConfig, ExportOutput, ImageExporter, Rgba};
use image_exporter::scene::Scene;
use image_exporter::settings;

#[derive(Parser, Debug)]
#[command(
    name = "image-exporter",
    about = "Rasterize a JSON scene into an image file or the clipboard"
)]
struct Args {
    /// Path to the scene description (JSON)
    scene: PathBuf,

    /// Output width in pixels; height follows the scene aspect ratio
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels; width follows the scene aspect ratio
    #[arg(long)]
    height: Option<u32>,

    /// Disable anti-aliasing
    #[arg(long)]
    no_antialias: bool,

    /// Background color as #rrggbb or #rrggbbaa
    #[arg(long)]
    background: Option<Rgba>,

    /// Render onto a fully transparent background
    #[arg(long)]
    transparent: bool,

    /// Invert the brightness of the rendered image
    #[arg(long)]
    invert: bool,

    /// Export configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file, or a directory to receive a timestamped PNG
    #[arg(long, short, conflicts_with = "clipboard")]
    output: Option<PathBuf>,

    /// Copy the image to the system clipboard
    #[arg(long)]
    clipboard: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        log::error!("导出失败: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => settings::load_config(path)?,
        None => ExportConfig::default(),
    };

    let scene = Scene::load(&args.scene)?;
    log::info!("📄 已加载场景: {}（{} 个图元）", args.scene.display(), scene.items.len());

    let brush = BackgroundBrush {
        color: args.background.unwrap_or(Rgba::WHITE),
        style: if args.transparent {
            BrushStyle::NoBrush
        } else {
            BrushStyle::Solid
        },
    };

    let mut exporter = ImageExporter::with_config(scene, brush, config);
    if let Some(width) = args.width {
        exporter.set_width(width);
    }
    if let Some(height) = args.height {
        exporter.set_height(height);
    }
    if args.no_antialias {
        exporter.set_antialias(false);
    }
    exporter.set_invert_value(args.invert);

    let destination = if args.clipboard {
        Destination::Clipboard
    } else if let Some(output) = args.output {
        Destination::File(resolve_output_path(output))
    } else {
        Destination::Prompt
    };
    let target = match &destination {
        Destination::File(path) => Some(path.clone()),
        _ => None,
    };

    match exporter.export(destination)? {
        ExportOutput::DestinationRequested { filters } => {
            println!("未指定输出位置（--output 或 --clipboard），可写格式：");
            for filter in filters {
                println!("  {}", filter);
            }
        }
        ExportOutput::Saved(true) => {
            if let Some(path) = target {
                println!("{}", path.display());
            }
        }
        ExportOutput::Saved(false) => {
            let path = target.map(|p| p.display().to_string()).unwrap_or_default();
            return Err(AppError::Io(io::Error::other(format!("写入文件失败: {}", path))));
        }
        ExportOutput::Copied => println!("已复制到剪贴板"),
        ExportOutput::Buffer(buffer) => {
            log::debug!("收到未投递的缓冲 {}x{}", buffer.width(), buffer.height());
        }
    }

    Ok(())
}

/// 输出路径是目录时，在其中生成带时间戳的文件名。
fn resolve_output_path(output: PathBuf) -> PathBuf {
    if output.is_dir() {
        let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
        output.join(format!("export_{}.png", timestamp))
    } else {
        output
    }
}
