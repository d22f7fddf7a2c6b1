// End-to-end export sessions driven by the built-in scene renderer
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use image_exporter::exporter::{
    BackgroundBrush, Destination, ExportError, ExportOutput, ImageExporter, PixelBuffer, Rect, Rgba,
};
use image_exporter::scene::{Point, RasterSource, Scene, SceneItem};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos));
    fs::create_dir_all(&dir).expect("create temp dir failed");
    dir
}

fn empty_scene(width: f64, height: f64) -> Scene {
    Scene::new(Rect::new(0.0, 0.0, width, height))
}

fn export_bytes(exporter: &mut ImageExporter<Scene>) -> PixelBuffer {
    match exporter.export(Destination::Bytes).expect("export should succeed") {
        ExportOutput::Buffer(buffer) => buffer,
        other => panic!("expected raw buffer, got {:?}", other),
    }
}

#[test]
fn width_edit_scenario_scales_output_and_strokes() {
    let scene = empty_scene(100.0, 50.0).with_item(SceneItem::Line {
        from: Point { x: 0.0, y: 25.0 },
        to: Point { x: 100.0, y: 25.0 },
        width: 2.0,
        color: Rgba::BLACK,
    });
    let mut exporter = ImageExporter::new(scene, BackgroundBrush::solid(Rgba::WHITE));
    exporter.set_antialias(false);

    assert_eq!(exporter.parameters().width(), 100);
    assert_eq!(exporter.parameters().height(), 50);

    exporter.set_width(200);
    assert_eq!(exporter.parameters().height(), 100);
    assert_eq!(exporter.scale_factor().get(), 2.0);

    let buffer = export_bytes(&mut exporter);
    assert_eq!((buffer.width(), buffer.height()), (200, 100));

    let dark_rows = (0..buffer.height())
        .filter(|&y| buffer.pixel(100, y) == Some(Rgba::BLACK))
        .count();
    assert_eq!(dark_rows, 4, "2px cosmetic line at scale 2.0 should cover 4 rows");
    assert!(exporter.renderer().export_mode().is_none());
}

#[test]
fn repeated_edits_keep_nominal_width() {
    let mut exporter = ImageExporter::new(empty_scene(100.0, 50.0), BackgroundBrush::solid(Rgba::WHITE));

    exporter.set_width(300);
    exporter.set_height(25);
    exporter.set_width(400);

    assert_eq!(exporter.nominal_width(), 100.0);
    assert_eq!(exporter.parameters().height(), 200);
    assert_eq!(exporter.scale_factor().get(), 4.0);
}

#[test]
fn zero_width_or_height_is_rejected() {
    let mut exporter = ImageExporter::new(empty_scene(100.0, 50.0), BackgroundBrush::solid(Rgba::WHITE));
    exporter.set_width(1);

    // round(1 * 0.5) rounds away from zero, so force a zero height explicitly
    exporter.set_height(0);
    let err = exporter.export(Destination::Bytes).expect_err("zero size must fail");
    assert!(matches!(err, ExportError::InvalidDimension { height: 0, .. }));
    assert!(err.to_string().contains("0x0"));

    let mut exporter = ImageExporter::new(empty_scene(0.4, 10.0), BackgroundBrush::solid(Rgba::WHITE));
    let err = exporter.export(Destination::Bytes).expect_err("natural width truncates to zero");
    assert!(matches!(err, ExportError::InvalidDimension { width: 0, height: 10 }));
}

#[test]
fn transparent_background_keeps_color_with_zero_alpha() {
    let mut exporter = ImageExporter::new(
        empty_scene(6.0, 4.0),
        BackgroundBrush::none(Rgba::new(10, 20, 30, 255)),
    );

    let buffer = export_bytes(&mut exporter);

    assert!(buffer.pixels().all(|p| p == Rgba::new(10, 20, 30, 0)));
}

#[test]
fn shapes_composite_over_transparent_background() {
    let scene = empty_scene(4.0, 4.0).with_item(SceneItem::Rect {
        rect: Rect::new(0.0, 0.0, 2.0, 4.0),
        color: Rgba::new(255, 0, 0, 255),
    });
    let mut exporter = ImageExporter::new(scene, BackgroundBrush::none(Rgba::WHITE));

    let buffer = export_bytes(&mut exporter);

    assert_eq!(buffer.pixel(0, 0), Some(Rgba::new(255, 0, 0, 255)));
    assert_eq!(buffer.pixel(3, 3).map(|p| p.a), Some(0));
}

#[test]
fn invert_value_applies_to_rendered_pixels() {
    let scene = empty_scene(2.0, 2.0).with_item(SceneItem::Rect {
        rect: Rect::new(0.0, 0.0, 2.0, 2.0),
        color: Rgba::new(10, 20, 30, 255),
    });
    let mut exporter = ImageExporter::new(scene, BackgroundBrush::solid(Rgba::WHITE));
    exporter.set_invert_value(true);

    let buffer = export_bytes(&mut exporter);

    assert!(buffer.pixels().all(|p| p == Rgba::new(225, 235, 245, 255)));
}

#[test]
fn file_export_writes_decodable_png() {
    let dir = unique_temp_dir("exporter_pipeline_png");
    let path = dir.join("scene.png");
    let scene = empty_scene(10.0, 5.0).with_item(SceneItem::Rect {
        rect: Rect::new(0.0, 0.0, 5.0, 5.0),
        color: Rgba::BLACK,
    });
    let mut exporter = ImageExporter::new(scene, BackgroundBrush::solid(Rgba::WHITE));
    exporter.set_width(20);

    let output = exporter
        .export(Destination::File(path.clone()))
        .expect("export should succeed");

    assert_eq!(output, ExportOutput::Saved(true));
    let decoded = image::open(&path).expect("decode exported png").to_rgba8();
    assert_eq!(decoded.dimensions(), (20, 10));
    assert_eq!(decoded.get_pixel(2, 2).0, [0, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(17, 2).0, [255, 255, 255, 255]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unwritable_path_reports_false_not_error() {
    let dir = unique_temp_dir("exporter_pipeline_unwritable");
    let path = dir.join("missing").join("deeper").join("scene.png");
    let mut exporter = ImageExporter::new(empty_scene(4.0, 4.0), BackgroundBrush::solid(Rgba::WHITE));

    let output = exporter
        .export(Destination::File(path))
        .expect("codec failure must not be an error");

    assert_eq!(output, ExportOutput::Saved(false));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn render_failure_leaves_session_usable() {
    let scene = empty_scene(4.0, 4.0).with_item(SceneItem::Image {
        rect: Rect::new(0.0, 0.0, 4.0, 4.0),
        source: RasterSource::Path(PathBuf::from("/definitely/not/here.png")),
    });
    let mut exporter = ImageExporter::new(scene, BackgroundBrush::solid(Rgba::WHITE));

    let err = exporter.export(Destination::Bytes).expect_err("missing raster must fail");
    assert!(matches!(err, ExportError::Render(_)));
    assert!(exporter.renderer().export_mode().is_none());

    let mut scene = exporter.into_renderer();
    scene.items.clear();
    let mut exporter = ImageExporter::new(scene, BackgroundBrush::solid(Rgba::WHITE));
    assert_eq!(export_bytes(&mut exporter).width(), 4);
}

#[test]
fn prompt_lists_preferred_formats_first() {
    let mut exporter = ImageExporter::new(empty_scene(4.0, 4.0), BackgroundBrush::solid(Rgba::WHITE));

    let output = exporter.export(Destination::Prompt).expect("prompt never fails");

    let ExportOutput::DestinationRequested { filters } = output else {
        panic!("expected destination request");
    };
    assert_eq!(&filters[..3], &["*.png", "*.tif", "*.jpg"]);
}
