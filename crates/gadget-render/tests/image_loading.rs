//! Loading images from disk.

use gadget_render::{Color, FileImageLoader, ImageLoader, RenderError, Size};
use image::{Rgba, RgbaImage};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gadget_render=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_file_loader_reads_relative_to_base() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("skin")).unwrap();
    let pixels = RgbaImage::from_fn(3, 2, |x, _| {
        if x == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    pixels.save(dir.path().join("skin/bar.png")).unwrap();

    let loader = FileImageLoader::new(dir.path());
    let image = loader.load("skin/bar.png", false).unwrap();
    assert_eq!(image.size(), Size::new(3.0, 2.0));
    assert_eq!(image.tag(), "skin/bar.png");
    assert_eq!(image.point_value(0.5, 0.5), Some(Color::BLACK));
    assert_eq!(image.point_value(2.5, 1.5), Some(Color::BLUE));

    let mask = loader.load("skin/bar.png", true).unwrap();
    assert_eq!(mask.point_value(0.5, 0.5).map(|c| c.a), Some(0.0));
    assert_eq!(mask.point_value(1.5, 0.5).map(|c| c.a), Some(1.0));
}

#[test]
fn test_file_loader_errors() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"definitely not a png").unwrap();
    let loader = FileImageLoader::new(dir.path());

    match loader.load("absent.png", false) {
        Err(RenderError::ImageLoad { path, .. }) => assert_eq!(path, dir.path().join("absent.png")),
        other => panic!("expected load error, got {other:?}"),
    }
    assert!(matches!(
        loader.load("broken.png", false),
        Err(RenderError::ImageDecode { .. })
    ));
}
