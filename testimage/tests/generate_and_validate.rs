use image::{ColorType, ImageFormat};
use testimage::{analyze_test_image, create_test_image, inspect_image, TestImageError};

#[test]
fn generated_image_passes_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test-image.png");

    create_test_image(&path, |_| {}).unwrap();
    let analysis = analyze_test_image(&path).unwrap();

    assert_eq!(analysis.dimensions(), (400, 300));
    assert!(analysis.file_size > 100);
    assert_eq!(analysis.format, Some(ImageFormat::Png));
    assert_eq!(analysis.color_type, ColorType::Rgb8);
    // white background, black outlines and text, blue, red, green
    assert_eq!(analysis.unique_colors, Some(5));
}

#[test]
fn regeneration_keeps_dimensions_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    create_test_image(&first, |_| {}).unwrap();
    create_test_image(&second, |_| {}).unwrap();

    let first_pixels = image::open(&first).unwrap().to_rgb8();
    let second_pixels = image::open(&second).unwrap().to_rgb8();
    assert_eq!(first_pixels.dimensions(), second_pixels.dimensions());
    assert_eq!(first_pixels.as_raw(), second_pixels.as_raw());
}

#[test]
fn missing_image_fails_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyze_test_image(&dir.path().join("absent.png")).unwrap_err();
    assert!(matches!(err, TestImageError::Missing(_)));
}

#[test]
fn non_image_file_fails_to_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test-image.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let err = inspect_image(&path).unwrap_err();
    assert!(matches!(err, TestImageError::Image(_)));
}

#[test]
fn wrongly_sized_image_fails_dimension_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.png");
    let noisy = image::RgbImage::from_fn(200, 150, |x, y| {
        image::Rgb([(x * 37 ^ y * 91) as u8, (x * y) as u8, (x + y * 13) as u8])
    });
    noisy.save_with_format(&path, ImageFormat::Png).unwrap();

    let err = analyze_test_image(&path).unwrap_err();
    assert!(matches!(
        err,
        TestImageError::Dimensions {
            width: 200,
            height: 150
        }
    ));
}
