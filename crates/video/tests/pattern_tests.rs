use {
    base::Vec2,
    image::PixelFormat,
    video::{Orientation, Pattern, VideoError, render_pattern},
};

#[test]
fn test_render_solid_bgra() {
    let image = render_pattern(Pattern::Solid([1, 2, 3]), 0, Vec2::new(3, 2), PixelFormat::Bgra8)
        .unwrap();
    assert_eq!(image.data.len(), 3 * 2 * 4);
    assert!(image.data.chunks_exact(4).all(|px| px == [3, 2, 1, 0xFF]));
}

#[test]
fn test_render_gradient_corners() {
    let image =
        render_pattern(Pattern::Gradient, 0, Vec2::new(5, 5), PixelFormat::Rgb8).unwrap();
    assert_eq!(&image.data[..3], &[0, 0, 128]);
    let last = image.data.len() - 3;
    assert_eq!(&image.data[last..], &[255, 255, 128]);
}

#[test]
fn test_render_bars_first_and_last() {
    let image = render_pattern(Pattern::Bars, 0, Vec2::new(16, 1), PixelFormat::Argb8).unwrap();
    assert_eq!(&image.data[..4], &[0xFF, 255, 255, 255]);
    assert_eq!(&image.data[60..64], &[0xFF, 0, 0, 0]);
}

#[test]
fn test_render_rejects_planar_format() {
    let result = render_pattern(Pattern::Bars, 0, Vec2::new(4, 4), PixelFormat::Yu12);
    assert!(matches!(result, Err(VideoError::Unsupported(PixelFormat::Yu12))));
}

#[test]
fn test_orientation_quarter_turns() {
    assert_eq!(Orientation::Portrait.quarter_turns(), 0);
    assert_eq!(Orientation::LandscapeRight.quarter_turns(), 1);
    assert_eq!(Orientation::PortraitUpsideDown.quarter_turns(), 2);
    assert_eq!(Orientation::LandscapeLeft.quarter_turns(), 3);
}
