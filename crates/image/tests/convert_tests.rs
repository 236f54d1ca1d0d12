use base::Vec2;
use image::{Image, PixelFormat, argb_to_u32, bgra_to_argb, rgb_to_argb, yu12_to_argb, yuyv_to_argb};

#[test]
fn test_rgb_to_argb() {
    let rgb = vec![255, 0, 0, 0, 0, 255];
    let argb = rgb_to_argb(Vec2::new(2, 1), &rgb);
    assert_eq!(argb, vec![0xFF, 255, 0, 0, 0xFF, 0, 0, 255]);
}

#[test]
fn test_bgra_to_argb_reorders_channels() {
    // B=10 G=20 R=30 A=40
    let bgra = vec![10, 20, 30, 40];
    let argb = bgra_to_argb(Vec2::new(1, 1), &bgra);
    assert_eq!(argb, vec![40, 30, 20, 10]);
}

#[test]
fn test_yuyv_to_argb_gray() {
    // Y=128, U=128, V=128 is mid-gray
    let yuyv = vec![128, 128, 128, 128];
    let argb = yuyv_to_argb(Vec2::new(2, 1), &yuyv);
    assert_eq!(argb, vec![0xFF, 128, 128, 128, 0xFF, 128, 128, 128]);
}

#[test]
fn test_yuyv_to_argb_white_and_black() {
    let yuyv = vec![255, 128, 0, 128];
    let argb = yuyv_to_argb(Vec2::new(2, 1), &yuyv);
    assert_eq!(argb, vec![0xFF, 255, 255, 255, 0xFF, 0, 0, 0]);
}

#[test]
fn test_yu12_to_argb_neutral_chroma() {
    // 2x2 luma, one U and one V sample
    let yu12 = vec![0, 64, 128, 255, 128, 128];
    let argb = yu12_to_argb(Vec2::new(2, 2), &yu12);
    assert_eq!(argb.len(), 16);
    assert_eq!(&argb[4..8], &[0xFF, 64, 64, 64]);
    assert_eq!(&argb[12..16], &[0xFF, 255, 255, 255]);
}

#[test]
fn test_yu12_to_argb_odd_size_uses_last_chroma_column() {
    // 3x3 luma at 128, chroma planes 2x2: the right column and bottom row
    // get their own U/V samples
    let mut yu12 = vec![128; 9];
    yu12.extend_from_slice(&[128, 128, 128, 128]);
    yu12.extend_from_slice(&[128, 255, 128, 255]);
    let argb = yu12_to_argb(Vec2::new(3, 3), &yu12);
    assert_eq!(argb.len(), 3 * 3 * 4);
    assert_eq!(&argb[0..4], &[0xFF, 128, 128, 128]);
    // (2, 0) reads V from chroma column 1, pushing red up
    assert!(argb[2 * 4 + 1] > 200);
    // (1, 0) stays on chroma column 0
    assert_eq!(&argb[4..8], &[0xFF, 128, 128, 128]);
}

#[test]
fn test_converters_stop_at_short_data() {
    assert!(yu12_to_argb(Vec2::new(3, 3), &[0; 16]).is_empty());
    assert_eq!(rgb_to_argb(Vec2::new(usize::MAX, 2), &[1, 2, 3]), vec![0xFF, 1, 2, 3]);
    assert_eq!(bgra_to_argb(Vec2::new(4, 4), &[0; 4]).len(), 4);
}

#[test]
fn test_image_to_argb_dispatch() {
    let image = Image::new(Vec2::new(1, 1), vec![1, 2, 3], PixelFormat::Rgb8);
    let argb = image.to_argb().unwrap();
    assert_eq!(argb.format, PixelFormat::Argb8);
    assert_eq!(argb.data, vec![0xFF, 1, 2, 3]);
}

#[test]
fn test_image_to_argb_rejects_short_buffer() {
    let image = Image::new(Vec2::new(4, 4), vec![0; 8], PixelFormat::Bgra8);
    assert!(image.to_argb().is_err());
}

#[test]
fn test_jpeg_to_argb() {
    let mut jpeg = Vec::new();
    let img = crates_image::RgbImage::from_pixel(16, 8, crates_image::Rgb([200, 200, 200]));
    crates_image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .encode_image(&img)
        .unwrap();

    let image = Image::new(Vec2::new(16, 8), jpeg, PixelFormat::Jpeg);
    let argb = image.to_argb().unwrap();
    assert_eq!(argb.size, Vec2::new(16, 8));
    assert_eq!(argb.data.len(), 16 * 8 * 4);
    assert_eq!(argb.data[0], 0xFF);
    // lossy, but a flat field stays close
    assert!((argb.data[1] as i32 - 200).abs() <= 3);
}

#[test]
fn test_argb_to_u32() {
    let argb = vec![0xFF, 0x12, 0x34, 0x56];
    assert_eq!(argb_to_u32(Vec2::new(1, 1), &argb), vec![0xFF123456]);
}
