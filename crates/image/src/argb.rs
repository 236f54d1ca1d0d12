use {crate::*, base::Vec2};

// pixels a converter can produce: what `size` asks for, capped by what `data` holds
fn pixel_count(size: Vec2<usize>, data: &[u8], bytes_per_pixel: usize) -> usize {
    size.checked_area()
        .unwrap_or(usize::MAX)
        .min(data.len() / bytes_per_pixel)
}

pub fn rgb_to_argb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let pixel_count = pixel_count(size, data, 3);
    let mut argb = Vec::with_capacity(pixel_count * 4);
    for chunk in data.chunks_exact(3).take(pixel_count) {
        argb.extend_from_slice(&[0xFF, chunk[0], chunk[1], chunk[2]]);
    }
    argb
}

pub fn bgra_to_argb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let pixel_count = pixel_count(size, data, 4);
    let mut argb = Vec::with_capacity(pixel_count * 4);
    for chunk in data.chunks_exact(4).take(pixel_count) {
        argb.extend_from_slice(&[chunk[3], chunk[2], chunk[1], chunk[0]]);
    }
    argb
}

pub fn yuyv_to_argb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let pair_count = pixel_count(size, data, 2) / 2;
    let mut argb = Vec::with_capacity(pair_count * 8);
    for chunk in data.chunks_exact(4).take(pair_count) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        argb.extend_from_slice(&[0xFF, r0, g0, b0, 0xFF, r1, g1, b1]);
    }
    argb
}

/// Planar 4:2:0 to ARGB8. Returns an empty buffer when `data` is shorter than
/// `size` requires.
pub fn yu12_to_argb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let Some(total) = PixelFormat::Yu12.buffer_len(size) else {
        return Vec::new();
    };
    if data.len() < total {
        return Vec::new();
    }
    let width = size.x;
    let y_len = width * size.y;
    let chroma = yu12_chroma_size(size);
    let uv_len = chroma.x * chroma.y;

    let y_plane = &data[..y_len];
    let u_plane = &data[y_len..y_len + uv_len];
    let v_plane = &data[y_len + uv_len..total];

    let mut argb = Vec::with_capacity(y_len * 4);
    for row in 0..size.y {
        for col in 0..width {
            let y = y_plane[row * width + col];
            let uv = (row / 2) * chroma.x + col / 2;
            let (r, g, b) = yuv_to_rgb(y, u_plane[uv], v_plane[uv]);
            argb.extend_from_slice(&[0xFF, r, g, b]);
        }
    }
    argb
}

/// Decode a JPEG (or any format the `image` crate recognizes) into ARGB8.
pub fn jpeg_to_argb(data: &[u8]) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory(data)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut argb = Vec::with_capacity(rgba.as_raw().len());
    for chunk in rgba.as_raw().chunks_exact(4) {
        argb.extend_from_slice(&[chunk[3], chunk[0], chunk[1], chunk[2]]);
    }
    Ok(Image::new(
        Vec2::new(width as usize, height as usize),
        argb,
        PixelFormat::Argb8,
    ))
}
