use base::Vec2;

/// Pack ARGB8 bytes into `0xAARRGGBB` words, the layout window framebuffers take.
pub fn argb_to_u32(size: Vec2<usize>, data: &[u8]) -> Vec<u32> {
    data.chunks_exact(4)
        .take(size.x * size.y)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
