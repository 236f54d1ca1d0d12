use base::Vec2;

// fourcc codes
pub(crate) const FOURCC_RGB8: u32 = u32::from_le_bytes(*b"RGB3");
pub(crate) const FOURCC_ARGB8: u32 = u32::from_le_bytes(*b"BA24");
pub(crate) const FOURCC_BGRA8: u32 = u32::from_le_bytes(*b"AR24");
pub(crate) const FOURCC_YUYV: u32 = u32::from_le_bytes(*b"YUYV");
pub(crate) const FOURCC_YU12: u32 = u32::from_le_bytes(*b"YU12");
pub(crate) const FOURCC_MJPG: u32 = u32::from_le_bytes(*b"MJPG");

/// Convert a fourcc code to a readable 4-character string.
pub fn fourcc_to_string(fourcc: u32) -> String {
    String::from_utf8_lossy(&fourcc.to_le_bytes()).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// `[R, G, B]`
    Rgb8,
    /// `[A, R, G, B]`
    Argb8,
    /// `[B, G, R, A]`, the usual native layout of phone cameras
    Bgra8,
    /// packed 4:2:2, `[Y0, U, Y1, V]` per pixel pair
    Yuyv,
    /// planar 4:2:0, Y plane then U then V, chroma planes `ceil(w/2) x ceil(h/2)`
    Yu12,
    Jpeg,
}

impl PixelFormat {
    pub fn from_fourcc(fourcc: u32) -> Option<Self> {
        match fourcc {
            FOURCC_RGB8 => Some(PixelFormat::Rgb8),
            FOURCC_ARGB8 => Some(PixelFormat::Argb8),
            FOURCC_BGRA8 => Some(PixelFormat::Bgra8),
            FOURCC_YUYV => Some(PixelFormat::Yuyv),
            FOURCC_YU12 => Some(PixelFormat::Yu12),
            FOURCC_MJPG => Some(PixelFormat::Jpeg),
            _ => None,
        }
    }

    pub fn as_fourcc(&self) -> u32 {
        match self {
            PixelFormat::Rgb8 => FOURCC_RGB8,
            PixelFormat::Argb8 => FOURCC_ARGB8,
            PixelFormat::Bgra8 => FOURCC_BGRA8,
            PixelFormat::Yuyv => FOURCC_YUYV,
            PixelFormat::Yu12 => FOURCC_YU12,
            PixelFormat::Jpeg => FOURCC_MJPG,
        }
    }

    /// Bytes per pixel for packed formats.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Rgb8 => Some(3),
            PixelFormat::Argb8 | PixelFormat::Bgra8 => Some(4),
            PixelFormat::Yuyv => Some(2),
            PixelFormat::Yu12 | PixelFormat::Jpeg => None,
        }
    }

    /// Byte length of a tightly packed buffer of this format. `None` for JPEG or on overflow.
    pub fn buffer_len(&self, size: Vec2<usize>) -> Option<usize> {
        let area = size.checked_area()?;
        match self {
            PixelFormat::Yu12 => {
                let chroma = yu12_chroma_size(size).checked_area()?;
                area.checked_add(chroma.checked_mul(2)?)
            }
            PixelFormat::Jpeg => None,
            _ => area.checked_mul(self.bytes_per_pixel()?),
        }
    }
}

/// Size of each chroma plane of a `Yu12` image; odd sizes round up.
pub fn yu12_chroma_size(size: Vec2<usize>) -> Vec2<usize> {
    Vec2::new(size.x.div_ceil(2), size.y.div_ceil(2))
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}
