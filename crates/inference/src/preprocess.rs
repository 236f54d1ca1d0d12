use {
    crate::*,
    base::{Tensor, Vec2},
    image::{Image, PixelFormat},
    video::{Orientation, Origin, VideoFrame},
};

/// Side length of the square input most ImageNet classifiers take.
pub const MODEL_INPUT_SIZE: usize = 224;

const DEFAULT_ROW_ALIGNMENT: usize = 64;

/// How the preprocessor decides which way is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationPolicy {
    /// Treat every frame as if captured in this orientation, whatever its
    /// metadata says.
    Fixed(Orientation),
    /// Rotate each frame upright according to its own metadata.
    FromFrame,
}

impl Default for OrientationPolicy {
    fn default() -> Self {
        OrientationPolicy::Fixed(Orientation::Portrait)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    /// output size; the frame is stretched to it without keeping the aspect ratio
    pub size: Vec2<usize>,
    pub orientation: OrientationPolicy,
    /// rows of the output buffer start on multiples of this many bytes
    pub row_alignment: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE),
            orientation: OrientationPolicy::default(),
            row_alignment: DEFAULT_ROW_ALIGNMENT,
        }
    }
}

impl PreprocessConfig {
    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = size;
        self
    }

    pub fn with_orientation(mut self, orientation: OrientationPolicy) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_row_alignment(mut self, row_alignment: usize) -> Self {
        self.row_alignment = row_alignment;
        self
    }
}

/// Model-ready image: ARGB8 with the alpha byte first and ignored (always
/// 0xFF), top-left origin, rows `bytes_per_row` apart.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    pub size: Vec2<usize>,
    pub bytes_per_row: usize,
    pub data: Vec<u8>,
}

impl PreparedImage {
    pub fn format(&self) -> PixelFormat {
        PixelFormat::Argb8
    }

    /// The visible pixels of row `y`, without stride padding.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.bytes_per_row;
        &self.data[start..start + self.size.x * 4]
    }

    /// `[a, r, g, b]` at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = y * self.bytes_per_row + x * 4;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }

    /// Tightly packed copy, e.g. for display.
    pub fn to_image(&self) -> Image {
        let mut data = Vec::with_capacity(self.size.x * self.size.y * 4);
        for y in 0..self.size.y {
            data.extend_from_slice(self.row(y));
        }
        Image::new(self.size, data, PixelFormat::Argb8)
    }

    /// NCHW `[1, 3, H, W]` float tensor with alpha dropped and `normalization` applied.
    pub fn to_nchw(&self, normalization: &Normalization) -> Result<Tensor<f32>, InferError> {
        let (width, height) = (self.size.x, self.size.y);
        let plane = width * height;
        let mut data = vec![0.0f32; 3 * plane];
        for y in 0..height {
            let row = self.row(y);
            for x in 0..width {
                let argb = &row[x * 4..x * 4 + 4];
                for channel in 0..3 {
                    data[channel * plane + y * width + x] =
                        normalization.apply(channel, argb[channel + 1]);
                }
            }
        }
        Ok(Tensor::new(vec![1, 3, height, width], data)?)
    }
}

/// Turns raw camera frames into fixed-size model input.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

fn align_up(value: usize, alignment: usize) -> Option<usize> {
    if alignment <= 1 {
        return Some(value);
    }
    value
        .checked_add(alignment - 1)
        .map(|value| value / alignment * alignment)
}

// sample channel `channel` of a packed ARGB8 image at fractional pixel index (x, y)
fn sample_bilinear(image: &Image, x: f32, y: f32, channel: usize) -> f32 {
    let (width, height) = (image.size.x, image.size.y);
    let x = x.clamp(0.0, (width - 1) as f32);
    let y = y.clamp(0.0, (height - 1) as f32);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let at = |px: usize, py: usize| image.data[(py * width + px) * 4 + channel] as f32;
    let top = at(x0, y0) + (at(x1, y0) - at(x0, y0)) * fx;
    let bottom = at(x0, y1) + (at(x1, y1) - at(x0, y1)) * fx;
    top + (bottom - top) * fy
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Stride and total length of the output buffer, `None` if they don't fit in memory.
    fn layout(&self) -> Option<(usize, usize)> {
        let size = self.config.size;
        if size.x == 0 || size.y == 0 {
            return None;
        }
        let bytes_per_row = align_up(size.x.checked_mul(4)?, self.config.row_alignment)?;
        let len = bytes_per_row.checked_mul(size.y)?;
        Some((bytes_per_row, len))
    }

    /// Quarter turns that bring `frame` upright under the configured policy.
    pub fn quarter_turns(&self, frame: &VideoFrame) -> u8 {
        match self.config.orientation {
            OrientationPolicy::Fixed(orientation) => orientation.quarter_turns(),
            OrientationPolicy::FromFrame => frame.orientation.quarter_turns(),
        }
    }

    /// Maps pixel space of a `source`-sized decoded buffer to output pixel space.
    ///
    /// `source` is the size after decoding, which for compressed frames need
    /// not match the size the frame declares.
    pub fn transform(&self, source: Vec2<usize>, frame: &VideoFrame) -> Affine {
        let (width, height) = (source.x as f32, source.y as f32);
        let turns = self.quarter_turns(frame);

        let mut transform = match frame.origin {
            Origin::TopLeft => Affine::IDENTITY,
            Origin::BottomLeft => Affine::flip_vertical(height),
        };
        transform = transform.then(Affine::quarter_turns(turns, width, height));

        let upright = if turns % 2 == 1 {
            source.transposed()
        } else {
            source
        };
        let target = self.config.size;
        transform.then(Affine::scale(
            target.x as f32 / upright.x as f32,
            target.y as f32 / upright.y as f32,
        ))
    }

    /// Stretch `frame` to the configured size.
    ///
    /// Returns `None` when the output buffer can't be allocated or the frame
    /// can't be decoded; the caller skips the frame. The frame is not modified,
    /// and the same frame always produces the same bytes.
    pub fn prepare(&self, frame: &VideoFrame) -> Option<PreparedImage> {
        let Some((bytes_per_row, len)) = self.layout() else {
            log::warn!(
                "preprocess: cannot lay out a {} output buffer",
                self.config.size
            );
            return None;
        };
        if frame.image.size.x == 0 || frame.image.size.y == 0 {
            log::warn!("preprocess: empty frame {}", frame.sequence);
            return None;
        }

        let mut data = Vec::new();
        if let Err(error) = data.try_reserve_exact(len) {
            log::warn!("preprocess: cannot allocate {} bytes: {}", len, error);
            return None;
        }
        data.resize(len, 0u8);

        let source = match frame.image.to_argb() {
            Ok(source) => source,
            Err(error) => {
                log::warn!("preprocess: frame {} not converted: {}", frame.sequence, error);
                return None;
            }
        };
        let converted_len = source.size.checked_area().and_then(|area| area.checked_mul(4));
        if source.size.x == 0
            || source.size.y == 0
            || converted_len.is_none_or(|len| source.data.len() < len)
        {
            log::warn!("preprocess: frame {} converted short", frame.sequence);
            return None;
        }
        if source.size != frame.image.size {
            log::debug!(
                "preprocess: frame {} declared {} but decoded {}",
                frame.sequence,
                frame.image.size,
                source.size
            );
        }
        let inverse = self.transform(source.size, frame).invert()?;

        let size = self.config.size;
        for y in 0..size.y {
            let row = &mut data[y * bytes_per_row..y * bytes_per_row + size.x * 4];
            for x in 0..size.x {
                // sample at pixel centers
                let (sx, sy) = inverse.apply(x as f32 + 0.5, y as f32 + 0.5);
                let pixel = &mut row[x * 4..x * 4 + 4];
                pixel[0] = 0xFF;
                for channel in 1..4 {
                    let value = sample_bilinear(&source, sx - 0.5, sy - 0.5, channel);
                    pixel[channel] = (value + 0.5).clamp(0.0, 255.0) as u8;
                }
            }
        }

        Some(PreparedImage {
            size,
            bytes_per_row,
            data,
        })
    }
}
