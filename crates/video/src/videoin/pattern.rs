use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::{
        thread,
        time::{Duration, Instant},
    },
};

const DEFAULT_SIZE: Vec2<usize> = Vec2::new(1280, 720);
const DEFAULT_FORMAT: PixelFormat = PixelFormat::Bgra8;
const DEFAULT_FRAME_RATE: f32 = 30.0;

/// What a synthetic device draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern {
    /// every pixel the same RGB color
    Solid([u8; 3]),
    /// red ramps left to right, green top to bottom
    Gradient,
    /// eight vertical color bars
    Bars,
}

/// Synthetic capture device, for running the pipeline without a camera.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// device index; each index rotates the color channels so devices look different
    pub index: usize,
    pub pattern: Pattern,
    pub size: Option<Vec2<usize>>,
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<f32>,
    pub orientation: Orientation,
    pub origin: Origin,
    /// stop after this many frames; further captures fail
    pub limit: Option<u64>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            index: 0,
            pattern: Pattern::Gradient,
            size: None,
            format: None,
            frame_rate: None,
            orientation: Orientation::Portrait,
            origin: Origin::TopLeft,
            limit: None,
        }
    }
}

impl PatternConfig {
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Frames per second. Zero or negative means as fast as possible.
    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn resolved(&self) -> (Vec2<usize>, PixelFormat, f32) {
        (
            self.size.unwrap_or(DEFAULT_SIZE),
            self.format.unwrap_or(DEFAULT_FORMAT),
            self.frame_rate.unwrap_or(DEFAULT_FRAME_RATE),
        )
    }
}

fn pattern_rgb(pattern: Pattern, size: Vec2<usize>, x: usize, y: usize) -> [u8; 3] {
    match pattern {
        Pattern::Solid(rgb) => rgb,
        Pattern::Gradient => {
            let r = (x * 255 / size.x.saturating_sub(1).max(1)) as u8;
            let g = (y * 255 / size.y.saturating_sub(1).max(1)) as u8;
            [r, g, 128]
        }
        Pattern::Bars => {
            const BARS: [[u8; 3]; 8] = [
                [255, 255, 255],
                [255, 255, 0],
                [0, 255, 255],
                [0, 255, 0],
                [255, 0, 255],
                [255, 0, 0],
                [0, 0, 255],
                [0, 0, 0],
            ];
            BARS[(x * 8 / size.x.max(1)).min(7)]
        }
    }
}

/// Render a pattern into a tightly packed buffer of `format`.
pub fn render_pattern(
    pattern: Pattern,
    index: usize,
    size: Vec2<usize>,
    format: PixelFormat,
) -> Result<Image, VideoError> {
    let bytes_per_pixel = match format {
        PixelFormat::Rgb8 => 3,
        PixelFormat::Argb8 | PixelFormat::Bgra8 => 4,
        _ => return Err(VideoError::Unsupported(format)),
    };
    let len = format
        .buffer_len(size)
        .ok_or_else(|| VideoError::Device(format!("pattern size {} too large", size)))?;

    let mut data = Vec::with_capacity(len);
    for y in 0..size.y {
        for x in 0..size.x {
            let mut rgb = pattern_rgb(pattern, size, x, y);
            rgb.rotate_left(index % 3);
            let [r, g, b] = rgb;
            match format {
                PixelFormat::Rgb8 => data.extend_from_slice(&[r, g, b]),
                PixelFormat::Argb8 => data.extend_from_slice(&[0xFF, r, g, b]),
                _ => data.extend_from_slice(&[b, g, r, 0xFF]),
            }
        }
    }
    debug_assert_eq!(data.len(), size.x * size.y * bytes_per_pixel);
    Ok(Image::new(size, data, format))
}

pub(crate) struct PatternDevice {
    config: Option<PatternConfig>,
    image: Option<Image>,
    period: Option<Duration>,
    started: Instant,
    next_due: Instant,
    sequence: u64,
}

impl PatternDevice {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            config: None,
            image: None,
            period: None,
            started: now,
            next_due: now,
            sequence: 0,
        }
    }
}

impl VideoInDevice for PatternDevice {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        #[allow(irrefutable_let_patterns)]
        let config = if let VideoInConfig::Pattern(config) = config {
            config
        } else {
            return Err(VideoError::Device(
                "PatternDevice::open should be called with VideoInConfig::Pattern".to_string(),
            ));
        };

        let (size, format, frame_rate) = config.resolved();
        if size.x == 0 || size.y == 0 {
            return Err(VideoError::Device(format!("invalid pattern size {}", size)));
        }
        self.image = Some(render_pattern(config.pattern, config.index, size, format)?);
        self.period = (frame_rate > 0.0).then(|| Duration::from_secs_f32(1.0 / frame_rate));

        // sequence and clock survive a reopen, like a real sensor's
        self.next_due = Instant::now();

        let resolved = PatternConfig {
            size: Some(size),
            format: Some(format),
            frame_rate: Some(frame_rate),
            ..config.clone()
        };
        self.config = Some(resolved.clone());
        Ok(VideoInConfig::Pattern(resolved))
    }

    fn close(&mut self) {
        self.image.take();
    }

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        let (Some(config), Some(image)) = (self.config.as_ref(), self.image.as_ref()) else {
            return Err(VideoError::Stream("pattern device not open".to_string()));
        };
        if config.limit.is_some_and(|limit| self.sequence >= limit) {
            return Err(VideoError::Stream("pattern frame limit reached".to_string()));
        }
        let (orientation, origin) = (config.orientation, config.origin);
        let image = image.clone();

        if let Some(period) = self.period {
            let now = Instant::now();
            if self.next_due > now {
                thread::sleep(self.next_due - now);
                self.next_due += period;
            } else {
                // running late: don't burst to catch up
                self.next_due = now + period;
            }
        }

        let frame = VideoFrame {
            image,
            timestamp: self.started.elapsed(),
            sequence: self.sequence,
            orientation,
            origin,
        };
        self.sequence += 1;
        Ok(frame)
    }
}
