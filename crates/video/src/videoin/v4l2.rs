use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::{path::PathBuf, time::Duration},
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

const BUFFER_COUNT: u32 = 4;

#[derive(Debug, Clone, Default)]
pub struct V4l2Config {
    /// device node, `/dev/video0` when unset
    pub path: Option<PathBuf>,
    pub size: Option<Vec2<usize>>,
    /// `Yuyv` or `Jpeg`
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<f32>,
    /// how the camera is mounted; webcams don't report this
    pub orientation: Orientation,
}

impl V4l2Config {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn resolved(&self) -> (Vec2<usize>, PixelFormat, f32) {
        (
            self.size.unwrap_or_default(),
            self.format.unwrap_or(PixelFormat::Yuyv),
            self.frame_rate.unwrap_or(0.0),
        )
    }
}

pub(crate) struct V4l2 {
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    format: PixelFormat,
    orientation: Orientation,
}

impl V4l2 {
    pub fn new() -> Self {
        Self {
            stream: None,
            size: Vec2::new(0, 0),
            format: PixelFormat::Yuyv,
            orientation: Orientation::Portrait,
        }
    }
}

impl VideoInDevice for V4l2 {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        self.stream.take();

        let VideoInConfig::V4l2(config) = config else {
            return Err(VideoError::Device(
                "V4l2::open should be called with VideoInConfig::V4l2".to_string(),
            ));
        };

        let device = match &config.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };
        let device_format = Capture::format(&device)?;

        let desired_size = config.size.unwrap_or(Vec2::new(
            device_format.width as usize,
            device_format.height as usize,
        ));
        let desired_fourcc = match config.format {
            Some(PixelFormat::Yuyv) => FourCC::new(b"YUYV"),
            Some(PixelFormat::Jpeg) => FourCC::new(b"MJPG"),
            Some(other) => return Err(VideoError::Unsupported(other)),
            None => device_format.fourcc,
        };

        // the driver may adjust both size and format
        let actual_format = Capture::set_format(
            &device,
            &Format::new(desired_size.x as u32, desired_size.y as u32, desired_fourcc),
        )?;
        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = match &actual_format.fourcc.repr {
            b"YUYV" => PixelFormat::Yuyv,
            b"MJPG" => PixelFormat::Jpeg,
            _ => {
                return Err(VideoError::Device(format!(
                    "unsupported pixel format: {}",
                    actual_format.fourcc
                )));
            }
        };

        let desired_frame_rate = match config.frame_rate {
            Some(frame_rate) => frame_rate,
            None => {
                let params = Capture::params(&device)?;
                params.interval.denominator as f32 / params.interval.numerator as f32
            }
        };
        let actual_params = Capture::set_params(
            &device,
            &v4l::video::capture::Parameters::with_fps(desired_frame_rate as u32),
        )?;
        let frame_rate =
            actual_params.interval.denominator as f32 / actual_params.interval.numerator as f32;

        self.orientation = config.orientation;
        self.stream = Some(
            MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
                .map_err(|error| VideoError::Stream(error.to_string()))?,
        );

        Ok(VideoInConfig::V4l2(V4l2Config {
            path: config.path.clone(),
            size: Some(self.size),
            format: Some(self.format),
            frame_rate: Some(frame_rate),
            orientation: config.orientation,
        }))
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(VideoError::Stream("no stream".to_string()));
        };
        let (data, metadata) =
            CaptureStream::next(stream).map_err(|error| VideoError::Stream(error.to_string()))?;
        // some drivers leave bytesused at zero
        let used = match metadata.bytesused as usize {
            0 => data.len(),
            n => n.min(data.len()),
        };
        let timestamp = Duration::from_secs(metadata.timestamp.sec.max(0) as u64)
            + Duration::from_micros(metadata.timestamp.usec.max(0) as u64);
        Ok(VideoFrame {
            image: Image::new(self.size, data[..used].to_vec(), self.format),
            timestamp,
            sequence: metadata.sequence as u64,
            orientation: self.orientation,
            origin: Origin::TopLeft,
        })
    }
}
