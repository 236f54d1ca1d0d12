use {image::PixelFormat, std::fmt};

#[derive(Debug)]
pub enum VideoError {
    /// opening or configuring the device failed
    Device(String),
    /// the stream broke while capturing
    Stream(String),
    /// the device can't produce frames in this format
    Unsupported(PixelFormat),
    /// the frame source was already closed
    Closed,
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Device(msg) => write!(f, "video device: {msg}"),
            VideoError::Stream(msg) => write!(f, "video stream: {msg}"),
            VideoError::Unsupported(format) => write!(f, "unsupported pixel format {format:?}"),
            VideoError::Closed => write!(f, "video source closed"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}
