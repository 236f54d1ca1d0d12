use {base::Vec2, std::fmt};

#[derive(Debug)]
pub enum ImageError {
    /// a compressed frame could not be decoded
    Decode(String),
    /// the buffer is shorter than its size and format require
    Size { expected: usize, got: usize },
    /// the buffer for this size would not fit in memory
    Overflow { size: Vec2<usize> },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Decode(msg) => write!(f, "cannot decode frame: {msg}"),
            ImageError::Size { expected, got } => {
                write!(f, "frame buffer too short: {got} bytes, {expected} needed")
            }
            ImageError::Overflow { size } => write!(f, "frame size {size} overflows"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}
