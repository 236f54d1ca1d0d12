use {image::Image, std::time::Duration};

/// Physical orientation of the device when the frame was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    /// device rotated counter-clockwise, home button on the right
    LandscapeLeft,
    /// device rotated clockwise, home button on the left
    LandscapeRight,
}

impl Orientation {
    /// Clockwise rotation in quarter turns needed to bring this orientation upright.
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Orientation::Portrait => 0,
            Orientation::LandscapeRight => 1,
            Orientation::PortraitUpsideDown => 2,
            Orientation::LandscapeLeft => 3,
        }
    }
}

/// Where row 0 of the buffer sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    TopLeft,
    BottomLeft,
}

/// One raw sample from the camera stream.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: Image,
    /// time since the stream was opened
    pub timestamp: Duration,
    pub sequence: u64,
    pub orientation: Orientation,
    pub origin: Origin,
}
