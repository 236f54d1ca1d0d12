use {crate::*, base::Vec2};

/// A single image in device-native layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// Byte length implied by size and format. `None` for JPEG or on overflow.
    pub fn expected_len(&self) -> Option<usize> {
        self.format.buffer_len(self.size)
    }

    /// Check that the buffer holds at least as many bytes as size and format
    /// require. JPEG data is only checked when decoded.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.format == PixelFormat::Jpeg {
            return Ok(());
        }
        let expected = self
            .expected_len()
            .ok_or(ImageError::Overflow { size: self.size })?;
        if self.data.len() < expected {
            return Err(ImageError::Size {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    /// Convert this image to packed ARGB8.
    pub fn to_argb(&self) -> Result<Image, ImageError> {
        self.validate()?;
        let data = match self.format {
            PixelFormat::Argb8 => self.data[..self.size.x * self.size.y * 4].to_vec(),
            PixelFormat::Rgb8 => rgb_to_argb(self.size, &self.data),
            PixelFormat::Bgra8 => bgra_to_argb(self.size, &self.data),
            PixelFormat::Yuyv => yuyv_to_argb(self.size, &self.data),
            PixelFormat::Yu12 => yu12_to_argb(self.size, &self.data),
            PixelFormat::Jpeg => return jpeg_to_argb(&self.data),
        };
        Ok(Image::new(self.size, data, PixelFormat::Argb8))
    }
}
