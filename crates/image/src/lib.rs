//! Raw camera images and pixel-format conversion for glance.
//!
//! Every format a capture device can hand us is converted to packed ARGB8
//! (`[A, R, G, B]` per pixel) before any further processing.

mod argb;
pub use argb::*;

mod error;
pub use error::*;

mod image;
pub use image::*;

mod pixelformat;
pub use pixelformat::*;

mod display;
pub use display::*;
