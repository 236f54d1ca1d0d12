//! Frame preprocessing and image classification for glance.

mod affine;
pub use affine::*;

mod classifier;
pub use classifier::*;

mod error;
pub use error::*;

mod inference;
pub use inference::*;

mod labels;
pub use labels::*;

mod normalization;
pub use normalization::*;

mod preprocess;
pub use preprocess::*;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::*;
