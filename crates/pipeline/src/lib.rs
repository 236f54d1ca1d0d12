//! Wires a frame source, the preprocessor and a classifier together and
//! hands the resulting labels to the UI.

mod config;
pub use config::*;

mod dispatch;
pub use dispatch::*;

mod error;
pub use error::*;

mod pipeline;
pub use pipeline::*;
