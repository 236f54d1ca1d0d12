//! Live frame capture for glance.
//!
//! `VideoIn` drives a capture device on its own thread and hands frames to a
//! single serial worker. Frames that arrive while the worker is still busy
//! are dropped, never queued.

mod error;
pub use error::*;

mod videoframe;
pub use videoframe::*;

mod videoin;
pub use videoin::*;
