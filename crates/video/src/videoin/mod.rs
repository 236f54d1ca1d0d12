use {
    crate::*,
    base::Vec2,
    image::PixelFormat,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicU64, Ordering},
        },
        thread,
        time::Duration,
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
};

mod pattern;
pub use pattern::*;

#[cfg(feature = "v4l2")]
mod v4l2;
#[cfg(feature = "v4l2")]
pub use v4l2::*;

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

// how often a stopped capture thread checks for start or cancel
const PAUSED_POLL_MS: u64 = 10;

#[derive(Debug, Clone)]
pub enum VideoInConfig {
    Pattern(PatternConfig),
    #[cfg(feature = "v4l2")]
    V4l2(V4l2Config),
}

impl VideoInConfig {
    /// Size, pixel format and frame rate, with defaults for anything unresolved.
    pub fn resolved(&self) -> (Vec2<usize>, PixelFormat, f32) {
        match self {
            VideoInConfig::Pattern(config) => config.resolved(),
            #[cfg(feature = "v4l2")]
            VideoInConfig::V4l2(config) => config.resolved(),
        }
    }
}

impl Default for VideoInConfig {
    fn default() -> Self {
        #[cfg(feature = "v4l2")]
        return VideoInConfig::V4l2(V4l2Config::default());
        #[cfg(not(feature = "v4l2"))]
        return VideoInConfig::Pattern(PatternConfig::default());
    }
}

/// A capture session: something that produces frames on demand.
///
/// `open` and `blocking_capture` always run on the same OS thread.
pub trait VideoInDevice: Send {
    /// Open the device, returning the config that was actually applied.
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError>;
    /// Close the device, if open.
    fn close(&mut self);
    /// Block until the next frame is available.
    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError>;
}

/// Receives frames on the delivery worker, one at a time.
pub trait FrameHandler: Send + 'static {
    fn handle(&mut self, frame: VideoFrame);
}

impl<F> FrameHandler for F
where
    F: FnMut(VideoFrame) + Send + 'static,
{
    fn handle(&mut self, frame: VideoFrame) {
        self(frame)
    }
}

/// Admission control between the capture thread and the delivery worker.
///
/// At most one frame is admitted at a time. A frame offered while another is
/// still being handled is rejected and counted as dropped.
#[derive(Debug, Default)]
pub struct DropLateGate {
    busy: AtomicBool,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl DropLateGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the worker for a new frame. `false` means the frame must be discarded.
    pub fn try_enter(&self) -> bool {
        if self.busy.swap(true, Ordering::AcqRel) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        } else {
            true
        }
    }

    /// The admitted frame has been handled.
    pub fn leave(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        self.busy.store(false, Ordering::Release);
    }

    /// The admitted frame never reached the worker.
    pub fn abandon(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        self.busy.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Frame source.
///
/// A capture thread pumps the device and offers each frame to the delivery
/// worker through a `DropLateGate`. The worker calls the `FrameHandler`
/// serially, so handling is never concurrent and a slow handler lowers the
/// delivered frame rate instead of building a backlog.
pub struct VideoIn {
    sender: Option<mpsc::Sender<VideoFrame>>,
    gate: Arc<DropLateGate>,
    cancel: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    size: Vec2<usize>,
    format: PixelFormat,
    frame_rate: f32,
    capture: Option<JoinHandle<()>>,
    delivery: Option<thread::JoinHandle<()>>,
}

impl VideoIn {
    fn create_device(config: &VideoInConfig) -> Box<dyn VideoInDevice> {
        match config {
            VideoInConfig::Pattern(_) => Box::new(PatternDevice::new()),
            #[cfg(feature = "v4l2")]
            VideoInConfig::V4l2(_) => Box::new(V4l2::new()),
        }
    }

    fn spawn_delivery(
        mut receiver: mpsc::Receiver<VideoFrame>,
        gate: Arc<DropLateGate>,
        mut handler: impl FrameHandler,
    ) -> Result<thread::JoinHandle<()>, VideoError> {
        let handle = thread::Builder::new()
            .name("frame-delivery".to_string())
            .spawn(move || {
                while let Some(frame) = receiver.blocking_recv() {
                    handler.handle(frame);
                    gate.leave();
                }
                log::debug!("frame delivery: channel closed, worker exiting");
            })?;
        Ok(handle)
    }

    async fn spawn_capture(
        mut device: Box<dyn VideoInDevice>,
        config: VideoInConfig,
        sender: mpsc::Sender<VideoFrame>,
        gate: Arc<DropLateGate>,
        cancel: Arc<AtomicBool>,
        running: Arc<AtomicBool>,
    ) -> Result<(JoinHandle<()>, VideoInConfig), VideoError> {
        // device.open() must run on the same OS thread as blocking_capture(),
        // so the resolved config comes back over a oneshot
        let (init_tx, init_rx) = oneshot::channel::<Result<VideoInConfig, VideoError>>();

        let join_handle = spawn_blocking(move || {
            let mut config = match device.open(&config) {
                Ok(config) => {
                    let _ = init_tx.send(Ok(config.clone()));
                    config
                }
                Err(error) => {
                    let _ = init_tx.send(Err(error));
                    return;
                }
            };

            while !cancel.load(Ordering::Relaxed) {
                log::info!("video capture: starting capture loop");
                while !cancel.load(Ordering::Relaxed) {
                    if !running.load(Ordering::Relaxed) {
                        thread::sleep(Duration::from_millis(PAUSED_POLL_MS));
                        continue;
                    }
                    let frame = match device.blocking_capture() {
                        Ok(frame) => frame,
                        Err(error) => {
                            log::error!("video capture: capture failed: {}", error);
                            break;
                        }
                    };
                    if !gate.try_enter() {
                        log::trace!("video capture: worker busy, dropping frame {}", frame.sequence);
                        continue;
                    }
                    match sender.try_send(frame) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(frame)) => {
                            gate.abandon();
                            log::warn!("video capture: delivery slot full, dropping frame {}", frame.sequence);
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            gate.abandon();
                            log::error!("video capture: delivery worker gone, stopping");
                            device.close();
                            return;
                        }
                    }
                }

                // close, wait, and reopen the device
                while !cancel.load(Ordering::Relaxed) {
                    log::info!("video capture: reconnecting...");
                    device.close();
                    thread::sleep(Duration::from_millis(WAIT_BEFORE_RECONNECT_MS));
                    if let Ok(new_config) = device.open(&config) {
                        config = new_config;
                        break;
                    }
                }
            }
            device.close();
        });

        let config = init_rx
            .await
            .map_err(|_| VideoError::Device("capture thread died during init".to_string()))??;

        Ok((join_handle, config))
    }

    /// Open the device described by `config` (or the platform default) and
    /// start delivering frames to `handler`.
    pub async fn open(
        config: Option<VideoInConfig>,
        handler: impl FrameHandler,
    ) -> Result<Self, VideoError> {
        let config = config.unwrap_or_default();
        let device = Self::create_device(&config);
        Self::with_device(device, config, handler).await
    }

    /// Like `open`, with a caller-supplied device.
    pub async fn with_device(
        device: Box<dyn VideoInDevice>,
        config: VideoInConfig,
        handler: impl FrameHandler,
    ) -> Result<Self, VideoError> {
        // one slot: the gate guarantees it is empty whenever a frame is admitted
        let (sender, receiver) = mpsc::channel::<VideoFrame>(1);
        let gate = Arc::new(DropLateGate::new());
        let cancel = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        let delivery = Self::spawn_delivery(receiver, Arc::clone(&gate), handler)?;

        let (capture, config) = Self::spawn_capture(
            device,
            config,
            sender.clone(),
            Arc::clone(&gate),
            Arc::clone(&cancel),
            Arc::clone(&running),
        )
        .await?;

        let (size, format, frame_rate) = config.resolved();
        log::info!(
            "video in: {} {:?} at {:.1} fps",
            size,
            format,
            frame_rate
        );

        Ok(Self {
            sender: Some(sender),
            gate,
            cancel,
            running,
            size,
            format,
            frame_rate,
            capture: Some(capture),
            delivery: Some(delivery),
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Resume capturing.
    pub fn start(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    /// Pause capturing. Frames already admitted still finish.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Frames handed to the handler so far.
    pub fn delivered(&self) -> u64 {
        self.gate.delivered()
    }

    /// Frames discarded because the handler was still busy.
    pub fn dropped(&self) -> u64 {
        self.gate.dropped()
    }

    async fn stop_capture(&mut self) -> Result<(), VideoError> {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(capture) = self.capture.take() {
            capture
                .await
                .map_err(|e| VideoError::Device(format!("capture thread failed: {e}")))?;
        }
        Ok(())
    }

    /// Switch to another device. The handler and counters carry over.
    pub async fn select(&mut self, config: VideoInConfig) -> Result<(), VideoError> {
        self.stop_capture().await?;
        self.cancel.store(false, Ordering::Relaxed);

        let sender = self
            .sender
            .clone()
            .ok_or(VideoError::Closed)?;
        let device = Self::create_device(&config);
        let (capture, config) = Self::spawn_capture(
            device,
            config,
            sender,
            Arc::clone(&self.gate),
            Arc::clone(&self.cancel),
            Arc::clone(&self.running),
        )
        .await?;
        self.capture = Some(capture);

        let (size, format, frame_rate) = config.resolved();
        log::info!("video in: switched to {} {:?} at {:.1} fps", size, format, frame_rate);
        self.size = size;
        self.format = format;
        self.frame_rate = frame_rate;
        Ok(())
    }

    /// Stop capturing and wait until the frame in flight, if any, has been handled.
    pub async fn close(mut self) -> Result<(), VideoError> {
        self.stop_capture().await?;
        self.sender.take();
        if let Some(delivery) = self.delivery.take() {
            spawn_blocking(move || delivery.join())
                .await
                .map_err(|e| VideoError::Device(format!("delivery join failed: {e}")))?
                .map_err(|_| VideoError::Device("delivery worker panicked".to_string()))?;
        }
        Ok(())
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        // capture thread exits on its next loop turn and drops its sender,
        // which in turn ends the delivery worker
        self.cancel.store(true, Ordering::Relaxed);
    }
}
