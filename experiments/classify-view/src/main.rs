use {
    base::*,
    image::*,
    minifb::{Key, KeyRepeat, ScaleMode, Window, WindowOptions},
    pipeline::*,
    std::sync::{Arc, Mutex},
    video::*,
};

const TITLE: &str = "glance";

// the pattern source pretends to be a front and a back camera
#[cfg(not(feature = "v4l2"))]
const CAMERA_COUNT: usize = 2;

struct Preview {
    size: Vec2<usize>,
    pixels: Vec<u32>,
}

#[cfg(feature = "v4l2")]
fn camera_config(index: usize) -> VideoInConfig {
    VideoInConfig::V4l2(V4l2Config::default().with_path(format!("/dev/video{}", index)))
}

#[cfg(not(feature = "v4l2"))]
fn camera_config(index: usize) -> VideoInConfig {
    let pattern = match index % CAMERA_COUNT {
        0 => Pattern::Gradient,
        _ => Pattern::Bars,
    };
    VideoInConfig::Pattern(
        PatternConfig::default()
            .with_index(index % CAMERA_COUNT)
            .with_pattern(pattern),
    )
}

fn frame_to_u32(frame: &VideoFrame) -> Option<Preview> {
    let argb = frame.image.to_argb().ok()?;
    Some(Preview {
        size: argb.size,
        pixels: argb_to_u32(argb.size, &argb.data),
    })
}

fn window_title(running: bool, label: Option<&str>) -> String {
    match (running, label) {
        (false, _) => format!("{} - stopped (SPACE start, C camera, ESC exit)", TITLE),
        (true, None) => format!("{} - ...", TITLE),
        (true, Some(label)) => format!("{} - {}", TITLE, label),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger();

    let config = PipelineConfig::load()?;
    let (dispatcher, mut queue) = ui_channel();
    let mut pipeline = Pipeline::from_config(&config, dispatcher);

    // the worker publishes its latest frame for the preview, then classifies it
    let preview: Arc<Mutex<Option<Preview>>> = Arc::new(Mutex::new(None));
    let handler = {
        let preview = Arc::clone(&preview);
        move |frame: VideoFrame| {
            if let Some(converted) = frame_to_u32(&frame) {
                *preview.lock().unwrap_or_else(|e| e.into_inner()) = Some(converted);
            }
            pipeline.handle(frame);
        }
    };

    let mut camera = 0;
    let mut videoin = VideoIn::open(Some(camera_config(camera)), handler).await?;
    videoin.stop();
    let size = videoin.size();
    log::info!("camera {}: {} at {:.1} fps", camera, size, videoin.frame_rate());

    let mut window = Window::new(
        &window_title(false, None),
        size.x,
        size.y,
        WindowOptions {
            resize: true,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(30);

    let mut label: Option<String> = None;
    let mut title = String::new();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            if videoin.is_running() {
                videoin.stop();
                label = None;
                log::info!("capture stopped");
            } else {
                videoin.start();
                log::info!("capture started");
            }
        }

        if window.is_key_pressed(Key::C, KeyRepeat::No) {
            camera += 1;
            if let Err(error) = videoin.select(camera_config(camera)).await {
                log::warn!("camera {} unavailable: {}", camera, error);
                camera = 0;
                videoin.select(camera_config(camera)).await?;
            }
            log::info!("switched to camera {}: {}", camera, videoin.size());
        }

        queue.drain(&mut |text: &str| label = Some(text.to_string()));
        if !videoin.is_running() {
            label = None;
        }
        let new_title = window_title(videoin.is_running(), label.as_deref());
        if new_title != title {
            window.set_title(&new_title);
            title = new_title;
        }

        let latest = preview.lock().unwrap_or_else(|e| e.into_inner()).take();
        match latest {
            Some(frame) => window.update_with_buffer(&frame.pixels, frame.size.x, frame.size.y)?,
            None => window.update(),
        }
    }

    log::info!(
        "exiting after {} frames, {} dropped",
        videoin.delivered(),
        videoin.dropped()
    );
    videoin.close().await?;
    Ok(())
}
