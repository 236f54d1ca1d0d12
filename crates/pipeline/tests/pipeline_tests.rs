use {
    base::Vec2,
    image::{Image, PixelFormat},
    inference::{
        Classifier, InferError, MODEL_INPUT_SIZE, Model, PreparedImage, Prediction,
        Preprocessor,
    },
    pipeline::{LabelSink, Pipeline, PipelineConfig, ui_channel},
    std::{
        sync::{Arc, Mutex},
        time::Duration,
    },
    video::{
        FrameHandler, Orientation, Origin, Pattern, PatternConfig, VideoFrame, VideoIn,
        VideoInConfig, render_pattern,
    },
};

/// Always answers `label`, and keeps the last image it was shown.
struct StubModel {
    label: &'static str,
    seen: Arc<Mutex<Vec<PreparedImage>>>,
    delay: Duration,
}

impl StubModel {
    fn new(label: &'static str) -> (Self, Arc<Mutex<Vec<PreparedImage>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let model = Self {
            label,
            seen: Arc::clone(&seen),
            delay: Duration::ZERO,
        };
        (model, seen)
    }
}

impl Model for StubModel {
    fn predict(&mut self, image: &PreparedImage) -> Result<Prediction, InferError> {
        std::thread::sleep(self.delay);
        self.seen.lock().unwrap().push(image.clone());
        Ok(Prediction::new(self.label, 1.0))
    }
}

#[derive(Default)]
struct RecordingSink {
    texts: Vec<String>,
}

impl LabelSink for RecordingSink {
    fn set_text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }
}

fn solid_frame() -> VideoFrame {
    VideoFrame {
        image: render_pattern(
            Pattern::Solid([90, 160, 30]),
            0,
            Vec2::new(1280, 720),
            PixelFormat::Bgra8,
        )
        .unwrap(),
        timestamp: Duration::ZERO,
        sequence: 0,
        orientation: Orientation::Portrait,
        origin: Origin::TopLeft,
    }
}

#[test]
fn test_solid_frame_end_to_end() {
    let (model, seen) = StubModel::new("cat");
    let (dispatcher, mut queue) = ui_channel();
    let mut pipeline = Pipeline::new(Preprocessor::default(), Classifier::new(model), dispatcher);

    pipeline.handle(solid_frame());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let prepared = &seen[0];
    assert_eq!(prepared.size, Vec2::new(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE));
    for y in 0..MODEL_INPUT_SIZE {
        for x in 0..MODEL_INPUT_SIZE {
            assert_eq!(prepared.pixel(x, y), [0xFF, 90, 160, 30]);
        }
    }

    let mut sink = RecordingSink::default();
    assert_eq!(queue.drain(&mut sink), 1);
    assert_eq!(sink.texts, vec!["cat".to_string()]);
    assert_eq!(pipeline.frames(), 1);
    assert_eq!(pipeline.labels(), 1);
}

#[test]
fn test_disabled_classifier_posts_nothing() {
    let (dispatcher, mut queue) = ui_channel();
    let mut pipeline = Pipeline::new(
        Preprocessor::default(),
        Classifier::load(|| Err::<StubModel, _>(InferError::ModelLoad("gone".to_string()))),
        dispatcher,
    );
    assert!(!pipeline.is_classifying());
    for _ in 0..3 {
        assert_eq!(pipeline.process(solid_frame()), None);
    }
    let mut sink = RecordingSink::default();
    assert_eq!(queue.drain(&mut sink), 0);
    assert_eq!(pipeline.frames(), 3);
}

#[test]
fn test_unusable_frame_keeps_previous_label() {
    let (model, _) = StubModel::new("cat");
    let (dispatcher, mut queue) = ui_channel();
    let mut pipeline = Pipeline::new(Preprocessor::default(), Classifier::new(model), dispatcher);
    let mut label = String::new();
    let mut sink = |text: &str| label = text.to_string();

    assert_eq!(pipeline.process(solid_frame()).as_deref(), Some("cat"));
    queue.drain(&mut sink);

    let mut broken = solid_frame();
    broken.image = Image::new(Vec2::new(1280, 720), vec![0; 16], PixelFormat::Bgra8);
    assert_eq!(pipeline.process(broken), None);
    assert_eq!(queue.drain(&mut sink), 0);
    assert_eq!(label, "cat");
}

#[test]
fn test_labels_arrive_in_order() {
    let (dispatcher, mut queue) = ui_channel();
    let worker = dispatcher.clone();
    std::thread::spawn(move || {
        for label in ["one", "two", "three"] {
            worker.dispatch(label);
        }
    })
    .join()
    .unwrap();
    dispatcher.dispatch("four");

    let mut sink = RecordingSink::default();
    queue.drain(&mut sink);
    assert_eq!(sink.texts, vec!["one", "two", "three", "four"]);
}

#[tokio::test]
async fn test_queue_run_until_dispatchers_drop() {
    let (dispatcher, queue) = ui_channel();
    let texts = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink_texts = Arc::clone(&texts);
    let ui = tokio::spawn(queue.run(move |text: &str| {
        sink_texts.lock().unwrap().push(text.to_string());
    }));

    dispatcher.dispatch("cat");
    dispatcher.dispatch("dog");
    drop(dispatcher);
    ui.await.unwrap();

    assert_eq!(*texts.lock().unwrap(), vec!["cat", "dog"]);
}

#[test]
fn test_from_config_without_model_is_disabled() {
    let (dispatcher, _queue) = ui_channel();
    let pipeline = Pipeline::from_config(&PipelineConfig::default(), dispatcher);
    assert!(!pipeline.is_classifying());

    let (dispatcher, _queue) = ui_channel();
    let config = PipelineConfig::default()
        .with_model("/nonexistent/model.onnx", "/nonexistent/labels.txt");
    let pipeline = Pipeline::from_config(&config, dispatcher);
    assert!(!pipeline.is_classifying());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_live_source_drops_while_classifying() {
    let (mut model, seen) = StubModel::new("cat");
    model.delay = Duration::from_millis(15);
    let (dispatcher, mut queue) = ui_channel();
    let pipeline = Pipeline::new(Preprocessor::default(), Classifier::new(model), dispatcher);

    let config = PatternConfig::default()
        .with_size(Vec2::new(320, 240))
        .with_format(PixelFormat::Rgb8)
        .with_frame_rate(0.0);
    let videoin = VideoIn::open(Some(VideoInConfig::Pattern(config)), pipeline)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    let dropped = videoin.dropped();
    let delivered = {
        videoin.close().await.unwrap();
        seen.lock().unwrap().len()
    };

    let mut sink = RecordingSink::default();
    queue.drain(&mut sink);
    assert!(delivered >= 1);
    assert_eq!(sink.texts.len(), delivered);
    assert!(sink.texts.iter().all(|text| text == "cat"));
    assert!(dropped > 0);
}
