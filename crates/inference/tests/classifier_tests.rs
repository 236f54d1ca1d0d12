use {
    base::Vec2,
    inference::{
        Classifier, InferError, Inference, Model, Normalization, PreparedImage, Prediction,
    },
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

struct FixedModel {
    label: &'static str,
    calls: Arc<AtomicUsize>,
}

impl Model for FixedModel {
    fn predict(&mut self, _image: &PreparedImage) -> Result<Prediction, InferError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Prediction::new(self.label, 0.9))
    }
}

struct FlakyModel {
    calls: usize,
}

impl Model for FlakyModel {
    fn predict(&mut self, _image: &PreparedImage) -> Result<Prediction, InferError> {
        self.calls += 1;
        if self.calls % 2 == 1 {
            Err(InferError::Runtime("device lost".to_string()))
        } else {
            Ok(Prediction::new("dog", 0.5))
        }
    }
}

fn blank_image() -> PreparedImage {
    PreparedImage {
        size: Vec2::new(2, 2),
        bytes_per_row: 8,
        data: vec![0xFF; 16],
    }
}

#[test]
fn test_classify_returns_top_label() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut classifier = Classifier::new(FixedModel {
        label: "cat",
        calls: Arc::clone(&calls),
    });
    assert!(classifier.is_enabled());
    assert_eq!(classifier.classify(&blank_image()).as_deref(), Some("cat"));
    assert_eq!(
        classifier.predict(&blank_image()),
        Some(Prediction::new("cat", 0.9))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failed_load_disables_forever() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let mut classifier = Classifier::load(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err::<FixedModel, _>(InferError::ModelLoad("model.onnx missing".to_string()))
    });

    assert!(!classifier.is_enabled());
    for _ in 0..100 {
        assert_eq!(classifier.classify(&blank_image()), None);
    }
    assert!(!classifier.is_enabled());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_successful_load_enables() {
    let calls = Arc::new(AtomicUsize::new(0));
    let model_calls = Arc::clone(&calls);
    let mut classifier = Classifier::load(move || {
        Ok(FixedModel {
            label: "teapot",
            calls: model_calls,
        })
    });
    assert!(classifier.is_enabled());
    assert_eq!(classifier.classify(&blank_image()).as_deref(), Some("teapot"));
}

#[test]
fn test_inference_failure_yields_nothing_but_keeps_running() {
    let mut classifier = Classifier::new(FlakyModel { calls: 0 });
    assert_eq!(classifier.classify(&blank_image()), None);
    assert!(classifier.is_enabled());
    assert_eq!(classifier.classify(&blank_image()).as_deref(), Some("dog"));
}

#[test]
fn test_disabled_classifier() {
    let mut classifier = Classifier::disabled();
    assert!(!classifier.is_enabled());
    assert_eq!(classifier.predict(&blank_image()), None);
}

#[test]
fn test_missing_model_files_disable_classifier() {
    let inference = Inference::cpu();
    let classifier = Classifier::load(|| {
        inference.use_classifier(
            "/nonexistent/glance/model.onnx",
            "/nonexistent/glance/labels.txt",
            Normalization::default(),
        )
    });
    assert!(!classifier.is_enabled());
}
