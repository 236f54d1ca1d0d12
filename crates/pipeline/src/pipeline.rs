use {
    crate::*,
    inference::{Classifier, Inference, Preprocessor},
    video::{FrameHandler, VideoFrame},
};

/// Preprocess, classify, post the label.
///
/// Runs on the frame source's delivery worker. Classification is synchronous,
/// so each frame is fully handled before the next one is admitted.
pub struct Pipeline {
    preprocessor: Preprocessor,
    classifier: Classifier,
    dispatcher: UiDispatcher,
    frames: u64,
    labels: u64,
}

impl Pipeline {
    pub fn new(preprocessor: Preprocessor, classifier: Classifier, dispatcher: UiDispatcher) -> Self {
        Self {
            preprocessor,
            classifier,
            dispatcher,
            frames: 0,
            labels: 0,
        }
    }

    /// Build the preprocessor from `config` and load its model on the CPU.
    ///
    /// Without a configured model, or when loading fails, the pipeline still
    /// runs but never produces a label.
    pub fn from_config(config: &PipelineConfig, dispatcher: UiDispatcher) -> Self {
        let preprocessor = Preprocessor::new(config.preprocess_config());
        let classifier = match (&config.model_path, &config.labels_path) {
            (Some(model_path), Some(labels_path)) => {
                let inference = Inference::cpu();
                Classifier::load(|| {
                    inference.use_classifier(model_path, labels_path, config.normalization)
                })
            }
            _ => {
                log::error!("pipeline: no model or labels configured, classification disabled");
                Classifier::disabled()
            }
        };
        Self::new(preprocessor, classifier, dispatcher)
    }

    pub fn is_classifying(&self) -> bool {
        self.classifier.is_enabled()
    }

    /// Frames handled so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Labels posted so far.
    pub fn labels(&self) -> u64 {
        self.labels
    }

    /// Handle one frame, returning the label that was posted, if any.
    pub fn process(&mut self, frame: VideoFrame) -> Option<String> {
        self.frames += 1;
        let prepared = self.preprocessor.prepare(&frame)?;
        drop(frame);

        let label = self.classifier.classify(&prepared)?;
        self.dispatcher.dispatch(label.clone());
        self.labels += 1;
        Some(label)
    }
}

impl FrameHandler for Pipeline {
    fn handle(&mut self, frame: VideoFrame) {
        let sequence = frame.sequence;
        if self.process(frame).is_none() {
            log::trace!("pipeline: frame {} produced no label", sequence);
        }
    }
}
