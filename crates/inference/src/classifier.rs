use crate::*;

/// One classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// probability of `label`, in `[0, 1]`
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A loaded image classification model.
///
/// `predict` runs synchronously and blocks the caller until the model is done.
pub trait Model: Send {
    fn predict(&mut self, image: &PreparedImage) -> Result<Prediction, InferError>;
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn predict(&mut self, image: &PreparedImage) -> Result<Prediction, InferError> {
        (**self).predict(image)
    }
}

/// Runs a model on prepared images and reports the top label.
///
/// A classifier whose model failed to load stays disabled for its whole
/// lifetime: every call returns `None` and the load is never retried.
pub struct Classifier {
    model: Option<Box<dyn Model>>,
}

impl Classifier {
    pub fn new(model: impl Model + 'static) -> Self {
        Self {
            model: Some(Box::new(model)),
        }
    }

    pub fn disabled() -> Self {
        Self { model: None }
    }

    /// Run `loader` once. On failure the error is logged and the classifier
    /// comes back disabled.
    pub fn load<M, F>(loader: F) -> Self
    where
        M: Model + 'static,
        F: FnOnce() -> Result<M, InferError>,
    {
        match loader() {
            Ok(model) => {
                log::info!("classifier: model loaded");
                Self::new(model)
            }
            Err(error) => {
                log::error!("classifier: model failed to load, classification disabled: {}", error);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// Top prediction for `image`, `None` when disabled or when inference fails.
    pub fn predict(&mut self, image: &PreparedImage) -> Option<Prediction> {
        let model = self.model.as_mut()?;
        match model.predict(image) {
            Ok(prediction) => {
                log::debug!(
                    "classifier: {} ({:.3})",
                    prediction.label,
                    prediction.confidence
                );
                Some(prediction)
            }
            Err(error) => {
                log::warn!("classifier: inference failed: {}", error);
                None
            }
        }
    }

    /// Top label for `image`.
    pub fn classify(&mut self, image: &PreparedImage) -> Option<String> {
        self.predict(image).map(|prediction| prediction.label)
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
