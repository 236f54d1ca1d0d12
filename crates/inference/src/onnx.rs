use {
    crate::*,
    base::Tensor,
    ort::{
        execution_providers::CPUExecutionProvider, inputs, session::Session,
        value::Tensor as OrtTensor,
    },
    std::path::Path,
};

/// Image classifier backed by an ONNX Runtime session.
///
/// Expects a single `[1, 3, H, W]` float input and a single score output with
/// one logit per label.
pub struct OnnxModel {
    session: Session,
    labels: Labels,
    normalization: Normalization,
}

impl OnnxModel {
    pub fn new(session: Session, labels: Labels, normalization: Normalization) -> Self {
        Self {
            session,
            labels,
            normalization,
        }
    }

    /// Load `model_path` on the CPU.
    pub fn from_file(
        model_path: impl AsRef<Path>,
        labels: Labels,
        normalization: Normalization,
    ) -> Result<Self, InferError> {
        let path = model_path.as_ref();
        let session = Session::builder()
            .map_err(|e| InferError::ModelLoad(format!("failed to create session builder: {}", e)))?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(|e| InferError::ModelLoad(format!("failed to select CPU: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| {
                InferError::ModelLoad(format!("failed to load {}: {}", path.display(), e))
            })?;
        Ok(Self::new(session, labels, normalization))
    }

    /// Load `model_path` on CUDA device `ordinal`.
    #[cfg(feature = "cuda")]
    pub fn from_file_cuda(
        model_path: impl AsRef<Path>,
        ordinal: usize,
        labels: Labels,
        normalization: Normalization,
    ) -> Result<Self, InferError> {
        use ort::execution_providers::CUDAExecutionProvider;
        let path = model_path.as_ref();
        let session = Session::builder()
            .map_err(|e| InferError::ModelLoad(format!("failed to create session builder: {}", e)))?
            .with_execution_providers([CUDAExecutionProvider::default()
                .with_device_id(ordinal as i32)
                .build()])
            .map_err(|e| InferError::ModelLoad(format!("failed to select CUDA {}: {}", ordinal, e)))?
            .commit_from_file(path)
            .map_err(|e| {
                InferError::ModelLoad(format!("failed to load {}: {}", path.display(), e))
            })?;
        Ok(Self::new(session, labels, normalization))
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }
}

impl Model for OnnxModel {
    fn predict(&mut self, image: &PreparedImage) -> Result<Prediction, InferError> {
        let input = image.to_nchw(&self.normalization)?;
        let shape = [1usize, 3, image.size.y, image.size.x];
        let input = OrtTensor::from_array((shape, input.data.into_boxed_slice()))
            .map_err(|e| InferError::Runtime(format!("failed to create input tensor: {}", e)))?;

        let outputs = self
            .session
            .run(inputs![input])
            .map_err(|e| InferError::Runtime(format!("inference failed: {}", e)))?;
        let (_, scores) = outputs
            .iter()
            .next()
            .ok_or_else(|| InferError::Runtime("model produced no outputs".to_string()))?;
        let (_, scores) = scores
            .try_extract_tensor::<f32>()
            .map_err(|e| InferError::Runtime(format!("output is not f32: {}", e)))?;

        let scores = Tensor::new(vec![scores.len()], scores.to_vec())?;
        self.labels.top(&scores)
    }
}
