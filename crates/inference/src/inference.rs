use {crate::*, std::path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Device {
    Cpu,
    #[allow(dead_code)]
    Cuda(usize),
}

/// Entry point for loading models on a given device.
#[derive(Debug)]
pub struct Inference {
    device: Device,
}

impl Inference {
    pub fn cpu() -> Self {
        log::info!("Inference device: CPU");
        Self {
            device: Device::Cpu,
        }
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Self {
        log::info!("Inference device: CUDA {}", ordinal);
        Self {
            device: Device::Cuda(ordinal),
        }
    }

    pub fn is_cuda(&self) -> bool {
        matches!(self.device, Device::Cuda(_))
    }

    /// Load an image classifier from an ONNX model and its label file.
    pub fn use_classifier(
        &self,
        model_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
        normalization: Normalization,
    ) -> Result<Box<dyn Model>, InferError> {
        let labels = Labels::from_file(labels_path)?;
        self.load_onnx(model_path.as_ref(), labels, normalization)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(
        &self,
        model_path: &Path,
        labels: Labels,
        normalization: Normalization,
    ) -> Result<Box<dyn Model>, InferError> {
        let model = match self.device {
            Device::Cpu => OnnxModel::from_file(model_path, labels, normalization)?,
            #[cfg(feature = "cuda")]
            Device::Cuda(ordinal) => {
                OnnxModel::from_file_cuda(model_path, ordinal, labels, normalization)?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda(_) => {
                return Err(InferError::Runtime("CUDA feature not enabled".to_string()));
            }
        };
        log::info!(
            "loaded classifier {} with {} labels",
            model_path.display(),
            model.labels().len()
        );
        Ok(Box::new(model))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(
        &self,
        model_path: &Path,
        _labels: Labels,
        _normalization: Normalization,
    ) -> Result<Box<dyn Model>, InferError> {
        Err(InferError::ModelLoad(format!(
            "cannot load {}: ONNX support not compiled in",
            model_path.display()
        )))
    }
}
