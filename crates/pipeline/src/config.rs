use {
    crate::*,
    base::Vec2,
    inference::{MODEL_INPUT_SIZE, Normalization, OrientationPolicy, PreprocessConfig},
    serde::{Deserialize, Serialize},
    std::{fs, path::{Path, PathBuf}},
    video::Orientation,
};

pub const CONFIG_PATH_VAR: &str = "GLANCE_CONFIG";
pub const MODEL_PATH_VAR: &str = "GLANCE_MODEL_PATH";
pub const LABELS_PATH_VAR: &str = "GLANCE_LABELS_PATH";

/// Orientation handling as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationSetting {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    /// follow each frame's metadata
    FromFrame,
}

impl From<OrientationSetting> for OrientationPolicy {
    fn from(setting: OrientationSetting) -> Self {
        match setting {
            OrientationSetting::Portrait => OrientationPolicy::Fixed(Orientation::Portrait),
            OrientationSetting::PortraitUpsideDown => {
                OrientationPolicy::Fixed(Orientation::PortraitUpsideDown)
            }
            OrientationSetting::LandscapeLeft => {
                OrientationPolicy::Fixed(Orientation::LandscapeLeft)
            }
            OrientationSetting::LandscapeRight => {
                OrientationPolicy::Fixed(Orientation::LandscapeRight)
            }
            OrientationSetting::FromFrame => OrientationPolicy::FromFrame,
        }
    }
}

/// Everything the pipeline needs besides the frame source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub width: usize,
    pub height: usize,
    pub orientation: OrientationSetting,
    pub row_alignment: usize,
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub normalization: Normalization,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let preprocess = PreprocessConfig::default();
        Self {
            width: MODEL_INPUT_SIZE,
            height: MODEL_INPUT_SIZE,
            orientation: OrientationSetting::default(),
            row_alignment: preprocess.row_alignment,
            model_path: None,
            labels_path: None,
            normalization: Normalization::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|error| PipelineError::Io(format!("{}: {}", path.display(), error)))?;
        let config = serde_json::from_str(&text)
            .map_err(|error| PipelineError::Config(format!("{}: {}", path.display(), error)))?;
        Ok(config)
    }

    /// `GLANCE_CONFIG` if set, defaults otherwise, then environment overrides.
    pub fn load() -> Result<Self, PipelineError> {
        let config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => {
                log::info!("pipeline: reading config from {:?}", path);
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Apply `GLANCE_MODEL_PATH` and `GLANCE_LABELS_PATH`.
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(MODEL_PATH_VAR).filter(|value| !value.is_empty()) {
            self.model_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(LABELS_PATH_VAR).filter(|value| !value.is_empty()) {
            self.labels_path = Some(PathBuf::from(path));
        }
        self
    }

    pub fn with_model(mut self, model_path: impl Into<PathBuf>, labels_path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(model_path.into());
        self.labels_path = Some(labels_path.into());
        self
    }

    pub fn with_orientation(mut self, orientation: OrientationSetting) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn preprocess_config(&self) -> PreprocessConfig {
        PreprocessConfig::default()
            .with_size(Vec2::new(self.width, self.height))
            .with_orientation(self.orientation.into())
            .with_row_alignment(self.row_alignment)
    }
}
