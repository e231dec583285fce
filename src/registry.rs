use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::error::{ModelError, PredictError};
use crate::model::{Forward, ModelLoader};
use crate::preprocess::{PreprocessConfig, Processor};

/// The closed set of models the service can dispatch to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModelKind {
    CustomCnn,
    #[default]
    Resnet18,
    MobilenetV2,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [Self::CustomCnn, Self::Resnet18, Self::MobilenetV2];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomCnn => "custom_cnn",
            Self::Resnet18 => "resnet18",
            Self::MobilenetV2 => "mobilenet_v2",
        }
    }

    /// Human-readable name for the upload form.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::CustomCnn => "Custom CNN",
            Self::Resnet18 => "ResNet-18",
            Self::MobilenetV2 => "MobileNetV2",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::CustomCnn => "custom_cnn.onnx",
            Self::Resnet18 => "resnet18.onnx",
            Self::MobilenetV2 => "mobilenet_v2.onnx",
        }
    }

    /// The pre-processing each model was trained against.
    pub fn preprocess_config(self) -> PreprocessConfig {
        match self {
            Self::CustomCnn => PreprocessConfig::cifar10(),
            Self::Resnet18 | Self::MobilenetV2 => PreprocessConfig::imagenet(),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PredictError::InvalidModel(s.to_string()))
    }
}

/// The three loaded models and the two pipelines that feed them.
///
/// Built once at startup and only read afterwards.
pub struct ModelRegistry {
    custom_cnn: Box<dyn Forward>,
    resnet18: Box<dyn Forward>,
    mobilenet_v2: Box<dyn Forward>,
    custom_transform: Processor,
    transfer_transform: Processor,
}

impl ModelRegistry {
    pub fn new(
        custom_cnn: Box<dyn Forward>,
        resnet18: Box<dyn Forward>,
        mobilenet_v2: Box<dyn Forward>,
    ) -> Self {
        Self {
            custom_cnn,
            resnet18,
            mobilenet_v2,
            custom_transform: Processor::new(PreprocessConfig::cifar10()),
            transfer_transform: Processor::new(PreprocessConfig::imagenet()),
        }
    }

    /// Loads `custom_cnn.onnx`, `resnet18.onnx` and `mobilenet_v2.onnx` from `models_dir`.
    pub fn load(models_dir: impl AsRef<Path>, loader: &ModelLoader) -> Result<Self, ModelError> {
        let models_dir = models_dir.as_ref();
        let load = |kind: ModelKind| -> Result<Box<dyn Forward>, ModelError> {
            let path = models_dir.join(kind.file_name());
            let model = loader.load_model(&path, &kind.preprocess_config())?;
            info!(model = %kind, path = %path.display(), device = %loader.device(), "loaded model");
            Ok(Box::new(model))
        };
        Ok(Self::new(
            load(ModelKind::CustomCnn)?,
            load(ModelKind::Resnet18)?,
            load(ModelKind::MobilenetV2)?,
        ))
    }

    pub fn model(&self, kind: ModelKind) -> &dyn Forward {
        match kind {
            ModelKind::CustomCnn => self.custom_cnn.as_ref(),
            ModelKind::Resnet18 => self.resnet18.as_ref(),
            ModelKind::MobilenetV2 => self.mobilenet_v2.as_ref(),
        }
    }

    pub fn processor(&self, kind: ModelKind) -> &Processor {
        match kind {
            ModelKind::CustomCnn => &self.custom_transform,
            ModelKind::Resnet18 | ModelKind::MobilenetV2 => &self.transfer_transform,
        }
    }
}
