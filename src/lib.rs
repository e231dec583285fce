pub mod cli;
pub mod device;
pub mod error;
pub mod helpers;
pub mod http;
pub mod mapping;
pub mod model;
pub mod postprocess;
pub mod preprocess;
pub mod registry;
pub mod service;

pub use crate::cli::Args;
pub use crate::device::{Device, DeviceChoice};
pub use crate::error::{ModelError, PredictError, PreprocessError};
pub use crate::mapping::{CLASSES, NUM_CLASSES};
pub use crate::model::{Forward, ModelLoader, OnnxModel};
pub use crate::preprocess::{PreprocessConfig, Processor};
pub use crate::registry::{ModelKind, ModelRegistry};
pub use crate::service::{ImgClassifier, Prediction};
