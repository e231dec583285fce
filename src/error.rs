use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or running an ONNX model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artefact not found at {path}")]
    Missing { path: PathBuf },
    #[error("failed to construct ONNX session builder: {0}")]
    CreateSessionBuilder(#[source] ort::Error),
    #[error("failed to create ONNX session from {path}: {source}")]
    CreateSession {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },
    #[error("model {path} declares input {actual:?} but expects [N, 3, {height}, {width}]")]
    InputShape {
        path: PathBuf,
        actual: Vec<i64>,
        height: usize,
        width: usize,
    },
    #[error("model {path} emits {actual} classes but {expected} are required")]
    OutputWidth {
        path: PathBuf,
        expected: usize,
        actual: i64,
    },
    #[error("model {path} declares output {actual:?} but expects [N, classes]")]
    OutputRank { path: PathBuf, actual: Vec<i64> },
    #[error("model {path} has no {kind}")]
    MissingSignature { path: PathBuf, kind: &'static str },
    #[error("failed to run inference: {0}")]
    Inference(#[source] ort::Error),
    #[error("model returned no outputs")]
    MissingOutput,
    #[error("unexpected output shape: {0}")]
    OutputShape(#[source] ndarray::ShapeError),
}

/// Errors raised while turning a decoded image into a model input tensor.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("invalid source image buffer: {0}")]
    Buffer(#[from] fast_image_resize::ImageBufferError),
    #[error("failed to resize image: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),
    #[error("failed to build input tensor: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("cannot preprocess an empty batch")]
    EmptyBatch,
}

/// Errors returned by [`crate::ImgClassifier`].
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid model name: {0}")]
    InvalidModel(String),
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("model returned {actual} scores but {expected} are required")]
    ScoreCount { expected: usize, actual: usize },
}

impl PredictError {
    /// Whether the failure was caused by the caller's input rather than the service.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::InvalidModel(_) | Self::Decode(_))
    }
}
