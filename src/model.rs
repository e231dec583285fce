use std::path::Path;

use ndarray::{Array2, ArrayView4, Ix2};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::ValueType;
use tracing::debug;

use crate::device::DeviceChoice;
use crate::error::ModelError;
use crate::mapping::NUM_CLASSES;
use crate::preprocess::PreprocessConfig;

/// A classifier forward pass: NCHW batch in, one row of logits per image out.
pub trait Forward: Send + Sync {
    fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Array2<f32>, ModelError>;
}

/// Builds ONNX Runtime sessions for one device choice.
pub struct ModelLoader {
    device: DeviceChoice,
    providers: Vec<ExecutionProviderDispatch>,
    intra_threads: Option<usize>,
}

impl ModelLoader {
    pub fn new(device: DeviceChoice) -> Self {
        Self {
            device,
            providers: device.execution_providers(),
            intra_threads: None,
        }
    }

    pub fn with_intra_threads(mut self, threads: Option<usize>) -> Self {
        self.intra_threads = threads;
        self
    }

    pub fn device(&self) -> DeviceChoice {
        self.device
    }

    /// Loads the model at `model_path` and checks it accepts inputs shaped by `config`.
    pub fn load_model(
        &self,
        model_path: impl AsRef<Path>,
        config: &PreprocessConfig,
    ) -> Result<OnnxModel, ModelError> {
        let path = model_path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(ModelError::Missing { path });
        }

        let mut builder = SessionBuilder::new()
            .map_err(ModelError::CreateSessionBuilder)?
            .with_execution_providers(self.providers.clone())
            .map_err(ModelError::CreateSessionBuilder)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ModelError::CreateSessionBuilder)?;
        if let Some(threads) = self.intra_threads {
            builder = builder
                .with_intra_threads(threads)
                .map_err(ModelError::CreateSessionBuilder)?;
        }
        let session = builder
            .commit_from_file(&path)
            .map_err(|source| ModelError::CreateSession {
                path: path.clone(),
                source,
            })?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| ModelError::MissingSignature {
                path: path.clone(),
                kind: "input",
            })?;
        let output = session
            .outputs
            .first()
            .ok_or_else(|| ModelError::MissingSignature {
                path: path.clone(),
                kind: "output",
            })?;
        check_signature(
            &path,
            tensor_dims(&input.input_type),
            tensor_dims(&output.output_type),
            config,
        )?;
        debug!(path = %path.display(), input = %input.name, output = %output.name, "model signature ok");

        Ok(OnnxModel { session })
    }
}

fn tensor_dims(ty: &ValueType) -> &[i64] {
    match ty {
        ValueType::Tensor { dimensions, .. } => dimensions.as_slice(),
        _ => &[],
    }
}

fn dim_matches(declared: i64, expected: usize) -> bool {
    declared < 0 || declared as usize == expected
}

/// Rejects graphs whose declared input is not `[N, C, H, W]` for `config` or
/// whose output is not `[N, classes]`. Dynamic (negative) dimensions are
/// accepted.
pub(crate) fn check_signature(
    path: &Path,
    input: &[i64],
    output: &[i64],
    config: &PreprocessConfig,
) -> Result<(), ModelError> {
    let input_ok = match input {
        [_, c, h, w] => {
            dim_matches(*c, config.channels)
                && dim_matches(*h, config.height)
                && dim_matches(*w, config.width)
        }
        _ => false,
    };
    if !input_ok {
        return Err(ModelError::InputShape {
            path: path.to_path_buf(),
            actual: input.to_vec(),
            height: config.height,
            width: config.width,
        });
    }

    match output {
        [_, classes] if dim_matches(*classes, NUM_CLASSES) => Ok(()),
        [_, classes] => Err(ModelError::OutputWidth {
            path: path.to_path_buf(),
            expected: NUM_CLASSES,
            actual: *classes,
        }),
        [] => Err(ModelError::MissingSignature {
            path: path.to_path_buf(),
            kind: "tensor output",
        }),
        _ => Err(ModelError::OutputRank {
            path: path.to_path_buf(),
            actual: output.to_vec(),
        }),
    }
}

/// A loaded, read-only ONNX classifier.
#[derive(Debug)]
pub struct OnnxModel {
    session: Session,
}

impl Forward for OnnxModel {
    fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Array2<f32>, ModelError> {
        let inputs = ort::inputs![input.to_owned()].map_err(ModelError::Inference)?;
        let outputs = self.session.run(inputs).map_err(ModelError::Inference)?;
        let (_name, logits) = outputs.iter().next().ok_or(ModelError::MissingOutput)?;
        let logits = logits
            .try_extract_tensor::<f32>()
            .map_err(ModelError::Inference)?;
        let logits = logits
            .into_dimensionality::<Ix2>()
            .map_err(ModelError::OutputShape)?;
        Ok(logits.to_owned())
    }
}
