use std::time::Instant;

use image::DynamicImage;
use ndarray::{Array1, Array4, Axis};
use tracing::info;

use crate::error::PredictError;
use crate::mapping::{CLASSES, NUM_CLASSES};
use crate::postprocess::{argmax_and_max, softmax};
use crate::registry::{ModelKind, ModelRegistry};

/// The top class for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: &'static str,
    pub confidence: f32,
}

/// Classifies images with one of the registry's models.
pub struct ImgClassifier {
    registry: ModelRegistry,
}

impl ImgClassifier {
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    /// Classifies `image_bytes` with the model named by `selector`.
    ///
    /// Unknown selectors are rejected before the image is decoded.
    pub fn predict(&self, image_bytes: &[u8], selector: &str) -> Result<Prediction, PredictError> {
        let kind: ModelKind = selector.parse()?;
        self.predict_kind(image_bytes, kind)
    }

    pub fn predict_kind(
        &self,
        image_bytes: &[u8],
        kind: ModelKind,
    ) -> Result<Prediction, PredictError> {
        let t = Instant::now();
        let probabilities = self.probabilities(image_bytes, kind)?;
        let (idx, confidence) = argmax_and_max(probabilities.view());
        let prediction = Prediction {
            label: CLASSES[idx],
            confidence,
        };
        info!(
            model = %kind,
            label = prediction.label,
            confidence = prediction.confidence,
            elapsed_ms = t.elapsed().as_secs_f64() * 1000.0,
            "prediction"
        );
        Ok(prediction)
    }

    /// Softmax distribution over [`CLASSES`] for a single image.
    pub fn probabilities(
        &self,
        image_bytes: &[u8],
        kind: ModelKind,
    ) -> Result<Array1<f32>, PredictError> {
        let xs = self.preprocess(image_bytes, kind)?;
        let logits = self.registry.model(kind).forward(xs.view())?;
        if logits.shape() != &[1, NUM_CLASSES] {
            return Err(PredictError::ScoreCount {
                expected: NUM_CLASSES,
                actual: logits.len(),
            });
        }
        Ok(softmax(logits.index_axis(Axis(0), 0)))
    }

    /// The batch-of-one input tensor `kind` would receive for `image_bytes`.
    pub fn preprocess(&self, image_bytes: &[u8], kind: ModelKind) -> Result<Array4<f32>, PredictError> {
        let image = decode(image_bytes)?;
        Ok(self.registry.processor(kind).preprocess(&[image])?)
    }
}

fn decode(image_bytes: &[u8]) -> Result<DynamicImage, PredictError> {
    let image = image::load_from_memory(image_bytes).map_err(PredictError::Decode)?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}
