//! Shared fixtures: stub models standing in for ONNX sessions, and encoded images.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imgcls::{Forward, ImgClassifier, ModelError, ModelRegistry, NUM_CLASSES};
use ndarray::{Array2, ArrayView4, Axis};

/// Records every call and returns logits derived from per-channel means.
#[derive(Clone, Default)]
pub struct StubModel {
    pub calls: Arc<AtomicUsize>,
    pub shapes: Arc<Mutex<Vec<Vec<usize>>>>,
    pub bias: f32,
}

impl StubModel {
    pub fn with_bias(bias: f32) -> Self {
        Self {
            bias,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_shape(&self) -> Option<Vec<usize>> {
        self.shapes.lock().unwrap().last().cloned()
    }
}

impl Forward for StubModel {
    fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Array2<f32>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.shapes.lock().unwrap().push(input.shape().to_vec());
        let means: Vec<f32> = (0..3)
            .map(|c| input.index_axis(Axis(1), c).mean().unwrap_or(0.0))
            .collect();
        Ok(Array2::from_shape_fn(
            (input.shape()[0], NUM_CLASSES),
            |(_, k)| means[k % 3] * (k as f32 + 1.0) + self.bias * k as f32,
        ))
    }
}

/// Always fails the forward pass.
#[derive(Clone)]
pub struct FailingModel;

impl Forward for FailingModel {
    fn forward(&self, _input: ArrayView4<'_, f32>) -> Result<Array2<f32>, ModelError> {
        Err(ModelError::MissingOutput)
    }
}

/// Emits the wrong number of classes.
#[derive(Clone)]
pub struct NarrowModel;

impl Forward for NarrowModel {
    fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Array2<f32>, ModelError> {
        Ok(Array2::zeros((input.shape()[0], 3)))
    }
}

pub struct Stubs {
    pub custom_cnn: StubModel,
    pub resnet18: StubModel,
    pub mobilenet_v2: StubModel,
}

impl Stubs {
    pub fn new() -> Self {
        Self {
            custom_cnn: StubModel::with_bias(0.1),
            resnet18: StubModel::with_bias(-0.2),
            mobilenet_v2: StubModel::with_bias(0.3),
        }
    }

    pub fn total_calls(&self) -> usize {
        self.custom_cnn.calls() + self.resnet18.calls() + self.mobilenet_v2.calls()
    }

    pub fn classifier(&self) -> ImgClassifier {
        ImgClassifier::new(ModelRegistry::new(
            Box::new(self.custom_cnn.clone()),
            Box::new(self.resnet18.clone()),
            Box::new(self.mobilenet_v2.clone()),
        ))
    }
}

pub fn classifier_with(model: impl Forward + Clone + 'static) -> ImgClassifier {
    ImgClassifier::new(ModelRegistry::new(
        Box::new(model.clone()),
        Box::new(model.clone()),
        Box::new(model),
    ))
}

/// A sky-blue gradient with a grey stripe across the middle.
pub fn sample_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        if y > height / 3 && y < height / 2 {
            Rgb([128, 128, 140])
        } else {
            Rgb([
                (60 + x * 80 / width) as u8,
                (120 + y * 60 / height) as u8,
                220,
            ])
        }
    }))
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn sample_png() -> Vec<u8> {
    encode(&sample_image(64, 48), ImageFormat::Png)
}
