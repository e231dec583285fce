use std::borrow::Cow;

use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbImage};
use ndarray::{Array3, Array4, Axis};
use rayon::prelude::*;

use crate::error::PreprocessError;

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    pub mean: [f32; 3],
    pub std: [f32; 3],
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl PreprocessConfig {
    /// 32x32 input with CIFAR-10 channel statistics, used by the custom network.
    pub fn cifar10() -> Self {
        Self {
            mean: [0.4914, 0.4822, 0.4465],
            std: [0.2023, 0.1994, 0.2010],
            height: 32,
            width: 32,
            channels: 3,
        }
    }

    /// 224x224 input with ImageNet channel statistics, used by the transfer models.
    pub fn imagenet() -> Self {
        Self {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
            height: 224,
            width: 224,
            channels: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    pub config: PreprocessConfig,
}

impl Processor {
    /// Create a new instance of the Processor struct
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Resizes `image` to exactly the configured resolution, ignoring aspect ratio.
    ///
    /// Bilinear convolution scales its support with the resize factor, so
    /// downscaling is antialiased.
    fn resize(&self, image: &DynamicImage) -> Result<Vec<u8>, PreprocessError> {
        let rgb = rgb8(image);
        let src = ImageRef::new(rgb.width(), rgb.height(), rgb.as_raw(), PixelType::U8x3)?;
        let mut dst = Image::new(
            self.config.width as u32,
            self.config.height as u32,
            PixelType::U8x3,
        );
        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
        let mut resizer = Resizer::new();
        resizer.resize(&src, &mut dst, &options)?;
        Ok(dst.buffer().to_vec())
    }

    /// Normalizes a single image into a CHW tensor.
    pub fn to_tensor(&self, image: &DynamicImage) -> Result<Array3<f32>, PreprocessError> {
        let rgb = self.resize(image)?;
        let PreprocessConfig {
            mean,
            std: std_dev,
            height,
            width,
            channels,
        } = self.config;
        Ok(Array3::from_shape_fn((channels, height, width), |(c, y, x)| {
            let value = rgb[(y * width + x) * channels + c] as f32 / 255.0;
            (value - mean[c]) / std_dev[c]
        }))
    }

    /// Preprocess the input images
    /// Returns an NCHW batch with one entry per image, in input order.
    pub fn preprocess(&self, xs: &[DynamicImage]) -> Result<Array4<f32>, PreprocessError> {
        if xs.is_empty() {
            return Err(PreprocessError::EmptyBatch);
        }
        let tensors = xs
            .par_iter()
            .map(|x| self.to_tensor(x))
            .collect::<Result<Vec<_>, _>>()?;

        let views: Vec<_> = tensors.iter().map(|arr| arr.view()).collect();
        Ok(ndarray::stack(Axis(0), &views)?)
    }
}

/// The image as packed RGB, borrowed when it already is.
fn rgb8(image: &DynamicImage) -> Cow<'_, RgbImage> {
    match image {
        DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
        other => Cow::Owned(other.to_rgb8()),
    }
}
