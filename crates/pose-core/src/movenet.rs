//! MoveNet SinglePose provider running on ONNX Runtime.

use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use crate::detect::PoseDetect;
use crate::landmark::{BodyPoint, Landmark, Landmarks};

/// MoveNet expects square input of this edge length.
pub const MOVENET_INPUT_SIZE: u32 = 192;

/// Single-person pose detector backed by a MoveNet ONNX model.
///
/// Constructed once at process start; `detect` needs `&mut self` because the
/// runtime session is stateful, so callers serialise access externally.
pub struct MoveNetDetector {
    session: Session,
    min_score: f32,
}

impl MoveNetDetector {
    pub fn new<P: AsRef<Path>>(model_path: P, min_score: f32) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load MoveNet ONNX model")?;

        Ok(Self { session, min_score })
    }
}

impl PoseDetect for MoveNetDetector {
    fn detect(&mut self, image: &RgbImage) -> Result<Landmarks> {
        let (width, height) = image.dimensions();
        let input_tensor = Tensor::from_array(preprocess(image))?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])
            .context("MoveNet inference failed")?;

        // Output layout is [1, 1, 17, 3] (y, x, score), normalised to [0, 1].
        let output: ndarray::ArrayViewD<f32> = outputs["StatefulPartitionedCall_0"]
            .try_extract_array()
            .context("Failed to extract keypoint tensor")?;

        let mut landmarks = Vec::with_capacity(BodyPoint::COUNT);
        for (index, point) in BodyPoint::ALL.iter().enumerate() {
            let y = output[[0, 0, index, 0]];
            let x = output[[0, 0, index, 1]];
            let score = output[[0, 0, index, 2]];
            if score >= self.min_score {
                landmarks.push(Landmark::new(*point, x * width as f32, y * height as f32));
            }
        }

        if landmarks.is_empty() {
            debug!("no keypoint above score threshold {}", self.min_score);
        }
        Ok(Landmarks::new(landmarks))
    }
}

/// Squash-resize to 192x192 and lay the pixels out as a [1, 192, 192, 3]
/// f32 tensor in 0-255 range, the layout MoveNet expects.
fn preprocess(image: &RgbImage) -> Array4<f32> {
    let resized = imageops::resize(
        image,
        MOVENET_INPUT_SIZE,
        MOVENET_INPUT_SIZE,
        FilterType::Triangle,
    );

    let size = MOVENET_INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        tensor[[0, y as usize, x as usize, 0]] = pixel[0] as f32;
        tensor[[0, y as usize, x as usize, 1]] = pixel[1] as f32;
        tensor[[0, y as usize, x as usize, 2]] = pixel[2] as f32;
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn preprocess_shape_and_range() {
        let mut image = RgbImage::new(640, 480);
        image.put_pixel(0, 0, Rgb([255, 128, 0]));

        let tensor = preprocess(&image);
        assert_eq!(tensor.shape(), &[1, 192, 192, 3]);
        for value in tensor.iter() {
            assert!((0.0..=255.0).contains(value));
        }
    }
}
