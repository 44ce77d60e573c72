//! Image preprocessor crate for the artifact classifier.
//!
//! This crate transforms raw uploaded image bytes into the fixed-shape,
//! channel-normalized tensor data the model expects. Decoding, resizing
//! and normalization are deterministic: identical bytes always produce
//! identical tensors.

use image::imageops::FilterType;

/// Number of color channels in the model input.
pub const CHANNELS: usize = 3;

/// Maximum input size (in bytes) before rejecting.
/// Prevents decoding corrupt or adversarial files into huge allocations.
pub const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

/// Per-channel normalization constants the classifier was trained with
/// (the ImageNet statistics).
pub mod normalization {
    /// Per-channel mean, RGB order.
    pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
    /// Per-channel standard deviation, RGB order.
    pub const STD: [f32; 3] = [0.229, 0.224, 0.225];
}

/// Preprocessing parameters.
#[derive(Debug, Clone, Copy)]
pub struct PreprocessConfig {
    /// Square edge in pixels the image is resized to.
    pub target_size: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { target_size: 224 }
    }
}

/// Dense CHW tensor data produced from one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    /// Normalized pixel values, channel-major (CHW).
    pub data: Vec<f32>,

    /// Height and width in pixels (always square).
    pub size: u32,
}

impl ImageTensor {
    /// Returns the tensor shape as `[channels, height, width]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        [CHANNELS, self.size as usize, self.size as usize]
    }
}

/// Error type for preprocessing failures.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// The bytes could not be parsed as an image.
    #[error("uploaded bytes are not a decodable image: {0}")]
    InvalidImage(#[from] image::ImageError),

    /// The upload exceeds [`MAX_IMAGE_BYTES`].
    #[error("image of {actual} bytes exceeds the {limit} byte limit")]
    TooLarge { actual: usize, limit: usize },
}

/// Decodes raw image bytes and produces normalized model input.
///
/// The image is decoded, converted to RGB, resized to a square of
/// `config.target_size` with bilinear filtering, scaled to `[0, 1]` and
/// normalized per channel with the training-time mean and standard
/// deviation.
///
/// # Errors
///
/// Returns [`PreprocessError::TooLarge`] for oversized uploads and
/// [`PreprocessError::InvalidImage`] for bytes no decoder accepts.
pub fn decode_and_normalize(
    bytes: &[u8],
    config: &PreprocessConfig,
) -> Result<ImageTensor, PreprocessError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(PreprocessError::TooLarge {
            actual: bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }

    let decoded = image::load_from_memory(bytes)?;
    let size = config.target_size;
    let resized = decoded
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgb8();

    let pixel_count = (size as usize) * (size as usize);
    let mut data = vec![0.0f32; CHANNELS * pixel_count];

    for (i, pixel) in resized.pixels().enumerate() {
        for channel in 0..CHANNELS {
            let value = f32::from(pixel.0[channel]) / 255.0;
            data[channel * pixel_count + i] =
                (value - normalization::MEAN[channel]) / normalization::STD[channel];
        }
    }

    Ok(ImageTensor { data, size })
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    /// Encodes a solid-color image as PNG bytes.
    fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn test_output_shape() {
        let bytes = solid_png(640, 480, [120, 90, 60]);
        let config = PreprocessConfig { target_size: 32 };
        let tensor = decode_and_normalize(&bytes, &config).unwrap();

        assert_eq!(tensor.shape(), [3, 32, 32]);
        assert_eq!(tensor.data.len(), 3 * 32 * 32);
    }

    #[test]
    fn test_solid_color_normalization() {
        // A pure white image normalizes to (1 - mean) / std per channel.
        let bytes = solid_png(10, 10, [255, 255, 255]);
        let config = PreprocessConfig { target_size: 4 };
        let tensor = decode_and_normalize(&bytes, &config).unwrap();

        let pixel_count = 16;
        for channel in 0..CHANNELS {
            let expected =
                (1.0 - normalization::MEAN[channel]) / normalization::STD[channel];
            for i in 0..pixel_count {
                let actual = tensor.data[channel * pixel_count + i];
                assert!(
                    (actual - expected).abs() < 1e-5,
                    "channel {channel}: got {actual}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let bytes = solid_png(100, 50, [12, 200, 77]);
        let config = PreprocessConfig::default();

        let a = decode_and_normalize(&bytes, &config).unwrap();
        let b = decode_and_normalize(&bytes, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_undecodable_bytes_rejected() {
        let err = decode_and_normalize(b"definitely not an image", &PreprocessConfig::default())
            .unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidImage(_)));
    }

    #[test]
    fn test_oversized_input_rejected() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = decode_and_normalize(&bytes, &PreprocessConfig::default()).unwrap_err();
        assert!(matches!(err, PreprocessError::TooLarge { .. }));
    }

    #[test]
    fn test_grayscale_input_converted_to_rgb() {
        let gray = image::GrayImage::from_pixel(8, 8, image::Luma([128]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(gray)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        let config = PreprocessConfig { target_size: 8 };
        let tensor = decode_and_normalize(&bytes, &config).unwrap();
        assert_eq!(tensor.shape(), [3, 8, 8]);
    }
}
