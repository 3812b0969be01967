//! Image preprocessing for inference on pictures of digits.

use crate::error::DataError;
use crate::math::matrix::Matrix;

/// Decodes image bytes (PNG/JPEG/BMP/GIF), resizes them to `width x height`,
/// converts to grayscale and normalizes pixels to [0, 1].
///
/// MNIST digits are light strokes on a dark background; set `invert` for
/// dark-on-light pictures. Returns a `(width * height) x 1` column.
pub fn image_bytes_to_input(
    bytes: &[u8],
    width: u32,
    height: u32,
    invert: bool,
) -> Result<Matrix, DataError> {
    if width == 0 || height == 0 {
        return Err(DataError::Format(format!("cannot resize to an empty {}x{} image", width, height)));
    }
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(width, height, image::imageops::FilterType::Lanczos3);
    let gray = resized.to_luma8();
    let values = gray
        .pixels()
        .map(|p| {
            let v = p.0[0] as f64 / 255.0;
            if invert { 1.0 - v } else { v }
        })
        .collect();
    Ok(Matrix::column(values))
}

/// Reads an image file and converts it like [`image_bytes_to_input`].
pub fn image_file_to_input(
    path: &std::path::Path,
    width: u32,
    height: u32,
    invert: bool,
) -> Result<Matrix, DataError> {
    let bytes = std::fs::read(path).map_err(|e| DataError::io(path, e))?;
    image_bytes_to_input(&bytes, width, height, invert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageOutputFormat, Luma};
    use std::io::Cursor;

    fn png(width: u32, height: u32, value: u8) -> Vec<u8> {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Luma([value]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn resizes_to_a_column() {
        let input = image_bytes_to_input(&png(56, 56, 255), 28, 28, false).unwrap();
        assert_eq!(input.shape(), (784, 1));
        assert!(input.as_slice().iter().all(|&v| (v - 1.0).abs() < 1e-9));
    }

    #[test]
    fn inversion_flips_intensity() {
        let input = image_bytes_to_input(&png(28, 28, 255), 28, 28, true).unwrap();
        assert!(input.as_slice().iter().all(|&v| v.abs() < 1e-9));
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            image_bytes_to_input(b"not an image", 28, 28, false),
            Err(DataError::Image(_))
        ));
    }

    #[test]
    fn empty_target_size_is_rejected() {
        assert!(matches!(
            image_bytes_to_input(&png(4, 4, 0), 0, 28, false),
            Err(DataError::Format(_))
        ));
    }
}
