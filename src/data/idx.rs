use std::path::{Path, PathBuf};

use log::info;

use crate::error::DataError;
use crate::math::matrix::Matrix;
use crate::network::Example;

/// Which half of the MNIST distribution to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnistSet {
    Train,
    Test,
}

impl MnistSet {
    fn prefix(self) -> &'static str {
        match self {
            MnistSet::Train => "train",
            MnistSet::Test => "t10k",
        }
    }
}

/// MNIST has ten digit classes.
pub const MNIST_CLASSES: usize = 10;

/// Parses a pair of IDX binary files (image + label), as used by MNIST and its
/// derivatives, into training examples.
///
/// # IDX3 image file layout
/// ```text
/// bytes  0-1:   0x00 0x00   (reserved, must be zero)
/// byte   2:     0x08        (dtype = uint8)
/// byte   3:     0x03        (number of dimensions = 3)
/// bytes  4-7:   N           (number of images, big-endian u32)
/// bytes  8-11:  rows        (image height in pixels, big-endian u32)
/// bytes 12-15:  cols        (image width in pixels, big-endian u32)
/// bytes 16..:   N * rows * cols bytes, row-major, uint8
/// ```
///
/// # IDX1 label file layout
/// ```text
/// bytes  0-1:   0x00 0x00   (reserved, must be zero)
/// byte   2:     0x08        (dtype = uint8)
/// byte   3:     0x01        (number of dimensions = 1)
/// bytes  4-7:   N           (number of labels, big-endian u32)
/// bytes  8..:   N bytes, each a class index in [0, n_classes)
/// ```
///
/// The first `skip` items are ignored and at most `count` items are read
/// (all remaining ones for `None`). Each input is a `(rows * cols) x 1`
/// column with pixels divided by 255, each output a one-hot `n_classes x 1`
/// column.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
    skip: usize,
    count: Option<usize>,
) -> Result<Vec<Example>, DataError> {
    // ── Headers ─────────────────────────────────────────────────────────────

    check_header(image_bytes, 3, "image")?;
    check_header(label_bytes, 1, "label")?;

    if image_bytes.len() < 16 {
        return Err(DataError::Format(format!(
            "IDX image file too short: expected 16 header bytes, got {}",
            image_bytes.len()
        )));
    }

    let n_items = read_u32(image_bytes, 4);
    let rows = read_u32(image_bytes, 8);
    let cols = read_u32(image_bytes, 12);
    let label_count = read_u32(label_bytes, 4);

    if label_count != n_items {
        return Err(DataError::Format(format!(
            "IDX file mismatch: image file declares {} items but label file declares {}",
            n_items, label_count
        )));
    }
    if rows == 0 || cols == 0 {
        return Err(DataError::Format(format!("IDX image file: empty {}x{} images", rows, cols)));
    }
    if n_classes < 2 {
        return Err(DataError::Format(format!("n_classes must be at least 2, got {}", n_classes)));
    }

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        DataError::Format(format!("IDX image file: {}x{} pixels overflow", rows, cols))
    })?;

    // ── Window of items to read ─────────────────────────────────────────────

    let first = skip.min(n_items);
    let last = match count {
        Some(c) => first.saturating_add(c).min(n_items),
        None => n_items,
    };

    let image_end = n_pixels
        .checked_mul(last)
        .and_then(|len| len.checked_add(16))
        .ok_or_else(|| DataError::Format("IDX image file: data length overflows".into()))?;
    if image_bytes.len() < image_end {
        return Err(DataError::Format(format!(
            "IDX image file too short: {} items of {}x{} pixels need {} bytes, file has {}",
            last, rows, cols, image_end, image_bytes.len()
        )));
    }
    if label_bytes.len() < 8 + last {
        return Err(DataError::Format(format!(
            "IDX label file too short: {} labels need {} bytes, file has {}",
            last,
            8 + last,
            label_bytes.len()
        )));
    }

    // ── Examples ────────────────────────────────────────────────────────────

    let pixels = &image_bytes[16 + first * n_pixels..image_end];
    let labels = &label_bytes[8 + first..8 + last];

    let mut examples = Vec::with_capacity(last - first);
    for (i, (chunk, &class)) in pixels.chunks_exact(n_pixels).zip(labels).enumerate() {
        let class = class as usize;
        if class >= n_classes {
            return Err(DataError::Format(format!(
                "IDX label at index {}: class {} is out of range for {} classes",
                first + i,
                class,
                n_classes
            )));
        }
        let input = Matrix::column(chunk.iter().map(|&px| px as f64 / 255.0).collect());
        examples.push(Example::one_hot(input, class, n_classes));
    }

    Ok(examples)
}

/// Reads an MNIST image/label file pair from `dir`.
///
/// Accepts both `train-images.idx3-ubyte` and `train-images-idx3-ubyte`
/// spellings (likewise for `t10k` and the label files).
pub fn load_mnist(
    dir: &Path,
    set: MnistSet,
    skip: usize,
    count: Option<usize>,
) -> Result<Vec<Example>, DataError> {
    let images_path = locate(dir, set.prefix(), "images", "idx3");
    let labels_path = locate(dir, set.prefix(), "labels", "idx1");

    let image_bytes = std::fs::read(&images_path).map_err(|e| DataError::io(&images_path, e))?;
    let label_bytes = std::fs::read(&labels_path).map_err(|e| DataError::io(&labels_path, e))?;

    let examples = parse_idx_pair(&image_bytes, &label_bytes, MNIST_CLASSES, skip, count)?;
    info!(
        "loaded {} examples from {} (skipped {})",
        examples.len(),
        images_path.display(),
        skip
    );
    Ok(examples)
}

fn locate(dir: &Path, prefix: &str, kind: &str, idx: &str) -> PathBuf {
    let dotted = dir.join(format!("{}-{}.{}-ubyte", prefix, kind, idx));
    if dotted.exists() {
        return dotted;
    }
    let dashed = dir.join(format!("{}-{}-{}-ubyte", prefix, kind, idx));
    if dashed.exists() {
        dashed
    } else {
        dotted
    }
}

fn check_header(bytes: &[u8], dims: u8, what: &str) -> Result<(), DataError> {
    if bytes.len() < 8 {
        return Err(DataError::Format(format!(
            "IDX {} file too short: expected at least 8 header bytes, got {}",
            what,
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(DataError::Format(format!(
            "IDX {} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            what, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(DataError::Format(format!(
            "IDX {} file: dtype must be 0x08 (uint8), got 0x{:02X}",
            what, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(DataError::Format(format!(
            "IDX {} file: expected {} dimensions, got {}",
            what, dims, bytes[3]
        )));
    }
    Ok(())
}

fn read_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx_images(images: &[[u8; 4]]) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0x08, 0x03];
        bytes.extend_from_slice(&(images.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&2u32.to_be_bytes());
        for img in images {
            bytes.extend_from_slice(img);
        }
        bytes
    }

    fn idx_labels(labels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0x08, 0x01];
        bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn parses_window_of_items() {
        let images = idx_images(&[[0, 0, 0, 0], [255, 0, 0, 51], [0, 255, 0, 0]]);
        let labels = idx_labels(&[0, 2, 1]);

        let examples = parse_idx_pair(&images, &labels, 3, 1, Some(5)).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].input, Matrix::column(vec![1.0, 0.0, 0.0, 0.2]));
        assert_eq!(examples[0].label(), 2);
        assert_eq!(examples[1].label(), 1);
        assert_eq!(examples[1].output.shape(), (3, 1));
    }

    #[test]
    fn rejects_wrong_dimension_byte() {
        let mut images = idx_images(&[[0; 4]]);
        images[3] = 0x01;
        let labels = idx_labels(&[0]);
        assert!(matches!(
            parse_idx_pair(&images, &labels, 10, 0, None),
            Err(DataError::Format(_))
        ));
    }

    #[test]
    fn rejects_truncated_pixels() {
        let mut images = idx_images(&[[1, 2, 3, 4], [5, 6, 7, 8]]);
        images.truncate(images.len() - 1);
        let labels = idx_labels(&[0, 1]);
        assert!(parse_idx_pair(&images, &labels, 10, 0, None).is_err());
    }

    #[test]
    fn rejects_out_of_range_class() {
        let images = idx_images(&[[0; 4]]);
        let labels = idx_labels(&[7]);
        assert!(parse_idx_pair(&images, &labels, 3, 0, None).is_err());
    }

    #[test]
    fn rejects_zero_sized_images() {
        let mut images = idx_images(&[[0; 4]]);
        images[8..12].copy_from_slice(&0u32.to_be_bytes());
        let labels = idx_labels(&[1]);
        assert!(matches!(
            parse_idx_pair(&images, &labels, 10, 0, None),
            Err(DataError::Format(_))
        ));
    }
}
