//! One-shot snapshot persistence for the vigil daemon.
//!
//! This crate is a thin wrapper around the `image` crate that turns one raw
//! sensor buffer into a BMP file on disk. Infrared intensity buffers are
//! expanded to gray RGB so every snapshot is a plain 24-bit bitmap.

pub mod error;

pub use error::SnapshotError;

use image::{ImageFormat, RgbImage};
use std::path::Path;
use vigil_sensor::VideoMode;

/// Persist one frame as a BMP file.
///
/// `data` must match the stated geometry exactly. The write replaces any
/// existing file at `path`.
///
/// # Errors
///
/// Returns `SnapshotError::Geometry` when the buffer does not match
/// `width * height * bytes_per_pixel`, `SnapshotError::Encode` when the
/// encoder or the filesystem rejects the write.
pub fn write_bmp(
    path: &Path,
    mode: VideoMode,
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<(), SnapshotError> {
    let expected = width as usize * height as usize * mode.bytes_per_pixel();
    if data.len() != expected {
        return Err(SnapshotError::Geometry {
            expected,
            got: data.len(),
        });
    }

    let rgb = match mode {
        VideoMode::Rgb => data.to_vec(),
        VideoMode::Ir => expand_intensity(data),
    };

    let img = RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
        SnapshotError::Encode(format!("buffer does not fit {}x{} rgb", width, height))
    })?;

    img.save_with_format(path, ImageFormat::Bmp)?;
    Ok(())
}

/// Expand single-channel intensity samples to gray RGB triplets.
fn expand_intensity(data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(data.len() * 3);
    for &v in data {
        rgb.push(v);
        rgb.push(v);
        rgb.push(v);
    }
    rgb
}
