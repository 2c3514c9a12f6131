use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, Rgb};
use tracing::{debug, instrument};

use application::error::{AppError, AppResult};
use application::ports::outgoing::image_codec::ImageCodecPort;

#[derive(Default, Clone, Copy)]
pub struct ImageWebpAdapter;

impl ImageWebpAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodecPort for ImageWebpAdapter {
    #[instrument(skip(self, rgb_pixels))]
    fn encode_lossless_webp(
        &self,
        rgb_pixels: &[u8],
        width: u16,
        height: u16,
    ) -> AppResult<Vec<u8>> {
        let expected_len = usize::from(width) * usize::from(height) * 3;
        if rgb_pixels.len() != expected_len {
            return Err(AppError::CodecError {
                message: format!(
                    "expected {expected_len} bytes for a {width}x{height} grid, got {}",
                    rgb_pixels.len()
                ),
            });
        }

        let img_buffer =
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(u32::from(width), u32::from(height), rgb_pixels.to_vec())
                .ok_or_else(|| AppError::CodecError {
                    message: "failed to build an image buffer from the board's RGB bytes".to_string(),
                })?;

        let mut webp_bytes = Vec::new();
        let mut cursor = Cursor::new(&mut webp_bytes);
        img_buffer
            .write_to(&mut cursor, ImageFormat::WebP)
            .map_err(|err| AppError::CodecError {
                message: format!("failed to encode webp: {err}"),
            })?;

        debug!(bytes = webp_bytes.len(), "encoded board snapshot as webp");
        Ok(webp_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_buffer_of_the_wrong_length() {
        let adapter = ImageWebpAdapter::new();
        let result = adapter.encode_lossless_webp(&[0; 5], 2, 2);
        assert!(result.is_err());
    }

    #[test]
    fn encodes_a_blank_grid_to_nonempty_webp_bytes() {
        let adapter = ImageWebpAdapter::new();
        let pixels = vec![170u8; 4 * 2 * 3];
        let encoded = adapter
            .encode_lossless_webp(&pixels, 4, 2)
            .expect("encoding succeeds");
        assert!(!encoded.is_empty());
    }
}
