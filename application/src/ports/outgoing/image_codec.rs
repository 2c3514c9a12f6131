use std::sync::Arc;

use crate::error::AppResult;

pub trait ImageCodecPort: Send + Sync {
    /// Lossless WebP encoding of a raw `width * height * 3` RGB buffer.
    fn encode_lossless_webp(&self, rgb_pixels: &[u8], width: u16, height: u16)
    -> AppResult<Vec<u8>>;
}

pub type DynImageCodecPort = Arc<dyn ImageCodecPort>;
