use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::color::RgbColor;
use crate::coords::PixelCoord;
use crate::error::{DomainError, DomainResult};

/// One dirtied pixel as handed back by [`Board::drain_dirty`]: its coordinate
/// and its color at drain time (the *latest* write, per the coalescing
/// contract — intermediate writes between drains are never observed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyPixel {
    pub coord: PixelCoord,
    pub color: RgbColor,
}

/// Fixed-capacity bitset over the pixel index space plus an append-only index
/// vector, so a drain is O(D) in the number of distinct dirtied pixels and the
/// steady-state `set` path never allocates.
#[derive(Debug)]
struct DirtySet {
    present: Vec<bool>,
    order: Vec<u32>,
}

impl DirtySet {
    fn new(pixel_count: usize) -> Self {
        Self {
            present: vec![false; pixel_count],
            order: Vec::new(),
        }
    }

    fn mark(&mut self, index: usize) {
        if let Some(slot) = self.present.get_mut(index) {
            if !*slot {
                *slot = true;
                self.order.push(u32::try_from(index).unwrap_or(u32::MAX));
            }
        }
    }

    fn drain(&mut self) -> Vec<u32> {
        let drained = std::mem::take(&mut self.order);
        for &index in &drained {
            if let Some(slot) = self.present.get_mut(index as usize) {
                *slot = false;
            }
        }
        drained
    }
}

/// The authoritative W x H x 3 byte grid. Reads (`snapshot`) and writes
/// (`set`) never block each other: the grid itself is `Relaxed`-ordered
/// atomics, and only the dirty-index bookkeeping needs a lock.
#[derive(Debug)]
pub struct Board {
    width: u16,
    height: u16,
    pixels: Box<[AtomicU8]>,
    dirty: Mutex<DirtySet>,
}

impl Board {
    /// A freshly blanked board, every pixel set to [`RgbColor::BLANK`].
    #[must_use]
    pub fn blank(width: u16, height: u16) -> Self {
        let byte_len = Self::byte_len(width, height);
        let mut bytes = Vec::with_capacity(byte_len);
        for _ in 0..(byte_len / 3) {
            bytes.push(RgbColor::BLANK.r);
            bytes.push(RgbColor::BLANK.g);
            bytes.push(RgbColor::BLANK.b);
        }
        Self::from_bytes(width, height, &bytes).unwrap_or_else(|_| Self::empty(width, height))
    }

    /// Adopts bytes loaded from storage; fails if their length doesn't match
    /// `width * height * 3` for the configured dimensions.
    pub fn from_bytes(width: u16, height: u16, bytes: &[u8]) -> DomainResult<Self> {
        let expected = Self::byte_len(width, height);
        if bytes.len() != expected {
            return Err(DomainError::DimensionMismatch(format!(
                "expected {expected} bytes for a {width}x{height} board, got {}",
                bytes.len()
            )));
        }

        let pixels = bytes.iter().map(|&b| AtomicU8::new(b)).collect();
        let pixel_count = usize::from(width) * usize::from(height);
        Ok(Self {
            width,
            height,
            pixels,
            dirty: Mutex::new(DirtySet::new(pixel_count)),
        })
    }

    fn empty(width: u16, height: u16) -> Self {
        let byte_len = Self::byte_len(width, height);
        let pixels = (0..byte_len).map(|_| AtomicU8::new(0)).collect();
        let pixel_count = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            pixels,
            dirty: Mutex::new(DirtySet::new(pixel_count)),
        }
    }

    fn byte_len(width: u16, height: u16) -> usize {
        usize::from(width) * usize::from(height) * 3
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Writes a pixel. Returns `false` (without touching the dirty set) if
    /// the coordinate is out of bounds.
    pub fn set(&self, coord: PixelCoord, color: RgbColor) -> bool {
        let Some(pixel_index) = coord.to_index(self.width, self.height) else {
            return false;
        };
        let byte_index = pixel_index * 3;

        let Some(r) = self.pixels.get(byte_index) else {
            return false;
        };
        let Some(g) = self.pixels.get(byte_index + 1) else {
            return false;
        };
        let Some(b) = self.pixels.get(byte_index + 2) else {
            return false;
        };

        r.store(color.r, Ordering::Relaxed);
        g.store(color.g, Ordering::Relaxed);
        b.store(color.b, Ordering::Relaxed);

        if let Ok(mut dirty) = self.dirty.lock() {
            dirty.mark(pixel_index);
        }

        true
    }

    /// A copy of the full grid in row-major R,G,B order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .collect()
    }

    fn pixel_color(&self, pixel_index: usize) -> RgbColor {
        let byte_index = pixel_index * 3;
        let r = self
            .pixels
            .get(byte_index)
            .map_or(0, |b| b.load(Ordering::Relaxed));
        let g = self
            .pixels
            .get(byte_index + 1)
            .map_or(0, |b| b.load(Ordering::Relaxed));
        let b = self
            .pixels
            .get(byte_index + 2)
            .map_or(0, |b| b.load(Ordering::Relaxed));
        RgbColor::new(r, g, b)
    }

    /// Atomically (with respect to concurrent `set` calls) returns and clears
    /// the set of pixels dirtied since the previous drain, each tagged with
    /// its current color.
    pub fn drain_dirty(&self) -> Vec<DirtyPixel> {
        let indices = self
            .dirty
            .lock()
            .map(|mut dirty| dirty.drain())
            .unwrap_or_default();

        indices
            .into_iter()
            .map(|index| {
                let pixel_index = index as usize;
                DirtyPixel {
                    coord: PixelCoord::from_index(pixel_index, self.width),
                    color: self.pixel_color(pixel_index),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_board_is_filled_with_the_default_gray() {
        let board = Board::blank(2, 2);
        assert_eq!(board.snapshot(), vec![170; 2 * 2 * 3]);
    }

    #[test]
    fn set_out_of_bounds_is_rejected_and_not_dirtied() {
        let board = Board::blank(4, 2);
        assert!(!board.set(PixelCoord::new(10, 0), RgbColor::new(1, 2, 3)));
        assert!(board.drain_dirty().is_empty());
    }

    #[test]
    fn latest_write_wins_between_drains() {
        let board = Board::blank(4, 2);
        let coord = PixelCoord::new(0, 0);
        assert!(board.set(coord, RgbColor::new(1, 1, 1)));
        assert!(board.set(coord, RgbColor::new(9, 9, 9)));

        let dirty = board.drain_dirty();
        assert_eq!(dirty.len(), 1);
        let pixel = dirty.first().expect("one dirty pixel");
        assert_eq!(pixel.coord, coord);
        assert_eq!(pixel.color, RgbColor::new(9, 9, 9));
    }

    #[test]
    fn drain_clears_the_dirty_set() {
        let board = Board::blank(4, 2);
        assert!(board.set(PixelCoord::new(1, 0), RgbColor::new(5, 5, 5)));
        assert_eq!(board.drain_dirty().len(), 1);
        assert!(board.drain_dirty().is_empty());
    }

    #[test]
    fn from_bytes_round_trips_a_snapshot() {
        let board = Board::blank(4, 2);
        board.set(PixelCoord::new(2, 1), RgbColor::new(7, 8, 9));

        let bytes = board.snapshot();
        let reloaded = Board::from_bytes(4, 2, &bytes).expect("matching dimensions");
        assert_eq!(reloaded.snapshot(), bytes);
    }

    #[test]
    fn from_bytes_rejects_mismatched_length() {
        let err = Board::from_bytes(4, 2, &[0; 5]).expect_err("wrong length");
        assert!(matches!(err, DomainError::DimensionMismatch(_)));
    }
}
