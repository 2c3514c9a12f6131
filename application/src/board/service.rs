use std::sync::Arc;

use crate::ports::incoming::board::{BoardQueryUseCase, TickUseCase};
use domain::board::{Board, DirtyPixel};

pub struct BoardService {
    board: Arc<Board>,
}

impl BoardService {
    #[must_use]
    pub fn new(board: Arc<Board>) -> Self {
        Self { board }
    }

    #[must_use]
    pub fn board(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }
}

#[async_trait::async_trait]
impl BoardQueryUseCase for BoardService {
    async fn snapshot(&self) -> Vec<u8> {
        self.board.snapshot()
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.board.width(), self.board.height())
    }
}

#[async_trait::async_trait]
impl TickUseCase for BoardService {
    async fn drain_tick(&self) -> Vec<DirtyPixel> {
        self.board.drain_dirty()
    }
}

/// Encodes a tick's dirty pixels as the concatenated `0xFA` broadcast
/// records the Tick Scheduler publishes once per tick. An empty `dirty`
/// slice yields an empty frame — every connection still wakes up for the
/// tick, it just has nothing new to flush.
#[must_use]
pub fn encode_broadcast_frame(dirty: &[DirtyPixel]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(dirty.len() * 8);
    for pixel in dirty {
        frame.push(0xFA);
        frame.extend_from_slice(&pixel.coord.x.to_le_bytes());
        frame.extend_from_slice(&pixel.coord.y.to_le_bytes());
        frame.push(pixel.color.r);
        frame.push(pixel.color.g);
        frame.push(pixel.color.b);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::color::RgbColor;
    use domain::coords::PixelCoord;

    #[test]
    fn encodes_one_eight_byte_record_per_pixel() {
        let dirty = vec![DirtyPixel {
            coord: PixelCoord::new(1, 0),
            color: RgbColor::new(255, 0, 0),
        }];
        let frame = encode_broadcast_frame(&dirty);
        assert_eq!(frame, vec![0xFA, 0x01, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00]);
    }

    #[test]
    fn empty_dirty_set_encodes_to_an_empty_frame() {
        assert!(encode_broadcast_frame(&[]).is_empty());
    }

    #[tokio::test]
    async fn drain_tick_clears_the_dirty_set() {
        let board = Arc::new(Board::blank(4, 2));
        board.set(PixelCoord::new(0, 0), RgbColor::new(9, 9, 9));
        let service = BoardService::new(board);

        let dirty = service.drain_tick().await;
        assert_eq!(dirty.len(), 1);
        assert!(service.drain_tick().await.is_empty());
    }
}
