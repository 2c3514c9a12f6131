use domain::board::DirtyPixel;

use crate::error::AppResult;

#[async_trait::async_trait]
pub trait BoardQueryUseCase: Send + Sync {
    /// The full W x H x 3 grid, as it stands right now.
    async fn snapshot(&self) -> Vec<u8>;

    fn dimensions(&self) -> (u16, u16);
}

#[async_trait::async_trait]
pub trait TickUseCase: Send + Sync {
    /// Drains the dirty set and returns the pixels to broadcast this tick.
    /// Called exactly once per tick, from the tick scheduler.
    async fn drain_tick(&self) -> Vec<DirtyPixel>;
}

#[async_trait::async_trait]
pub trait PersistenceUseCase: Send + Sync {
    async fn save_now(&self) -> AppResult<()>;
}
