use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use time::OffsetDateTime;

use crate::ban::service::BanController;
use crate::ports::incoming::paint::PaintUseCase;
use crate::tokens::service::TokenRegistryService;
use domain::board::Board;
use domain::color::RgbColor;
use domain::coords::PixelCoord;
use domain::result_code::ResultCode;

/// Validates and applies one paint attempt. Every step is synchronous and
/// never suspends, so a `try_paint` call observes a single consistent
/// snapshot of the registry, cooldown table, and pixel store — no other
/// `try_paint` call interleaves with the Pixel Store write it makes.
pub struct PaintEngine {
    board: Arc<Board>,
    token_registry: Arc<TokenRegistryService>,
    ban_controller: Arc<BanController>,
    cooldown: DashMap<u32, OffsetDateTime>,
    paint_delay: Duration,
}

impl PaintEngine {
    #[must_use]
    pub fn new(
        board: Arc<Board>,
        token_registry: Arc<TokenRegistryService>,
        ban_controller: Arc<BanController>,
        paint_delay: Duration,
    ) -> Self {
        Self {
            board,
            token_registry,
            ban_controller,
            cooldown: DashMap::new(),
            paint_delay,
        }
    }
}

#[async_trait::async_trait]
impl PaintUseCase for PaintEngine {
    async fn try_paint(
        &self,
        token_value: uuid::Uuid,
        claimed_uid: u32,
        coord: PixelCoord,
        color: RgbColor,
        now: OffsetDateTime,
    ) -> ResultCode {
        if self.ban_controller.is_uid_banned(claimed_uid) {
            return ResultCode::NoPermission;
        }

        match self.token_registry.lookup(token_value) {
            Some(uid) if uid == claimed_uid => {}
            _ => return ResultCode::InvalidToken,
        }

        let cooldown_key = claimed_uid;
        if let Some(last_paint) = self.cooldown.get(&cooldown_key) {
            let elapsed = now - *last_paint;
            if elapsed < time::Duration::seconds_f64(self.paint_delay.as_secs_f64()) {
                return ResultCode::Cooling;
            }
        }

        if !self.board.set(coord, color) {
            return ResultCode::BadFormat;
        }

        self.cooldown.insert(cooldown_key, now);
        ResultCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitSettings;
    use crate::ports::outgoing::storage::StoragePort;
    use crate::ports::outgoing::storage::StoredToken;
    use crate::error::AppResult;
    use domain::token::Token;

    struct NullStorage;

    #[async_trait::async_trait]
    impl StoragePort for NullStorage {
        async fn load_board(&self) -> AppResult<Option<Vec<u8>>> {
            Ok(None)
        }
        async fn save_board(&self, _w: u16, _h: u16, _pixels: &[u8]) -> AppResult<()> {
            Ok(())
        }
        async fn load_all_tokens(&self) -> AppResult<Vec<StoredToken>> {
            Ok(Vec::new())
        }
        async fn save_token(&self, _token: Token) -> AppResult<()> {
            Ok(())
        }
        async fn delete_tokens_by_uid(&self, _uid: u32) -> AppResult<()> {
            Ok(())
        }
        async fn import_legacy_tokens(&self, _legacy_path: &str) -> AppResult<usize> {
            Ok(0)
        }
    }

    async fn engine_with_token(paint_delay_ms: u64) -> (PaintEngine, Token) {
        let board = Arc::new(Board::blank(4, 2));
        let registry = Arc::new(TokenRegistryService::new(Arc::new(NullStorage)));
        let token = registry.issue(42).await.expect("issue succeeds");
        let ban_controller = Arc::new(BanController::new(RateLimitSettings {
            max_packet_per_second: 128,
            max_web_socket_per_ip: 0,
            ban_duration: Duration::from_millis(60_000),
        }));
        let engine = PaintEngine::new(
            board,
            registry,
            ban_controller,
            Duration::from_millis(paint_delay_ms),
        );
        (engine, token)
    }

    #[tokio::test]
    async fn happy_paint_succeeds_and_sets_the_pixel() {
        let (engine, token) = engine_with_token(1000).await;
        let now = OffsetDateTime::now_utc();

        let result = engine
            .try_paint(
                token.value(),
                42,
                PixelCoord::new(1, 0),
                RgbColor::new(255, 0, 0),
                now,
            )
            .await;

        assert_eq!(result, ResultCode::Success);
    }

    #[tokio::test]
    async fn second_paint_within_delay_is_cooling() {
        let (engine, token) = engine_with_token(1000).await;
        let now = OffsetDateTime::now_utc();

        assert_eq!(
            engine
                .try_paint(
                    token.value(),
                    42,
                    PixelCoord::new(0, 0),
                    RgbColor::new(1, 1, 1),
                    now
                )
                .await,
            ResultCode::Success
        );

        let half_second_later = now + time::Duration::milliseconds(500);
        assert_eq!(
            engine
                .try_paint(
                    token.value(),
                    42,
                    PixelCoord::new(0, 0),
                    RgbColor::new(2, 2, 2),
                    half_second_later
                )
                .await,
            ResultCode::Cooling
        );
    }

    #[tokio::test]
    async fn wrong_uid_for_a_valid_token_is_invalid_token() {
        let (engine, token) = engine_with_token(0).await;
        let now = OffsetDateTime::now_utc();

        let result = engine
            .try_paint(
                token.value(),
                99,
                PixelCoord::new(0, 0),
                RgbColor::new(1, 1, 1),
                now,
            )
            .await;

        assert_eq!(result, ResultCode::InvalidToken);
    }

    #[tokio::test]
    async fn out_of_bounds_paint_is_bad_format() {
        let (engine, token) = engine_with_token(0).await;
        let now = OffsetDateTime::now_utc();

        let result = engine
            .try_paint(
                token.value(),
                42,
                PixelCoord::new(100, 0),
                RgbColor::new(1, 1, 1),
                now,
            )
            .await;

        assert_eq!(result, ResultCode::BadFormat);
    }

    #[tokio::test]
    async fn banned_uid_is_rejected_before_token_lookup() {
        let (engine, _token) = engine_with_token(0).await;
        engine.ban_controller.ban_uid(42);
        let now = OffsetDateTime::now_utc();

        let result = engine
            .try_paint(
                uuid::Uuid::nil(),
                42,
                PixelCoord::new(0, 0),
                RgbColor::new(1, 1, 1),
                now,
            )
            .await;

        assert_eq!(result, ResultCode::NoPermission);
    }
}
