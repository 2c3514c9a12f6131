use domain::color::RgbColor;
use domain::coords::PixelCoord;
use domain::result_code::ResultCode;
use time::OffsetDateTime;

#[async_trait::async_trait]
pub trait PaintUseCase: Send + Sync {
    /// Validates and applies a single pixel write. Never returns an error:
    /// every failure mode is expressed as a [`ResultCode`].
    async fn try_paint(
        &self,
        token_value: uuid::Uuid,
        claimed_uid: u32,
        coord: PixelCoord,
        color: RgbColor,
        now: OffsetDateTime,
    ) -> ResultCode;
}
