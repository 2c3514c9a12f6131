#[async_trait::async_trait]
pub trait AdminUseCase: Send + Sync {
    /// `token` must equal the configured admin token; callers are expected
    /// to have already checked that before invoking this use case in
    /// practice, but the check is repeated here as the authoritative gate.
    fn authorize(&self, token: &str) -> bool;

    async fn ban_uid(&self, uid: u32);
    async fn unban_uid(&self, uid: u32);
}
