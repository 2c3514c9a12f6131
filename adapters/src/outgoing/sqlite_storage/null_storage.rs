use application::error::AppResult;
use application::ports::outgoing::storage::{StoragePort, StoredToken};
use domain::token::Token;

/// The storage adapter wired in when `useDB=false`: satisfies `StoragePort`
/// without touching disk, so the paint pipeline never has to special-case
/// persistence.
#[derive(Default, Clone, Copy)]
pub struct NullStorageAdapter;

#[async_trait::async_trait]
impl StoragePort for NullStorageAdapter {
    async fn load_board(&self) -> AppResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn save_board(&self, _width: u16, _height: u16, _pixels: &[u8]) -> AppResult<()> {
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
