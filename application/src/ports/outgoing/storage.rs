use std::sync::Arc;

use crate::error::AppResult;
use domain::token::Token;

/// A stored token row, as it comes back out of the `tokens` table.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub token: Token,
}

#[async_trait::async_trait]
pub trait StoragePort: Send + Sync {
    async fn load_board(&self) -> AppResult<Option<Vec<u8>>>;
    async fn save_board(&self, width: u16, height: u16, pixels: &[u8]) -> AppResult<()>;

    async fn load_all_tokens(&self) -> AppResult<Vec<StoredToken>>;
    async fn save_token(&self, token: Token) -> AppResult<()>;
    async fn delete_tokens_by_uid(&self, uid: u32) -> AppResult<()>;

    /// Imports the legacy `tokens` table from a standalone database file, if
    /// one exists at the configured path. Returns the number of rows
    /// imported.
    async fn import_legacy_tokens(&self, legacy_path: &str) -> AppResult<usize>;
}

pub type DynStoragePort = Arc<dyn StoragePort>;
