use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::infrastructure_config::Config;
use crate::ports::incoming::board::PersistenceUseCase;
use crate::ports::outgoing::storage::DynStoragePort;
use domain::board::Board;

pub struct PersistenceService {
    board: Arc<Board>,
    storage: DynStoragePort,
}

impl PersistenceService {
    #[must_use]
    pub fn new(board: Arc<Board>, storage: DynStoragePort) -> Self {
        Self { board, storage }
    }
}

#[async_trait::async_trait]
impl PersistenceUseCase for PersistenceService {
    async fn save_now(&self) -> AppResult<()> {
        let snapshot = self.board.snapshot();
        self.storage
            .save_board(self.board.width(), self.board.height(), &snapshot)
            .await
    }
}

/// Startup sequence from §4.7: import the legacy database if present, then
/// adopt the stored board unless `clearBoard` was requested (a storage
/// failure here falls back to a blank board rather than failing startup —
/// in-memory state stays authoritative per the storage error policy).
pub async fn load_initial_board(storage: &DynStoragePort, config: &Config) -> Arc<Board> {
    if config.clear_board {
        info!("clearBoard is set, starting from a blank board");
        return Arc::new(Board::blank(config.width, config.height));
    }

    match storage.load_board().await {
        Ok(Some(bytes)) => match Board::from_bytes(config.width, config.height, &bytes) {
            Ok(board) => Arc::new(board),
            Err(err) => {
                warn!(error = %err, "stored board dimensions do not match configuration, starting blank");
                Arc::new(Board::blank(config.width, config.height))
            }
        },
        Ok(None) => {
            info!("no stored board found, starting blank");
            Arc::new(Board::blank(config.width, config.height))
        }
        Err(err) => {
            warn!(error = %err, "failed to load stored board, starting blank");
            Arc::new(Board::blank(config.width, config.height))
        }
    }
}

/// Imports the legacy `liucang.db` tokens table, if the file exists, in a
/// single transaction boundary, then lets the caller run duplicate cleanup.
pub async fn import_legacy_tokens_if_present(
    storage: &DynStoragePort,
    legacy_path: &str,
) -> AppResult<usize> {
    if !std::path::Path::new(legacy_path).exists() {
        return Ok(0);
    }
    let imported = storage.import_legacy_tokens(legacy_path).await?;
    info!(imported, path = legacy_path, "imported legacy tokens");
    Ok(imported)
}
