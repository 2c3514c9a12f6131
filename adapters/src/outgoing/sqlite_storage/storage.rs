use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{info, instrument};

use application::error::{AppError, AppResult};
use application::ports::outgoing::storage::{StoragePort, StoredToken};
use domain::token::Token;

/// Persists the board and token tables described in the external
/// interfaces section: one `board_data` row, keyed `id=1`, and a `tokens`
/// table keyed by the token's canonical string form.
pub struct SqliteStorageAdapter {
    pool: SqlitePool,
}

impl SqliteStorageAdapter {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|err| AppError::StorageError {
                message: format!("failed to open database: {err}"),
            })?;

        let adapter = Self { pool };
        adapter.run_migrations().await?;
        Ok(adapter)
    }

    async fn run_migrations(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS board_data (
                id INTEGER PRIMARY KEY CHECK(id = 1),
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                pixels BLOB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error("failed to create board_data table"))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tokens (
                token TEXT PRIMARY KEY,
                uid INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error("failed to create tokens table"))?;

        info!("sqlite schema ready");
        Ok(())
    }
}

fn storage_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |err| AppError::StorageError {
        message: format!("{context}: {err}"),
    }
}

#[async_trait::async_trait]
impl StoragePort for SqliteStorageAdapter {
    #[instrument(skip(self))]
    async fn load_board(&self) -> AppResult<Option<Vec<u8>>> {
        let row = sqlx::query("SELECT pixels FROM board_data WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("failed to load board"))?;

        Ok(row.map(|row| row.get::<Vec<u8>, _>("pixels")))
    }

    #[instrument(skip(self, pixels))]
    async fn save_board(&self, width: u16, height: u16, pixels: &[u8]) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO board_data (id, width, height, pixels) VALUES (1, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET width = excluded.width, height = excluded.height, pixels = excluded.pixels",
        )
        .bind(i64::from(width))
        .bind(i64::from(height))
        .bind(pixels)
        .execute(&self.pool)
        .await
        .map_err(storage_error("failed to save board"))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_all_tokens(&self) -> AppResult<Vec<StoredToken>> {
        let rows = sqlx::query("SELECT token, uid FROM tokens")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("failed to load tokens"))?;

        rows.into_iter()
            .map(|row| decode_token_row(&row))
            .collect()
    }

    #[instrument(skip(self))]
    async fn save_token(&self, token: Token) -> AppResult<()> {
        sqlx::query("INSERT INTO tokens (token, uid) VALUES (?, ?) ON CONFLICT(token) DO UPDATE SET uid = excluded.uid")
            .bind(token.to_canonical_string())
            .bind(i64::from(token.uid()))
            .execute(&self.pool)
            .await
            .map_err(storage_error("failed to save token"))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_tokens_by_uid(&self, uid: u32) -> AppResult<()> {
        sqlx::query("DELETE FROM tokens WHERE uid = ?")
            .bind(i64::from(uid))
            .execute(&self.pool)
            .await
            .map_err(storage_error("failed to delete tokens"))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn import_legacy_tokens(&self, legacy_path: &str) -> AppResult<usize> {
        let legacy_url = format!("sqlite://{legacy_path}");
        let legacy_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&legacy_url)
            .await
            .map_err(storage_error("failed to open legacy database"))?;

        let rows = sqlx::query("SELECT token, uid FROM tokens")
            .fetch_all(&legacy_pool)
            .await
            .map_err(storage_error("failed to read legacy tokens"))?;

        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(storage_error("failed to begin legacy import transaction"))?;

        let mut imported = 0usize;
        for row in &rows {
            let token: String = row.get("token");
            let uid: i64 = row.get("uid");
            let inserted = sqlx::query(
                "INSERT INTO tokens (token, uid) VALUES (?, ?) ON CONFLICT(token) DO NOTHING",
            )
            .bind(token)
            .bind(uid)
            .execute(&mut *transaction)
            .await
            .map_err(storage_error("failed to import a legacy token row"))?;
            imported += usize::try_from(inserted.rows_affected()).unwrap_or(0);
        }

        transaction
            .commit()
            .await
            .map_err(storage_error("failed to commit legacy import"))?;

        Ok(imported)
    }
}

fn decode_token_row(row: &sqlx::sqlite::SqliteRow) -> AppResult<StoredToken> {
    let raw: String = row.get("token");
    let uid: i64 = row.get("uid");
    let uid = u32::try_from(uid).map_err(|_| AppError::StorageError {
        message: format!("stored uid {uid} does not fit in u32"),
    })?;
    let value = uuid::Uuid::parse_str(&raw).map_err(|err| AppError::StorageError {
        message: format!("stored token {raw} is not a valid uuid: {err}"),
    })?;
    Ok(StoredToken {
        token: Token::from_parts(value, uid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_board_and_a_token() {
        let adapter = SqliteStorageAdapter::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite opens");

        assert!(adapter.load_board().await.expect("load succeeds").is_none());

        adapter
            .save_board(2, 1, &[1, 2, 3, 4, 5, 6])
            .await
            .expect("save succeeds");
        let loaded = adapter.load_board().await.expect("load succeeds");
        assert_eq!(loaded, Some(vec![1, 2, 3, 4, 5, 6]));

        let token = Token::generate(7);
        adapter.save_token(token).await.expect("save token succeeds");
        let tokens = adapter.load_all_tokens().await.expect("load tokens succeeds");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token.uid(), 7);

        adapter.delete_tokens_by_uid(7).await.expect("delete succeeds");
        assert!(adapter.load_all_tokens().await.expect("load tokens succeeds").is_empty());
    }
}
