use dashmap::DashMap;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::error::AppResult;
use crate::ports::outgoing::storage::DynStoragePort;
use domain::token::Token;

/// The Token Registry: an in-memory mirror of the `tokens` table, kept
/// consistent with it through every mutating call.
///
/// `issue` is the only operation that can race with itself across uids, so
/// it is serialized behind `issue_lock` rather than trying to make the two
/// maps and the storage write atomic some other way — simplest correct
/// strategy for a registry this small.
pub struct TokenRegistryService {
    by_token: DashMap<Uuid, u32>,
    by_uid: DashMap<u32, Uuid>,
    storage: DynStoragePort,
    issue_lock: AsyncMutex<()>,
}

impl TokenRegistryService {
    #[must_use]
    pub fn new(storage: DynStoragePort) -> Self {
        Self {
            by_token: DashMap::new(),
            by_uid: DashMap::new(),
            storage,
            issue_lock: AsyncMutex::new(()),
        }
    }

    /// Loads every row from storage into memory, then collapses any uid that
    /// (from a prior crash mid-rotation) maps to more than one token down to
    /// a single surviving binding.
    pub async fn load_all(&self) -> AppResult<()> {
        let rows = self.storage.load_all_tokens().await?;
        for row in rows {
            let uid = row.token.uid();
            if self.by_uid.contains_key(&uid) {
                continue;
            }
            self.by_uid.insert(uid, row.token.value());
            self.by_token.insert(row.token.value(), uid);
        }
        self.collapse_duplicates().await
    }

    /// Persists the in-memory uniqueness invariant back to storage: any uid
    /// with more than one stored row is trimmed down to the one this
    /// registry currently holds.
    pub async fn collapse_duplicates(&self) -> AppResult<()> {
        let rows = self.storage.load_all_tokens().await?;
        let mut seen = std::collections::HashSet::new();
        for row in rows {
            let uid = row.token.uid();
            if !seen.insert(uid) {
                continue;
            }
            if let Some(current) = self.by_uid.get(&uid) {
                if *current != row.token.value() {
                    self.storage.delete_tokens_by_uid(uid).await?;
                    self.storage.save_token(Token::from_parts(*current, uid)).await?;
                }
            }
        }
        Ok(())
    }

    pub async fn issue(&self, uid: u32) -> AppResult<Token> {
        let _guard = self.issue_lock.lock().await;

        self.storage.delete_tokens_by_uid(uid).await?;
        let new_token = Token::generate(uid);
        self.storage.save_token(new_token).await?;

        if let Some((_, old_value)) = self.by_uid.remove(&uid) {
            self.by_token.remove(&old_value);
        }
        self.by_uid.insert(uid, new_token.value());
        self.by_token.insert(new_token.value(), uid);

        Ok(new_token)
    }

    #[must_use]
    pub fn lookup(&self, token_value: Uuid) -> Option<u32> {
        self.by_token.get(&token_value).map(|entry| *entry)
    }

    pub async fn revoke_by_uid(&self, uid: u32) -> AppResult<()> {
        if let Some((_, value)) = self.by_uid.remove(&uid) {
            self.by_token.remove(&value);
        }
        self.storage.delete_tokens_by_uid(uid).await
    }
}
