use crate::error::AppResult;
use domain::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenIssueError {
    PasteNotFound,
    UidMismatch,
    ContentMismatch,
    UidNotAllowed,
}

#[async_trait::async_trait]
pub trait TokenIssuanceUseCase: Send + Sync {
    /// Runs the paste-proof check, then rotates the uid's token if it
    /// passes. `Ok(Err(_))` carries a structured, client-facing rejection;
    /// `Err(_)` is reserved for unexpected transport/storage failures.
    async fn generate_token(
        &self,
        uid: u32,
        paste_id: &str,
    ) -> AppResult<Result<Token, TokenIssueError>>;
}
