use std::sync::Arc;

use crate::error::AppResult;
use crate::infrastructure_config::Config;
use crate::ports::incoming::tokens::{TokenIssuanceUseCase, TokenIssueError};
use crate::ports::outgoing::paste_client::{DynPasteClientPort, PasteFetchError};
use crate::tokens::service::TokenRegistryService;
use domain::token::Token;

pub struct TokenIssuer {
    paste_client: DynPasteClientPort,
    registry: Arc<TokenRegistryService>,
    config: Arc<Config>,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(
        paste_client: DynPasteClientPort,
        registry: Arc<TokenRegistryService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            paste_client,
            registry,
            config,
        }
    }
}

#[async_trait::async_trait]
impl TokenIssuanceUseCase for TokenIssuer {
    async fn generate_token(
        &self,
        uid: u32,
        paste_id: &str,
    ) -> AppResult<Result<Token, TokenIssueError>> {
        if let Some(max_allowed) = self.config.max_allowed_uid {
            if uid > max_allowed {
                return Ok(Err(TokenIssueError::UidNotAllowed));
            }
        }

        let paste = match self.paste_client.fetch_paste(paste_id).await {
            Ok(paste) => paste,
            Err(PasteFetchError::NotFound) => return Ok(Err(TokenIssueError::PasteNotFound)),
            Err(PasteFetchError::Transport(message)) => {
                return Err(crate::error::AppError::PasteTransportError { message });
            }
        };

        if paste.uid != uid {
            return Ok(Err(TokenIssueError::UidMismatch));
        }

        if paste.data != self.config.validation_paste {
            return Ok(Err(TokenIssueError::ContentMismatch));
        }

        let token = self.registry.issue(uid).await?;
        Ok(Ok(token))
    }
}
