use serde::{Deserialize, Serialize};

use application::ports::incoming::tokens::TokenIssueError;

#[derive(Debug, Deserialize)]
pub struct GetTokenRequest {
    pub uid: u32,
    pub paste: String,
}

#[derive(Debug, Serialize)]
pub struct GetTokenSuccessBody {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: GetTokenSuccessData,
}

#[derive(Debug, Serialize)]
pub struct GetTokenSuccessData {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct GetTokenRejectedBody {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: GetTokenRejectedData,
}

#[derive(Debug, Serialize)]
pub struct GetTokenRejectedData {
    #[serde(rename = "errorType")]
    pub error_type: &'static str,
}

#[must_use]
pub fn error_type_for(error: TokenIssueError) -> &'static str {
    match error {
        TokenIssueError::PasteNotFound => "PASTE_NOT_FOUND",
        TokenIssueError::UidMismatch => "UID_MISMATCH",
        TokenIssueError::ContentMismatch => "CONTENT_MISMATCH",
        TokenIssueError::UidNotAllowed => "UID_NOT_ALLOWED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_token_issue_error_to_its_wire_name() {
        assert_eq!(error_type_for(TokenIssueError::PasteNotFound), "PASTE_NOT_FOUND");
        assert_eq!(error_type_for(TokenIssueError::UidMismatch), "UID_MISMATCH");
        assert_eq!(error_type_for(TokenIssueError::ContentMismatch), "CONTENT_MISMATCH");
        assert_eq!(error_type_for(TokenIssueError::UidNotAllowed), "UID_NOT_ALLOWED");
    }
}
