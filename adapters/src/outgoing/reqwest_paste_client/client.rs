use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{instrument, warn};

use application::ports::outgoing::paste_client::{PasteClientPort, PasteFetchError, PasteRecord};

#[derive(Debug, Deserialize)]
struct PasteEnvelope {
    code: i32,
    data: Option<PasteData>,
}

#[derive(Debug, Deserialize)]
struct PasteData {
    paste: PastePayload,
}

#[derive(Debug, Deserialize)]
struct PastePayload {
    user: PasteUser,
    data: String,
}

#[derive(Debug, Deserialize)]
struct PasteUser {
    uid: u32,
}

/// Talks to the paste-proof service this server bootstraps tokens against.
/// `base_url` is joined with the paste id to form the request URL, e.g.
/// `https://paste.example.com/api/paste/{id}`.
pub struct ReqwestPasteClient {
    http: Client,
    base_url: String,
}

impl ReqwestPasteClient {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl PasteClientPort for ReqwestPasteClient {
    #[instrument(skip(self))]
    async fn fetch_paste(&self, paste_id: &str) -> Result<PasteRecord, PasteFetchError> {
        let url = format!("{}/{paste_id}", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| PasteFetchError::Transport(err.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PasteFetchError::NotFound);
        }
        if !response.status().is_success() {
            return Err(PasteFetchError::Transport(format!(
                "paste service returned {}",
                response.status()
            )));
        }

        let envelope: PasteEnvelope = response
            .json()
            .await
            .map_err(|err| PasteFetchError::Transport(err.to_string()))?;

        if envelope.code != 200 {
            return Err(PasteFetchError::Transport(format!(
                "paste service responded with code {}",
                envelope.code
            )));
        }

        let data = envelope.data.ok_or_else(|| {
            warn!("paste service returned code 200 with no data payload");
            PasteFetchError::Transport("missing paste data".to_string())
        })?;

        Ok(PasteRecord {
            uid: data.paste.user.uid,
            data: data.paste.data,
        })
    }
}
