use std::sync::Arc;

/// A paste's content, as the core needs it: whose uid it belongs to and what
/// text it holds. Parsing the wire JSON and mapping transport-level statuses
/// (404, non-200, `code != 200`) is the adapter's job.
#[derive(Debug, Clone)]
pub struct PasteRecord {
    pub uid: u32,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteFetchError {
    NotFound,
    Transport(String),
}

#[async_trait::async_trait]
pub trait PasteClientPort: Send + Sync {
    async fn fetch_paste(&self, paste_id: &str) -> Result<PasteRecord, PasteFetchError>;
}

pub type DynPasteClientPort = Arc<dyn PasteClientPort>;
