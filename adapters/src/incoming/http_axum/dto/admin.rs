use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BanUidRequest {
    pub token: String,
    pub uid: u32,
}
