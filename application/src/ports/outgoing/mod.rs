pub mod image_codec;
pub mod paste_client;
pub mod storage;
pub mod tick_broadcast;
