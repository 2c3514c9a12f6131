pub mod events_broadcast;
pub mod image_rs;
pub mod reqwest_paste_client;
pub mod sqlite_storage;
