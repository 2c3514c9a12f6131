use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::broadcast;

use application::ban::service::BanController;
use application::infrastructure_config::Config;
use application::ports::incoming::admin::AdminUseCase;
use application::ports::incoming::board::{BoardQueryUseCase, PersistenceUseCase, TickUseCase};
use application::ports::incoming::paint::PaintUseCase;
use application::ports::incoming::tokens::TokenIssuanceUseCase;
use application::ports::outgoing::image_codec::DynImageCodecPort;

/// Everything an HTTP handler or WebSocket connection needs, cloned cheaply
/// per request since every field is an `Arc` (or, for the broadcast senders,
/// a type that is itself cheap to clone).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub paint_use_case: Arc<dyn PaintUseCase>,
    pub board_query_use_case: Arc<dyn BoardQueryUseCase>,
    pub tick_use_case: Arc<dyn TickUseCase>,
    pub persistence_use_case: Arc<dyn PersistenceUseCase>,
    pub token_issuance_use_case: Arc<dyn TokenIssuanceUseCase>,
    pub admin_use_case: Arc<dyn AdminUseCase>,
    pub ban_controller: Arc<BanController>,
    pub tick_broadcast: broadcast::Sender<Vec<u8>>,
    /// Forces every connection from a given IP closed with the given close
    /// code. Published by the packet-rate window and the per-IP connection
    /// cap (§4.4); every `ConnectionHandler` subscribes and filters for its
    /// own IP, the same fan-out shape as `tick_broadcast`.
    pub close_signal: broadcast::Sender<(IpAddr, u16)>,
    pub image_codec: DynImageCodecPort,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        paint_use_case: Arc<dyn PaintUseCase>,
        board_query_use_case: Arc<dyn BoardQueryUseCase>,
        tick_use_case: Arc<dyn TickUseCase>,
        persistence_use_case: Arc<dyn PersistenceUseCase>,
        token_issuance_use_case: Arc<dyn TokenIssuanceUseCase>,
        admin_use_case: Arc<dyn AdminUseCase>,
        ban_controller: Arc<BanController>,
        tick_broadcast: broadcast::Sender<Vec<u8>>,
        close_signal: broadcast::Sender<(IpAddr, u16)>,
        image_codec: DynImageCodecPort,
    ) -> Self {
        Self {
            config,
            paint_use_case,
            board_query_use_case,
            tick_use_case,
            persistence_use_case,
            token_issuance_use_case,
            admin_use_case,
            ban_controller,
            tick_broadcast,
            close_signal,
            image_codec,
        }
    }
}
