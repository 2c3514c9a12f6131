use std::sync::Arc;

use tokio::sync::broadcast;

use application::admin::service::AdminService;
use application::ban::service::BanController;
use application::board::service::BoardService;
use application::config::{PaintSettings, RateLimitSettings};
use application::error::AppResult;
use application::infrastructure_config::Config;
use application::paint::service::PaintEngine;
use application::persistence::service::{
    import_legacy_tokens_if_present, load_initial_board, PersistenceService,
};
use application::ports::incoming::admin::AdminUseCase;
use application::ports::incoming::board::{BoardQueryUseCase, PersistenceUseCase, TickUseCase};
use application::ports::incoming::paint::PaintUseCase;
use application::ports::incoming::tokens::TokenIssuanceUseCase;
use application::ports::outgoing::image_codec::DynImageCodecPort;
use application::ports::outgoing::paste_client::DynPasteClientPort;
use application::ports::outgoing::storage::DynStoragePort;
use application::tokens::issuer::TokenIssuer;
use application::tokens::service::TokenRegistryService;
use paintboard_adapters::outgoing::image_rs::webp_codec::ImageWebpAdapter;
use paintboard_adapters::outgoing::reqwest_paste_client::client::ReqwestPasteClient;
use paintboard_adapters::outgoing::sqlite_storage::null_storage::NullStorageAdapter;
use paintboard_adapters::outgoing::sqlite_storage::storage::SqliteStorageAdapter;
use paintboard_adapters::shared::app_state::AppState;

/// The paste-proof service this deployment bootstraps tokens against. Not a
/// recognized configuration key — every deployment of this board talks to
/// one fixed companion service, the same way the protocol's packet tags are
/// fixed rather than negotiated.
const PASTE_SERVICE_BASE_URL: &str = "https://paste.paintboard.internal/api/paste";

const PRIMARY_DATABASE_PATH: &str = "paintboard.db";
const LEGACY_TOKENS_PATH: &str = "liucang.db";

const TICK_BROADCAST_BUFFER: usize = 1024;
const CLOSE_SIGNAL_BUFFER: usize = 256;

pub async fn build_app_state(config: Arc<Config>) -> AppResult<AppState> {
    let storage: DynStoragePort = if config.use_db {
        Arc::new(SqliteStorageAdapter::connect(&format!("sqlite://{PRIMARY_DATABASE_PATH}?mode=rwc")).await?)
    } else {
        Arc::new(NullStorageAdapter)
    };

    let board = load_initial_board(&storage, &config).await;

    let token_registry = Arc::new(TokenRegistryService::new(Arc::clone(&storage)));
    import_legacy_tokens_if_present(&storage, LEGACY_TOKENS_PATH).await?;
    token_registry.load_all().await?;

    let rate_limit_settings = RateLimitSettings::from(config.as_ref());
    let ban_controller = Arc::new(BanController::new(rate_limit_settings));

    let paint_settings = PaintSettings::from(config.as_ref());
    let paint_engine: Arc<dyn PaintUseCase> = Arc::new(PaintEngine::new(
        Arc::clone(&board),
        Arc::clone(&token_registry),
        Arc::clone(&ban_controller),
        paint_settings.paint_delay,
    ));

    let board_service = Arc::new(BoardService::new(Arc::clone(&board)));
    let board_query_use_case: Arc<dyn BoardQueryUseCase> = Arc::clone(&board_service) as _;
    let tick_use_case: Arc<dyn TickUseCase> = Arc::clone(&board_service) as _;

    let persistence_use_case: Arc<dyn PersistenceUseCase> =
        Arc::new(PersistenceService::new(Arc::clone(&board), Arc::clone(&storage)));

    let paste_client: DynPasteClientPort =
        Arc::new(ReqwestPasteClient::new(PASTE_SERVICE_BASE_URL.to_string()));
    let token_issuance_use_case: Arc<dyn TokenIssuanceUseCase> = Arc::new(TokenIssuer::new(
        paste_client,
        Arc::clone(&token_registry),
        Arc::clone(&config),
    ));

    let admin_use_case: Arc<dyn AdminUseCase> = Arc::new(AdminService::new(
        Arc::clone(&ban_controller),
        Arc::clone(&config),
    ));

    let image_codec: DynImageCodecPort = Arc::new(ImageWebpAdapter::new());

    let (tick_broadcast, _) = broadcast::channel(TICK_BROADCAST_BUFFER);
    let (close_signal, _) = broadcast::channel(CLOSE_SIGNAL_BUFFER);

    Ok(AppState::new(
        config,
        paint_engine,
        board_query_use_case,
        tick_use_case,
        persistence_use_case,
        token_issuance_use_case,
        admin_use_case,
        ban_controller,
        tick_broadcast,
        close_signal,
        image_codec,
    ))
}
