use tokio::net::TcpListener;

use folio::{app, AppState, Config, FolioError, Logger};

#[tokio::main]
async fn main() -> Result<(), FolioError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env()?;
    if !config.content_dir.is_dir() {
        log::error!("Content directory {:?} does not exist", config.content_dir);
        return Err(FolioError::NotFound);
    }
    let addr = config.socket_addr()?;

    let state = AppState::load(config)?;
    let listener = TcpListener::bind(addr).await?;
    log::info!("Folio listening on http://{}", addr);
    axum::serve(listener, app(state)).await.map_err(FolioError::from)
}
