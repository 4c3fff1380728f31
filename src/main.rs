// --- YourPlan - servidor de inscripción ---

use std::io;

use yourplan::config::AppConfig;
use yourplan::{logging, run_server, store};

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    logging::init(&config.log_filter);

    store::init_db(&config.db_path).map_err(io::Error::other)?;
    tracing::info!(db = %config.db_path.display(), "database ready");

    run_server(config).await
}
