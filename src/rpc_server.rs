//! tabkeeper host bridge: runs the background process over stdin/stdout.
//!
//! Protocol: one JSON object per line, see `tabkeeper::rpc_handler`.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tabkeeper::app::App;
use tabkeeper::database::open_storage;
use tabkeeper::logging;
use tabkeeper::rpc_handler::{route_inbound, StdioHost};
use tabkeeper::services::host::BrowserHost;
use tabkeeper::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabkeeper::types::errors::AppError;
use tabkeeper::types::settings::KeeperSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut settings_engine = SettingsEngine::new(None);
    let loaded = settings_engine.load();
    let settings = settings_engine.get_settings().clone();
    logging::init(&settings.logging.filter);
    if let Err(e) = loaded {
        let path = settings_engine.get_config_path().display();
        warn!(error = %e, path = %path, "using default settings");
    }

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "tabkeeper stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: KeeperSettings) -> Result<(), AppError> {
    let storage = open_storage(&settings.storage)?;

    let host = Arc::new(StdioHost::new(tokio::io::stdout()));
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let router = tokio::spawn(route_inbound(
        BufReader::new(tokio::io::stdin()),
        host.clone(),
        events_tx,
    ));
    host.announce_ready().await?;

    let browser: Arc<dyn BrowserHost> = host;
    let mut app = App::start(&settings, storage, browser).await;
    info!("tabkeeper running");

    // Ends when the host closes stdin.
    while let Some(event) = events_rx.recv().await {
        debug!(kind = event.kind(), "host event");
        app.handle_event(event);
    }

    if let Some(report) = app.shutdown().await {
        info!(
            restored = report.groups_restored,
            failed = report.groups_failed,
            "restoration summary"
        );
    }
    match router.await {
        Ok(result) => result.map_err(AppError::from),
        Err(e) => {
            warn!(error = %e, "bridge task ended abnormally");
            Ok(())
        }
    }
}
