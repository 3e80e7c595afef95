use std::process::ExitCode;

use customer_service::{App, Settings};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing_subscriber::fmt::init();
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(settings.log_level))
        .init();

    if let Err(e) = settings.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let app = match App::connect(settings).await {
        Ok(app) => app,
        Err(e) => {
            error!("failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = if app.settings().is_test() {
        info!("test mode, not listening");
        app.close().await
    } else {
        app.listen().await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
