use std::sync::Arc;

use tracing::error;
use webapp_login::config::{load_config, print_schema};
use webapp_login::startup;
use webapp_login::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    if std::env::args().nth(1).as_deref() == Some("print-schema") {
        if let Err(e) = print_schema() {
            eprintln!("Failed to render configuration schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = load_config();

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
