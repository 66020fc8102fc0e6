//! Localdev Binary - Offline development harness
//!
//! Resolves every external dependency to its offline emulator and serves
//! the emulated content-host API over HTTP, so SDKs pointed at localhost
//! and raw calls caught by the interceptor behave identically.

use offstage::adapters::emulated::http;
use offstage::application::Services;
use offstage::config::EmulationConfig;

#[tokio::main]
async fn main() {
    let config = EmulationConfig::from_env();

    tracing_subscriber::fmt::init();

    if !config.use_local_dev {
        eprintln!("localdev requires USE_LOCAL_DEV=true; refusing to start live clients");
        std::process::exit(1);
    }

    let services = match Services::resolve(&config) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("Failed to resolve services: {:?}", e);
            std::process::exit(1);
        }
    };

    let host = match services.emulated_host {
        Some(host) => host,
        None => {
            eprintln!("Emulated content host missing in local dev mode");
            std::process::exit(1);
        }
    };
    println!("Tracking {} emulated videos", host.len());

    let app = http::router(host);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
        .expect("Failed to bind TCP listener");
    println!(
        "Emulated content-host API listening at {}:{}",
        config.addr, config.port
    );
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
