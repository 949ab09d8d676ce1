use actix_web::{App, HttpServer};
use std::io::Result;
use tracing_subscriber::EnvFilter;

mod api;

/// Four🍀bar kinematics server.
#[derive(clap::Parser)]
#[clap(name = env!("CARGO_PKG_NAME"), version, author, about)]
struct Entry {
    /// Bind address
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    /// Set port
    #[clap(short, long, default_value_t = 5000)]
    port: u16,
    /// Input angle step in degrees, if the request omits it
    #[clap(long, default_value_t = 1.)]
    step_deg: f64,
    /// Crank speed in RPM, if the request omits it
    #[clap(long, default_value_t = 30.)]
    rpm: f64,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    let Entry { host, port, step_deg, rpm } = <Entry as clap::Parser>::parse();
    let defaults = api::Defaults { step_deg, rpm };
    tracing::info!("Serve at: http://{host}:{port}/");
    tracing::info!("Press Ctrl+C to close the server...");
    HttpServer::new(move || App::new().configure(api::config(defaults)))
        .bind((host.as_str(), port))?
        .run()
        .await
}
