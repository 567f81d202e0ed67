//! Tracker Shortener Service Entry Point
//!
//! Initializes configuration, storage, services, and starts the HTTP server.

use tracker_shortener::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run().await
}
