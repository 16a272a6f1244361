//! webtts server.
//!
//! Usage:
//!   webtts --signature-key <KEY> [--listen :3000] [--log-level info]
//!
//! All flags can also be set through the environment (`SIGNATURE_KEY`,
//! `LISTEN`, `LOG_LEVEL`, `GOOGLE_TTS_API_KEY`, `AZURE_SPEECH_RESOURCE_KEY`,
//! `AZURE_SPEECH_REGION`, ...).

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use webtts::{server, telemetry, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    telemetry::init(&settings.log_level).context("Unable to set up logging")?;
    settings
        .validate()
        .context("Unable to parse commandline options")?;

    info!(version = env!("CARGO_PKG_VERSION"), "webtts starting");
    server::serve(&settings).await.context("Server failed")?;
    Ok(())
}
