//! HTML-to-PDF conversion gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────────────┐
//!                    │                    TOPDF GATEWAY                        │
//!                    │                                                         │
//!  Client Request    │  ┌──────────┐   ┌────────────┐   ┌──────────────────┐  │
//!  ──────────────────┼─▶│  rate    │──▶│ admission  │──▶│ option resolver  │  │
//!                    │  │  limiter │   │ gate       │   │ (conversion)     │  │
//!                    │  └──────────┘   └────────────┘   └────────┬─────────┘  │
//!                    │                                            │            │
//!                    │                                            ▼            │
//!  Client Response   │  ┌──────────┐                    ┌──────────────────┐  │
//!  ◀─────────────────┼──│ response │◀───────────────────│ render adapter   │──┼──▶ wkhtmltopdf
//!                    │  │ builder  │                    │ (spawn_blocking) │  │
//!                    │  └──────────┘                    └──────────────────┘  │
//!                    │                                                         │
//!                    │   config · observability · lifecycle                    │
//!                    └────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "topdf-server")]
#[command(about = "Authenticated, rate-limited HTML to PDF conversion service", long_about = None)]
struct Args {
    /// Optional TOML configuration file. PORT_SERVER and X_KEY override it.
    #[arg(short, long, env = "TOPDF_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    topdf_gateway::lifecycle::startup::run(args.config.as_deref()).await?;
    Ok(())
}
