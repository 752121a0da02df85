use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use topdf_gateway::conversion::ConversionRequest;
use topdf_gateway::http::ResponseEnvelope;

#[derive(Parser)]
#[command(name = "topdf-cli")]
#[command(about = "Client for the HTML to PDF conversion gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5010")]
    url: String,

    /// Shared credential in plain text (the decoded form of X_KEY).
    #[arg(short, long, env = "TOPDF_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the gateway is alive
    Ping,
    /// Convert an HTML file to PDF
    Convert {
        /// HTML input file
        input: PathBuf,
        /// Where to write the PDF
        #[arg(short, long)]
        output: PathBuf,
        /// File name reported to the server (defaults to the output file name)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        page_size: Option<String>,
        #[arg(long)]
        orientation: Option<String>,
        #[arg(long)]
        dpi: Option<u32>,
        #[arg(long)]
        image_dpi: Option<u32>,
        #[arg(long)]
        image_quality: Option<u32>,
        #[arg(long)]
        margin_top: Option<u32>,
        #[arg(long)]
        margin_bottom: Option<u32>,
        #[arg(long)]
        margin_left: Option<u32>,
        #[arg(long)]
        margin_right: Option<u32>,
        #[arg(long)]
        grayscale: Option<bool>,
        #[arg(long)]
        nocollate: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Ping => {
            let res = client.get(format!("{}/ping", cli.url)).send().await?;
            let status = res.status();
            println!("{} {}", status, res.text().await?);
        }
        Commands::Convert {
            input,
            output,
            name,
            page_size,
            orientation,
            dpi,
            image_dpi,
            image_quality,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
            grayscale,
            nocollate,
        } => {
            let html = tokio::fs::read(&input).await?;
            let name = name.unwrap_or_else(|| {
                output
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document.pdf".to_string())
            });

            let request = ConversionRequest {
                html: Base64.encode(html),
                name,
                nocollate,
                page_size,
                orientation,
                dpi,
                margin_bottom,
                margin_top,
                margin_left,
                margin_right,
                image_dpi,
                image_quality,
                grayscale,
            };

            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Basic {}", Base64.encode(cli.key.trim())))?,
            );

            let res = client
                .post(format!("{}/v1/api/topdf", cli.url))
                .headers(headers)
                .json(&request)
                .send()
                .await?;

            let status = res.status();
            if !status.is_success() {
                let text = res.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ResponseEnvelope>(&text)
                    .map(|envelope| envelope.message)
                    .unwrap_or(text);
                eprintln!("Error: gateway returned status {}: {}", status, message);
                std::process::exit(1);
            }

            let bytes = res.bytes().await?;
            if bytes.is_empty() {
                eprintln!("Error: gateway returned an empty document (rendering failed?)");
                std::process::exit(1);
            }

            tokio::fs::write(&output, &bytes).await?;
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
    }

    Ok(())
}
