//! `wkhtmltopdf` process driver.
//!
//! One process per job: HTML is piped on stdin (`-`) and the PDF is read
//! from stdout (`-`).

use std::io::Write;
use std::process::{Command, Stdio};

use crate::config::EngineConfig;
use crate::conversion::ResolvedRenderOptions;
use crate::render::engine::{PdfEngine, RenderError, RenderResult};

/// Drives an installed `wkhtmltopdf` binary.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfEngine {
    binary: String,
    extra_args: Vec<String>,
}

impl WkhtmltopdfEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Full argument list for one job.
    pub fn args(&self, options: &ResolvedRenderOptions) -> Vec<String> {
        let mut args = vec!["--quiet".to_string()];

        let mut push = |flag: &str, value: String| {
            args.push(flag.to_string());
            args.push(value);
        };

        push("--orientation", options.orientation.to_string());
        push("--page-size", options.page_size.to_string());
        push("--dpi", options.dpi.to_string());

        let numeric = [
            ("--image-dpi", options.image_dpi),
            ("--image-quality", options.image_quality),
            ("--margin-bottom", options.margin_bottom),
            ("--margin-top", options.margin_top),
            ("--margin-left", options.margin_left),
            ("--margin-right", options.margin_right),
        ];
        for (flag, value) in numeric {
            if let Some(value) = value {
                push(flag, value.to_string());
            }
        }

        if options.no_collate {
            args.push("--no-collate".to_string());
        }
        if options.grayscale == Some(true) {
            args.push("--grayscale".to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args.push("-".to_string());
        args.push("-".to_string());
        args
    }
}

impl PdfEngine for WkhtmltopdfEngine {
    fn render(&self, html: &str, options: &ResolvedRenderOptions) -> RenderResult<Vec<u8>> {
        let mut child = Command::new(&self.binary)
            .args(self.args(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(RenderError::Spawn)?;

        // Feed stdin from a separate thread so a large document cannot
        // deadlock against a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RenderError::Io(std::io::Error::other("engine stdin unavailable")))?;
        let input = html.as_bytes().to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output()?;
        let write_result = writer
            .join()
            .map_err(|_| RenderError::Join("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // A broken pipe after a successful exit means the engine stopped
        // reading early; its output is still authoritative.
        if let Err(e) = write_result {
            tracing::debug!(error = %e, "engine closed stdin before all input was written");
        }
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }

        Ok(output.stdout)
    }

    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }
}
