//! OctoPrint REST API print controller.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::reaction::PrintController;
use crate::settings::PrinterSettings;

/// Short deadline so a hung print host cannot stall the monitor loop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Pauses prints and dispatches gcode through the OctoPrint HTTP API.
pub struct OctoPrintClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl OctoPrintClient {
    pub fn new(settings: &PrinterSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn post(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let url = format!("{}{path}", self.api_url);
        self.http
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("Failed to reach print host at {url}"))?
            .error_for_status()
            .with_context(|| format!("Print host rejected request to {path}"))?;
        Ok(())
    }
}

impl PrintController for OctoPrintClient {
    fn pause_print(&mut self) -> Result<()> {
        self.post(
            "/api/job",
            serde_json::json!({ "command": "pause", "action": "pause" }),
        )
    }

    fn send_commands(&mut self, gcode: &str) -> Result<()> {
        let commands: Vec<&str> = gcode
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if commands.is_empty() {
            return Ok(());
        }

        self.post(
            "/api/printer/command",
            serde_json::json!({ "commands": commands }),
        )
    }
}
