//! Text polishing through the correction sidecar.
//!
//! One model, one language, one handle: the `Corrector` is created once at
//! boot, asked to load its model during startup sequencing, and then invoked
//! directly per request. No per-language caching is needed here.

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct LoadRequest<'a> {
    model_dir: &'a str,
    disable_onednn_opts: bool,
}

#[derive(Debug, Serialize)]
struct CorrectRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CorrectResponse {
    #[serde(default)]
    #[allow(dead_code)]
    source: String,
    target: String,
}

/// Handle to the single pre-loaded correction model.
pub struct Corrector {
    client: reqwest::Client,
    base_url: String,
}

impl Corrector {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Ask the sidecar to load the model. Run once by the startup sequencer;
    /// the handle itself stays valid either way, so a failed load just means
    /// polish requests fail downstream.
    pub async fn load(
        &self,
        model_dir: &str,
        disable_onednn_opts: bool,
    ) -> Result<(), ServiceError> {
        let request = LoadRequest {
            model_dir,
            disable_onednn_opts,
        };

        let response = self
            .client
            .post(format!("{}/load", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest("correction", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Backend {
                backend: "correction",
                message: format!("model load failed ({}): {}", status, body),
            });
        }

        Ok(())
    }

    /// Correct `text`, returning the polished form.
    pub async fn correct(&self, text: &str) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(format!("{}/correct", self.base_url))
            .json(&CorrectRequest { text })
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest("correction", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Backend {
                backend: "correction",
                message: format!("{}: {}", status, body),
            });
        }

        let corrected: CorrectResponse =
            response.json().await.map_err(|e| ServiceError::Backend {
                backend: "correction",
                message: format!("invalid correct response: {}", e),
            })?;

        Ok(corrected.target)
    }
}
