//! Grammar checking against a LanguageTool-protocol HTTP server.
//!
//! Each language gets its own `GrammarTool` handle, created lazily on first
//! use and kept for the life of the process in `GrammarToolCache`.

use crate::error::ServiceError;
use crate::language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// One grammar issue found in the submitted text. `end` is exclusive:
/// `end == start + matched length`. At most three replacement suggestions
/// are kept per issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub start: usize,
    pub end: usize,
    pub message: String,
    pub replacements: Vec<String>,
}

// LanguageTool /v2/check response
#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

/// Handle bound to one canonical language code and one remote grammar server.
#[derive(Debug)]
pub struct GrammarTool {
    language: String,
    base_url: String,
    client: reqwest::Client,
}

impl GrammarTool {
    fn new(client: reqwest::Client, base_url: String, language: String) -> Self {
        Self {
            language,
            base_url,
            client,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Check `text` against the remote server and map each match to an
    /// `Issue`.
    pub async fn check(&self, text: &str) -> Result<Vec<Issue>, ServiceError> {
        let response = self
            .client
            .post(format!("{}/v2/check", self.base_url))
            .form(&[("language", self.language.as_str()), ("text", text)])
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest("grammar", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Backend {
                backend: "grammar",
                message: format!("{}: {}", status, body),
            });
        }

        let check: CheckResponse = response.json().await.map_err(|e| ServiceError::Backend {
            backend: "grammar",
            message: format!("invalid check response: {}", e),
        })?;

        Ok(check
            .matches
            .into_iter()
            .map(|m| Issue {
                start: m.offset,
                end: m.offset + m.length,
                message: m.message,
                replacements: m
                    .replacements
                    .into_iter()
                    .take(3)
                    .map(|r| r.value)
                    .collect(),
            })
            .collect())
    }
}

/// Process-wide cache of per-language grammar tool handles.
///
/// The whole lookup-construct-insert sequence runs under one lock with no
/// await point inside, so at most one handle is ever constructed per
/// language, even under concurrent first requests. There is no eviction;
/// growth is bounded by the set of distinct languages seen.
pub struct GrammarToolCache {
    client: reqwest::Client,
    base_url: String,
    tools: Mutex<HashMap<String, Arc<GrammarTool>>>,
}

impl GrammarToolCache {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url,
            tools: Mutex::new(HashMap::new()),
        }
    }

    /// Return the handle for `lang`, constructing it on first use.
    pub async fn get_or_create(&self, lang: &str) -> Arc<GrammarTool> {
        let mut tools = self.tools.lock().await;
        if let Some(tool) = tools.get(lang) {
            return Arc::clone(tool);
        }

        info!("Creating grammar tool handle for language {}", lang);
        let tool = Arc::new(GrammarTool::new(
            self.client.clone(),
            self.base_url.clone(),
            lang.to_string(),
        ));
        tools.insert(lang.to_string(), Arc::clone(&tool));
        tool
    }

    /// Number of distinct languages with a live handle.
    pub async fn len(&self) -> usize {
        self.tools.lock().await.len()
    }
}

/// The grammar-check operation: resolve the language, fetch the cached
/// handle, run the check.
pub async fn check(
    cache: &GrammarToolCache,
    text: &str,
    declared_language: Option<&str>,
) -> Result<Vec<Issue>, ServiceError> {
    let lang = language::resolve(text, declared_language)?;
    let tool = cache.get_or_create(&lang).await;
    tool.check(text).await
}
