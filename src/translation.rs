//! Translation through a local engine daemon.
//!
//! The engine owns the set of installed language models; this module queries
//! that directory fresh on every request, resolves the source/target pair,
//! and performs the translation call. It also exposes the one-time package
//! install used by the startup sequencer.

use crate::error::ServiceError;
use crate::language;
use serde::{Deserialize, Serialize};

/// One installed language as reported by the engine's directory. `targets`
/// lists the codes this language can translate into; an empty list means the
/// engine does not report paths.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledLanguage {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

/// A completed translation, echoing the directory codes that were actually
/// used.
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct InstallRequest<'a> {
    path: &'a str,
}

/// Client bound to the translation engine's HTTP interface.
pub struct TranslationClient {
    client: reqwest::Client,
    base_url: String,
}

impl TranslationClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// The translation operation.
    ///
    /// `source_lang == "auto"` triggers detection; either way the source code
    /// is normalized and restricted to the supported pair set before the
    /// directory lookup. The target is matched exactly, no normalization.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Translation, ServiceError> {
        let source = if source_lang == "auto" {
            language::normalize_source_code(&language::detect(text)?)
        } else {
            language::normalize_source_code(source_lang)
        };

        let languages = self.list_installed_languages().await?;
        if languages.is_empty() {
            return Err(ServiceError::NoModelInstalled);
        }

        let source_obj = languages.iter().find(|l| l.code == source);
        let target_obj = languages.iter().find(|l| l.code == target_lang);
        let (source_obj, target_obj) = match (source_obj, target_obj) {
            (Some(s), Some(t)) => (s, t),
            _ => {
                return Err(ServiceError::UnsupportedLanguage {
                    from: source.to_string(),
                    target: target_lang.to_string(),
                })
            }
        };

        // The translation path from source to target must exist when the
        // directory reports one.
        if !source_obj.targets.is_empty()
            && !source_obj.targets.iter().any(|t| t == &target_obj.code)
        {
            return Err(ServiceError::UnsupportedLanguage {
                from: source_obj.code.clone(),
                target: target_obj.code.clone(),
            });
        }

        let translated = self
            .request_translation(text, &source_obj.code, &target_obj.code)
            .await?;

        Ok(Translation {
            text: translated,
            source_lang: source_obj.code.clone(),
            target_lang: target_obj.code.clone(),
        })
    }

    /// Fetch the engine's installed-language directory. Always a fresh read;
    /// the engine owns this state, not us.
    pub async fn list_installed_languages(&self) -> Result<Vec<InstalledLanguage>, ServiceError> {
        let response = self
            .client
            .get(format!("{}/languages", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest("translation", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Backend {
                backend: "translation",
                message: format!("{}: {}", status, body),
            });
        }

        response.json().await.map_err(|e| ServiceError::Backend {
            backend: "translation",
            message: format!("invalid languages response: {}", e),
        })
    }

    async fn request_translation(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
        };

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest("translation", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Backend {
                backend: "translation",
                message: format!("{}: {}", status, body),
            });
        }

        let translated: TranslateResponse =
            response.json().await.map_err(|e| ServiceError::Backend {
                backend: "translation",
                message: format!("invalid translate response: {}", e),
            })?;

        Ok(translated.translated_text)
    }

    /// One-time model package install, run by the startup sequencer.
    pub async fn install_package(&self, path: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(format!("{}/install", self.base_url))
            .json(&InstallRequest { path })
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest("translation", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Backend {
                backend: "translation",
                message: format!("install failed ({}): {}", status, body),
            });
        }

        Ok(())
    }
}
