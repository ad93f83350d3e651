//! The API layer: request/response models, the three endpoint handlers, and
//! the router wiring.
//!
//! Each handler validates its body, invokes exactly one component, and
//! collapses any failure into the uniform `{"detail": ...}` 500 envelope.
//! The underlying cause is always logged here, with component context,
//! before the generic message goes out.

use crate::config::Config;
use crate::error::ApiError;
use crate::grammar::{self, GrammarToolCache, Issue};
use crate::polish::Corrector;
use crate::translation::TranslationClient;
use anyhow::Result;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Process-wide context handed to every request handler. Constructed once at
/// boot; everything inside is shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub grammar: Arc<GrammarToolCache>,
    pub translator: Arc<TranslationClient>,
    pub corrector: Arc<Corrector>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend_timeout_secs))
            .build()?;

        let grammar = Arc::new(GrammarToolCache::new(
            http.clone(),
            config.grammar_server_url.clone(),
        ));
        let translator = Arc::new(TranslationClient::new(
            http.clone(),
            config.translation_server_url.clone(),
        ));
        let corrector = Arc::new(Corrector::new(
            http.clone(),
            config.correction_server_url.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            http,
            grammar,
            translator,
            corrector,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GrammarRequest {
    pub text: String,
    /// Missing, null or blank means "detect from the text".
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GrammarResponse {
    pub original: String,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_source_lang() -> String {
    "auto".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
pub struct TranslationResponse {
    pub original: String,
    pub translated: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Deserialize)]
pub struct PolishRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PolishResponse {
    pub original: String,
    pub polished: String,
}

/// Build the application router. CORS is wide open: all origins, methods and
/// headers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/grammar-check", post(grammar_check))
        .route("/api/translate", post(translate_text))
        .route("/api/polish", post(polish_text))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn grammar_check(
    State(state): State<AppState>,
    Json(request): Json<GrammarRequest>,
) -> Result<Json<GrammarResponse>, ApiError> {
    match grammar::check(&state.grammar, &request.text, request.language.as_deref()).await {
        Ok(issues) => Ok(Json(GrammarResponse {
            original: request.text,
            issues,
        })),
        Err(e) => {
            error!("Grammar check failed: {}", e);
            // Deliberately generic: internal detail stays in the log
            Err(ApiError::internal("grammar check service failed"))
        }
    }
}

async fn translate_text(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Result<Json<TranslationResponse>, ApiError> {
    match state
        .translator
        .translate(&request.text, &request.source_lang, &request.target_lang)
        .await
    {
        Ok(translation) => Ok(Json(TranslationResponse {
            original: request.text,
            translated: translation.text,
            source_lang: translation.source_lang,
            target_lang: translation.target_lang,
        })),
        Err(e) => {
            error!("Translation failed: {}", e);
            // Translation errors echo the cause to the caller
            Err(ApiError::internal(format!(
                "translation service error: {}",
                e
            )))
        }
    }
}

async fn polish_text(
    State(state): State<AppState>,
    Json(request): Json<PolishRequest>,
) -> Result<Json<PolishResponse>, ApiError> {
    match state.corrector.correct(&request.text).await {
        Ok(polished) => Ok(Json(PolishResponse {
            original: request.text,
            polished,
        })),
        Err(e) => {
            error!("Polish failed: {}", e);
            Err(ApiError::internal("polish service failed"))
        }
    }
}
