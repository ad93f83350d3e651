//! Startup sequencing: everything that must happen once, before the API
//! starts taking traffic.
//!
//! Model install, correction-model load and the grammar-server spawn are
//! best-effort — a failure is logged and the affected endpoint fails
//! downstream. The readiness poll is not: if the grammar backend never comes
//! up within the probe budget, boot fails with an operator-visible error.

use crate::api::AppState;
use anyhow::Result;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{error, info, warn};

const PROBE_MAX_DELAY: Duration = Duration::from_secs(5);

/// Run the full startup sequence.
pub async fn run(state: &AppState) -> Result<()> {
    install_translation_model(state).await;
    load_correction_model(state).await;
    spawn_grammar_server(state);
    wait_for_grammar_backend(state).await
}

/// Install the configured translation model package into the engine.
async fn install_translation_model(state: &AppState) {
    let Some(path) = &state.config.translation_model_path else {
        info!("TRANSLATION_MODEL_PATH not set, skipping translation model install");
        return;
    };

    match state.translator.install_package(path).await {
        Ok(()) => info!("Translation model installed from {}", path),
        Err(e) => error!("Failed to install translation model: {}", e),
    }
}

/// Explicitly load the correction model into the sidecar.
async fn load_correction_model(state: &AppState) {
    let config = &state.config;
    match state
        .corrector
        .load(&config.correction_model_dir, config.disable_onednn_opts)
        .await
    {
        Ok(()) => info!(
            "Correction model loaded from {}",
            config.correction_model_dir
        ),
        Err(e) => error!("Failed to load correction model: {}", e),
    }
}

/// Launch the grammar server as a detached child process. Skipped entirely
/// when no jar path is configured — the server is then assumed to be managed
/// outside this process.
fn spawn_grammar_server(state: &AppState) {
    let config = &state.config;
    let Some(jar) = &config.grammar_server_jar else {
        info!("GRAMMAR_SERVER_JAR not set, expecting an externally managed grammar server");
        return;
    };

    let result = Command::new(&config.java_bin)
        .arg("-cp")
        .arg(jar)
        .arg("org.languagetool.server.HTTPServer")
        .arg("--port")
        .arg(config.grammar_server_port.to_string())
        .arg("--allow-origin")
        .arg("*")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match result {
        Ok(child) => info!(
            "Launched grammar server on port {} (pid {:?})",
            config.grammar_server_port,
            child.id()
        ),
        Err(e) => error!("Failed to launch grammar server: {}", e),
    }
}

/// Poll the grammar backend until it answers, with exponential backoff
/// between attempts. Exhausting the probe budget is a startup error.
async fn wait_for_grammar_backend(state: &AppState) -> Result<()> {
    let config = &state.config;
    let probe_url = format!("{}/v2/languages", config.grammar_server_url);
    let attempts = config.startup_probe_attempts.max(1);
    let mut delay = Duration::from_millis(config.startup_probe_delay_ms);

    for attempt in 1..=attempts {
        match state.http.get(&probe_url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Grammar backend ready after {} probe(s)", attempt);
                return Ok(());
            }
            Ok(response) => warn!(
                "Grammar backend probe {}/{}: HTTP {}",
                attempt,
                attempts,
                response.status()
            ),
            Err(e) => warn!("Grammar backend probe {}/{}: {}", attempt, attempts, e),
        }

        if attempt < attempts {
            sleep(delay).await;
            delay = (delay * 2).min(PROBE_MAX_DELAY);
        }
    }

    anyhow::bail!(
        "grammar backend at {} did not become ready after {} probes",
        config.grammar_server_url,
        attempts
    )
}
