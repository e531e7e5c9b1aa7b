//! Système de logging pour Filigrane Core

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise le système de logging depuis `RUST_LOG`
pub fn init_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .try_init();
}

/// Initialise le logging avec un niveau et un format explicites (`compact` ou `json`)
pub fn init_logging_with(level: &str, format: &str) {
    let filter = match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // try_init: un subscriber global peut déjà être installé (tests, CLI relancée)
    let _ = match format.to_lowercase().as_str() {
        "json" => fmt().json().with_env_filter(filter).with_target(false).try_init(),
        _ => fmt().compact().with_env_filter(filter).with_target(false).try_init(),
    };
}

/// Macro pour le logging des opérations critiques
#[macro_export]
macro_rules! log_operation {
    ($name:expr, $block:block) => {{
        let span = tracing::span!(tracing::Level::INFO, $name);
        let _enter = span.enter();
        tracing::debug!("Début de l'opération: {}", $name);
        let result = $block;
        tracing::debug!("Fin de l'opération: {}", $name);
        result
    }};
}

/// Macro pour le logging des erreurs
#[macro_export]
macro_rules! log_error {
    ($error:expr) => {{
        let error = $error;
        tracing::error!("Erreur: {}", error);
        error
    }};
}
