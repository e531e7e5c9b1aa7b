//! Configuration de la CLI: `filigrane.toml` puis variables `FILIGRANE_*`

use anyhow::Context;
use filigrane_core::WatermarkConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fichier lu par défaut dans le répertoire courant
const DEFAULT_CONFIG_FILE: &str = "filigrane.toml";

/// Configuration complète de la CLI
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub watermark: WatermarkConfig,
    pub logging: LoggingConfig,
    /// Index JSON utilisé par `insert --index` et `detect` quand aucun n'est donné
    pub index: Option<PathBuf>,
}

/// Configuration du logging
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Settings {
    /// Charge et vérifie la configuration; un fichier explicite doit exister
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        let settings: Self = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix("FILIGRANE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings
            .watermark
            .validate()
            .with_context(|| format!("configuration {}", path.display()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filigrane_core::EncryptionScheme;
    use std::fs;

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.watermark, WatermarkConfig::default());
        assert_eq!(settings.logging.format, "compact");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filigrane.toml");
        fs::write(
            &path,
            "index = \"marks.json\"\n\n[watermark]\nmax_payload_len = 40\ndefault_scheme = \"substitution\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.watermark.max_payload_len, 40);
        assert_eq!(settings.watermark.default_scheme, EncryptionScheme::Substitution);
        assert_eq!(settings.watermark.noise_max, 30);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.index, Some(PathBuf::from("marks.json")));
    }

    #[test]
    fn test_weak_kdf_rounds_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filigrane.toml");
        fs::write(&path, "[watermark]\nkdf_rounds = 1000\n").unwrap();

        let err = Settings::load(Some(path.as_path())).unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("1000")));
    }
}
