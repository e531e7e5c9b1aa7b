//! Configuration des moteurs d'insertion et d'extraction

use crate::cipher::{EncryptionScheme, PasswordPolicy, DEFAULT_KDF_ROUNDS};
use crate::error::{Result, WatermarkError};
use serde::{Deserialize, Serialize};

/// Paramètres partagés par l'insertion et l'extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Longueur maximale du texte de filigrane (caractères)
    pub max_payload_len: usize,
    /// Longueur minimale du bruit de part et d'autre (convention `NoiseWrapped`)
    pub noise_min: usize,
    /// Longueur maximale du bruit
    pub noise_max: usize,
    /// Itérations PBKDF2
    pub kdf_rounds: u32,
    /// Longueur des mots de passe générés
    pub password_length: usize,
    pub password_policy: PasswordPolicy,
    /// Convention utilisée pour les nouveaux filigranes chiffrés
    pub default_scheme: EncryptionScheme,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            max_payload_len: 100,
            noise_min: 10,
            noise_max: 30,
            kdf_rounds: DEFAULT_KDF_ROUNDS,
            password_length: 16,
            password_policy: PasswordPolicy::Strong,
            default_scheme: EncryptionScheme::Salted,
        }
    }
}

impl WatermarkConfig {
    /// Vérifie une configuration chargée de l'extérieur (fichier, environnement).
    ///
    /// La dérivation de clé ne descend jamais sous `DEFAULT_KDF_ROUNDS` itérations.
    pub fn validate(&self) -> Result<()> {
        if self.kdf_rounds < DEFAULT_KDF_ROUNDS {
            return Err(WatermarkError::WeakKeyDerivation {
                rounds: self.kdf_rounds,
                min: DEFAULT_KDF_ROUNDS,
            });
        }
        Ok(())
    }

    /// Configuration rapide pour les tests (peu d'itérations PBKDF2)
    pub fn fast() -> Self {
        Self {
            kdf_rounds: 16,
            ..Self::default()
        }
    }
}
