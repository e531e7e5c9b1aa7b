//! Chiffrement restreint à l'alphabet du codec
//!
//! Trois conventions coexistent et sont toujours étiquetées dans les sorties:
//! - `Salted`: PBKDF2-HMAC-SHA256 + AES-256-GCM, sel aléatoire renvoyé à l'appelant;
//! - `NoiseWrapped` (historique): même AEAD avec un sel fixe, fragment entouré de bruit
//!   et retrouvé par recherche de resynchronisation;
//! - `Substitution` (historique): décalage d'alphabet dérivé du mot de passe.
//!   Simple obfuscation, aucune confidentialité face à un attaquant motivé.

pub mod authenticated;
pub mod random;
pub mod substitution;

pub use authenticated::{AuthenticatedCipher, Salt, DEFAULT_KDF_ROUNDS, SALT_LEN};
pub use random::{
    generate_noise_fragment, generate_noise_fragment_with, generate_password,
    generate_password_with, random_noise_length, PasswordPolicy, MIN_PASSWORD_LEN,
};
pub use substitution::SubstitutionCipher;

use crate::error::{Result, WatermarkError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chiffre dont la sortie reste dans l'alphabet du codec
pub trait AlphabetCipher {
    /// Chiffre un texte clair
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Déchiffre un texte produit par `encrypt`
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}

/// Convention de chiffrement (étiquette de version des filigranes chiffrés)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncryptionScheme {
    /// AEAD avec sel aléatoire, position exacte
    #[default]
    Salted,
    /// AEAD avec sel fixe, bruit autour du fragment
    NoiseWrapped,
    /// Décalage d'alphabet, position exacte
    Substitution,
}

impl EncryptionScheme {
    /// Nom utilisé dans les qualificatifs et les commentaires
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptionScheme::Salted => "salted",
            EncryptionScheme::NoiseWrapped => "noise-wrapped",
            EncryptionScheme::Substitution => "substitution",
        }
    }

    /// Vrai pour les conventions conservées pour compatibilité
    pub fn is_legacy(&self) -> bool {
        !matches!(self, EncryptionScheme::Salted)
    }
}

impl fmt::Display for EncryptionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionScheme {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "salted" => Ok(EncryptionScheme::Salted),
            "noise-wrapped" | "noise" => Ok(EncryptionScheme::NoiseWrapped),
            "substitution" => Ok(EncryptionScheme::Substitution),
            _ => Err(WatermarkError::UnsupportedScheme(s.to_string())),
        }
    }
}
