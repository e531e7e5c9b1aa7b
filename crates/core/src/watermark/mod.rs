//! Insertion et extraction de filigranes dans un enregistrement annoté

pub mod annotation;
pub mod extraction;
pub mod insertion;
pub mod resync;

pub use extraction::{ExtractRequest, WatermarkExtractor};
pub use insertion::{reindex_interval, InsertRequest, Insertion, WatermarkInserter};
pub use resync::resynchronize;

use crate::cipher::{EncryptionScheme, Salt};
use crate::error::{Result, WatermarkError};
use crate::record::Interval;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Algorithme de filigrane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Codec appliqué directement au texte
    #[default]
    Plaintext,
    /// Texte chiffré avant encodage
    Encrypted,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Plaintext => "plaintext",
            Algorithm::Encrypted => "encrypted",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(Algorithm::Plaintext),
            "encrypted" | "encrypt" => Ok(Algorithm::Encrypted),
            _ => Err(WatermarkError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Position d'insertion relative à la région d'intérêt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionStrategy {
    /// Au début de la région
    #[default]
    #[serde(rename = "before-cds")]
    BeforeRegion,
    /// Juste après la fin de la région
    #[serde(rename = "after-cds")]
    AfterRegion,
}

impl PositionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStrategy::BeforeRegion => "before-cds",
            PositionStrategy::AfterRegion => "after-cds",
        }
    }

    /// Point d'insertion pour une région donnée
    pub fn insert_position(&self, region: Interval) -> usize {
        match self {
            PositionStrategy::BeforeRegion => region.start,
            PositionStrategy::AfterRegion => region.end,
        }
    }
}

impl fmt::Display for PositionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionStrategy {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "before-cds" | "before-region" | "before" => Ok(PositionStrategy::BeforeRegion),
            "after-cds" | "after-region" | "after" => Ok(PositionStrategy::AfterRegion),
            _ => Err(WatermarkError::UnsupportedStrategy(s.to_string())),
        }
    }
}

/// Description d'un filigrane inséré ou extrait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkInfo {
    /// Intervalle `[start, end)` du fragment dans la séquence filigranée
    pub position: Interval,
    /// Fragment nucléotidique (majuscules)
    pub sequence: String,
    /// Texte inséré, ou texte récupéré à l'extraction
    pub original_text: String,
    pub algorithm: Algorithm,
    /// Convention de chiffrement (étiquette de version), absente en clair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<EncryptionScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<Salt>,
    /// Itérations PBKDF2 utilisées pour dériver la clé (conventions AEAD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf_rounds: Option<u32>,
    /// Mot de passe généré (jamais celui fourni par l'appelant)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl WatermarkInfo {
    /// Longueur du fragment en bases
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }
}
