//! Types d'erreurs pour la bibliothèque de filigrane ADN

use thiserror::Error;

/// Erreur levée par la couche d'enveloppe (GenBank, JSON)
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Erreur de lecture: {0}")]
    Parse(String),

    #[error("Section manquante: {0}")]
    MissingSection(&'static str),

    #[error("Localisation non supportée: {0}")]
    UnsupportedLocation(String),

    #[error("Erreur d'écriture: {0}")]
    Render(String),

    #[error("Erreur JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("Caractère non supporté: {0:?}")]
    UnsupportedCharacter(char),

    #[error("Codon inconnu: {0}")]
    UnknownCodon(String),

    #[error("Longueur invalide: {0} n'est pas un multiple de 3")]
    InvalidLength(usize),

    #[error("Base nucléotidique invalide: {0:?}")]
    InvalidBase(char),

    #[error("Algorithme non supporté: {0}")]
    UnsupportedMode(String),

    #[error("Position d'insertion non supportée: {0}")]
    UnsupportedStrategy(String),

    #[error("Schéma de chiffrement non supporté: {0}")]
    UnsupportedScheme(String),

    #[error("Région d'intérêt manquante")]
    MissingRegion,

    #[error("Région hors séquence: {start}..{end} pour une longueur de {len}")]
    RegionOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Intervalle invalide: {start}..{end}")]
    InvalidInterval { start: usize, end: usize },

    #[error("Texte de filigrane vide")]
    EmptyPayload,

    #[error("Texte de filigrane trop long: {len} > {max}")]
    PayloadTooLong { len: usize, max: usize },

    #[error("Mot de passe requis pour le mode chiffré")]
    MissingPassword,

    #[error("Sel requis pour la convention salted")]
    MissingSalt,

    #[error("Itérations PBKDF2 insuffisantes: {rounds} < {min}")]
    WeakKeyDerivation { rounds: u32, min: u32 },

    #[error("Nombre d'itérations invalide: {0}")]
    InvalidRounds(String),

    #[error("Sel invalide: {0}")]
    InvalidSalt(String),

    #[error("Échec du chiffrement")]
    EncryptionFailed,

    #[error("Échec du déchiffrement")]
    DecryptionFailed,

    #[error("Aucun filigrane trouvé dans l'enregistrement")]
    WatermarkNotFound,

    #[error("Impossible de décoder le filigrane")]
    WatermarkDecodeFailed,

    #[error("Séquence vide")]
    EmptySequence,

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Erreur de sérialisation: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erreur IO: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WatermarkError>;
