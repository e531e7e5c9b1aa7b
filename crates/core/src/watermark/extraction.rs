//! Moteur d'extraction
//!
//! Localisation, par ordre de priorité:
//! 1. caractéristique de type `watermark`;
//! 2. bloc `DNA watermark information:` du commentaire libre.
//!
//! Le fragment est ensuite décodé, puis déchiffré si nécessaire.

use super::annotation::{marker_from_comment, marker_from_feature, WatermarkMarker, WATERMARK_KIND};
use super::resync::resynchronize;
use super::{Algorithm, WatermarkInfo};
use crate::cipher::{AlphabetCipher, AuthenticatedCipher, EncryptionScheme, Salt, SubstitutionCipher};
use crate::codec;
use crate::config::WatermarkConfig;
use crate::error::{Result, WatermarkError};
use crate::log_operation;
use crate::record::{AnnotatedRecord, Interval};
use tracing::{debug, info, warn};

/// Paramètres d'une extraction; tout champ absent est lu dans l'enregistrement
#[derive(Debug, Clone, Default)]
pub struct ExtractRequest {
    pub algorithm: Option<Algorithm>,
    pub password: Option<String>,
    pub salt: Option<Salt>,
    pub scheme: Option<EncryptionScheme>,
}

impl ExtractRequest {
    /// Extraction chiffrée avec mot de passe
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Default::default()
        }
    }
}

/// Moteur d'extraction de filigranes
#[derive(Debug, Clone, Default)]
pub struct WatermarkExtractor {
    config: WatermarkConfig,
}

impl WatermarkExtractor {
    pub fn new(config: WatermarkConfig) -> Self {
        Self { config }
    }

    /// Localise, décode et déchiffre le filigrane d'un enregistrement
    pub fn extract(&self, record: &AnnotatedRecord, request: &ExtractRequest) -> Result<WatermarkInfo> {
        log_operation!("watermark_extract", {
            let marker = locate(record)?;
            let fragment = record.slice(marker.interval)?.to_string();

            let algorithm = request
                .algorithm
                .or(marker.algorithm)
                .unwrap_or(Algorithm::Plaintext);
            let scheme = match algorithm {
                Algorithm::Plaintext => None,
                Algorithm::Encrypted => request.scheme.or(marker.scheme),
            };
            // Le nombre d'itérations inscrit dans l'enregistrement prime sur la configuration
            let rounds = marker.kdf_rounds.unwrap_or(self.config.kdf_rounds);
            let uses_kdf =
                algorithm == Algorithm::Encrypted && scheme != Some(EncryptionScheme::Substitution);

            let text = match algorithm {
                Algorithm::Plaintext => codec::decode_fragment(&fragment)?,
                Algorithm::Encrypted => {
                    let password = request
                        .password
                        .as_deref()
                        .ok_or(WatermarkError::MissingPassword)?;
                    let salt = request.salt.or(marker.salt);
                    self.decrypt_fragment(&fragment, password, scheme, salt, rounds)?
                }
            };

            info!(
                position = %marker.interval.one_based(),
                algorithm = %algorithm,
                "Filigrane extrait"
            );

            Ok(WatermarkInfo {
                position: marker.interval,
                sequence: fragment,
                original_text: text,
                algorithm,
                scheme,
                salt: request.salt.or(marker.salt),
                kdf_rounds: uses_kdf.then_some(rounds),
                password: None,
            })
        })
    }

    fn decrypt_fragment(
        &self,
        fragment: &str,
        password: &str,
        scheme: Option<EncryptionScheme>,
        salt: Option<Salt>,
        rounds: u32,
    ) -> Result<String> {
        match (scheme, salt) {
            (Some(EncryptionScheme::Substitution), _) => {
                let cipher = SubstitutionCipher::new(password)?;
                cipher.decrypt(&codec::decode_fragment(fragment)?)
            }
            (Some(EncryptionScheme::NoiseWrapped), _) => {
                let cipher = AuthenticatedCipher::legacy(password, rounds)?;
                resynchronize(fragment, &cipher).map(|(_, text)| text)
            }
            (Some(EncryptionScheme::Salted), None) => Err(WatermarkError::MissingSalt),
            (Some(EncryptionScheme::Salted), Some(salt)) => {
                let cipher = AuthenticatedCipher::new(password, salt, rounds)?;
                cipher.decrypt(&codec::decode_fragment(fragment)?)
            }
            (None, Some(salt)) => {
                let cipher = AuthenticatedCipher::new(password, salt, rounds)?;
                let direct = codec::decode_fragment(fragment).and_then(|text| cipher.decrypt(&text));
                match direct {
                    Ok(text) => Ok(text),
                    Err(e) => {
                        warn!(error = %e, "Déchiffrement direct impossible, resynchronisation");
                        let legacy = AuthenticatedCipher::legacy(password, rounds)?;
                        resynchronize(fragment, &legacy).map(|(_, text)| text)
                    }
                }
            }
            (None, None) => {
                warn!("Convention inconnue et aucun sel, resynchronisation");
                let legacy = AuthenticatedCipher::legacy(password, rounds)?;
                resynchronize(fragment, &legacy).map(|(_, text)| text)
            }
        }
    }
}

/// Localise le marqueur de filigrane (caractéristique puis commentaire)
pub fn locate(record: &AnnotatedRecord) -> Result<WatermarkMarker> {
    let from_comment = record
        .comment
        .as_deref()
        .map(marker_from_comment)
        .transpose()
        .map(Option::flatten);

    if let Some(feature) = record.find_feature(WATERMARK_KIND) {
        debug!(interval = %feature.interval, "Caractéristique watermark trouvée");
        let mut marker = marker_from_feature(feature)?;
        // Les qualificatifs absents sont complétés par le commentaire, s'il est lisible
        match from_comment {
            Ok(Some(comment)) => {
                marker.algorithm = marker.algorithm.or(comment.algorithm);
                marker.scheme = marker.scheme.or(comment.scheme);
                marker.salt = marker.salt.or(comment.salt);
                marker.kdf_rounds = marker.kdf_rounds.or(comment.kdf_rounds);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Bloc de commentaire illisible ignoré"),
        }
        return Ok(marker);
    }

    let Some(mut marker) = from_comment? else {
        return Err(WatermarkError::WatermarkNotFound);
    };

    warn!(interval = %marker.interval, "Aucune caractéristique watermark, lecture du commentaire");

    // L'intervalle déclaré peut être périmé; le fragment déclaré fait foi s'il est retrouvé ailleurs
    if let Some(declared) = marker.declared_sequence.as_deref() {
        let at_declared = record
            .slice(marker.interval)
            .map(|slice| slice.eq_ignore_ascii_case(declared))
            .unwrap_or(false);
        if !at_declared {
            if let Some(start) = record.sequence.to_uppercase().find(declared) {
                debug!(start, "Fragment déclaré retrouvé à une autre position");
                marker.interval = Interval::new(start, start + declared.len())?;
            }
        }
    }

    Ok(marker)
}
